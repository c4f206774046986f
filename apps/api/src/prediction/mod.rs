// Interview success prediction, skill gap analysis and their training lifecycle.
pub mod features;
pub mod forest;
pub mod handlers;
pub mod predictor;
pub mod skill_gap;
pub mod stats;
pub mod training;

// Metadata extraction over interview posts.
// The tagger supplies ORG/LOC spans; everything else is pattern and dictionary matching.

pub mod fields;
pub mod handlers;
pub mod orchestrator;
pub mod tables;
pub mod tagger;

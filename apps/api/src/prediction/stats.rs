use chrono::{DateTime, Utc};
use serde::Serialize;

/// Training summary reported per model by `/api/models/stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelStats {
    pub model_type: String,
    pub training_samples: usize,
    pub last_trained: Option<DateTime<Utc>>,
    /// Held-out accuracy. Not applicable to every model.
    pub accuracy: Option<f64>,
    pub features_used: Vec<String>,
}

use std::sync::Arc;

use crate::extraction::tagger::EntityTagger;
use crate::prediction::predictor::InterviewSuccessPredictor;
use crate::prediction::skill_gap::SkillGapAnalyzer;
use crate::prediction::training::TrainingSource;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable entity tagger. Default: HttpEntityTagger.
    pub tagger: Arc<dyn EntityTagger>,
    pub predictor: Arc<InterviewSuccessPredictor>,
    pub skill_analyzer: Arc<SkillGapAnalyzer>,
    /// None when no database is configured or reachable; models stay in fallback mode.
    pub training_source: Option<Arc<dyn TrainingSource>>,
    pub training_min_confidence: f64,
}

//! Metadata extraction orchestrator: runs the tagger once and fans its
//! output out to the five field extractors.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::extraction::fields::{
    extract_company, extract_level, extract_location, extract_outcome, extract_role_type,
};
use crate::extraction::tables::{InterviewOutcome, RoleType};
use crate::extraction::tagger::EntityTagger;

const LOG_PREVIEW_CHARS: usize = 100;

/// Per-field confidence. Always carries all five fields; absent values score 0.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConfidence {
    pub company: f64,
    pub role_type: f64,
    pub level: f64,
    pub location: f64,
    pub outcome: f64,
}

impl FieldConfidence {
    /// Two-decimal rendering used on the wire.
    pub fn rounded(&self) -> Self {
        Self {
            company: round2(self.company),
            role_type: round2(self.role_type),
            level: round2(self.level),
            location: round2(self.location),
            outcome: round2(self.outcome),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub company: Option<String>,
    pub role_type: Option<RoleType>,
    pub level: Option<String>,
    pub location: Option<String>,
    pub outcome: Option<InterviewOutcome>,
    pub confidence: FieldConfidence,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn require_text(text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::InvalidInput("text cannot be empty".to_string()));
    }
    Ok(())
}

fn preview(text: &str) -> String {
    text.chars().take(LOG_PREVIEW_CHARS).collect()
}

/// Extracts all five metadata fields from a post.
///
/// The tagger is queried exactly once and its output is shared by the
/// company and location extractors. Tagger failures surface as
/// `ModelUnavailable` with no partial result.
pub async fn extract_metadata(
    text: &str,
    tagger: &dyn EntityTagger,
) -> Result<ExtractionResult, AppError> {
    require_text(text)?;

    info!("Processing text: {}...", preview(text));
    let entities = tagger.tag(text).await?;

    let (company, company_conf) = extract_company(text, &entities);
    let (role_type, role_conf) = extract_role_type(text);
    let (level, level_conf) = extract_level(text);
    let (location, location_conf) = extract_location(text, &entities);
    let (outcome, outcome_conf) = extract_outcome(text);

    info!(
        "Extracted: company={:?}, role={:?}, level={:?}, location={:?}, outcome={:?}",
        company,
        role_type.as_ref().map(RoleType::as_str),
        level,
        location,
        outcome.as_ref().map(InterviewOutcome::as_str)
    );

    Ok(ExtractionResult {
        company,
        role_type,
        level,
        location,
        outcome,
        confidence: FieldConfidence {
            company: company_conf,
            role_type: role_conf,
            level: level_conf,
            location: location_conf,
            outcome: outcome_conf,
        },
    })
}

/// Company-only fast path. Same validation and single tagger call.
pub async fn extract_company_only(
    text: &str,
    tagger: &dyn EntityTagger,
) -> Result<(Option<String>, f64), AppError> {
    require_text(text)?;
    let entities = tagger.tag(text).await?;
    Ok(extract_company(text, &entities))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::extraction::tagger::{Entity, EntityCategory, TaggerError};

    /// Returns a fixed entity list and counts calls.
    pub struct StubTagger {
        pub entities: Vec<Entity>,
        pub calls: AtomicUsize,
    }

    impl StubTagger {
        pub fn new(entities: Vec<Entity>) -> Self {
            Self {
                entities,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl EntityTagger for StubTagger {
        async fn tag(&self, _text: &str) -> Result<Vec<Entity>, TaggerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.entities.clone())
        }

        fn model_name(&self) -> &str {
            "stub"
        }
    }

    pub struct FailingTagger;

    #[async_trait]
    impl EntityTagger for FailingTagger {
        async fn tag(&self, _text: &str) -> Result<Vec<Entity>, TaggerError> {
            Err(TaggerError::Api {
                status: 503,
                message: "model is loading".to_string(),
            })
        }

        fn model_name(&self) -> &str {
            "failing"
        }
    }

    const GOOGLE_POST: &str =
        "I interviewed at Google for a Senior Software Engineer role in Seattle and got the offer";

    fn google_tagger() -> StubTagger {
        StubTagger::new(vec![
            Entity::new("Google", EntityCategory::Org, 0.99),
            Entity::new("Seattle", EntityCategory::Loc, 0.98),
        ])
    }

    #[tokio::test]
    async fn test_full_extraction_scenario() {
        let tagger = google_tagger();
        let result = extract_metadata(GOOGLE_POST, &tagger).await.unwrap();

        assert_eq!(result.company.as_deref(), Some("Google"));
        assert_eq!(result.role_type, Some(RoleType::Swe));
        assert_eq!(result.level.as_deref(), Some("Senior"));
        assert_eq!(result.location.as_deref(), Some("Seattle"));
        assert_eq!(result.outcome, Some(InterviewOutcome::Offer));

        let c = result.confidence;
        for value in [c.company, c.role_type, c.level, c.location, c.outcome] {
            assert!(value > 0.0 && value <= 1.0);
        }
    }

    #[tokio::test]
    async fn test_tagger_called_once() {
        let tagger = google_tagger();
        extract_metadata(GOOGLE_POST, &tagger).await.unwrap();
        assert_eq!(tagger.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_text_is_invalid_input() {
        let tagger = google_tagger();
        for text in ["", "   \n\t"] {
            let err = extract_metadata(text, &tagger).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)));
        }
        assert_eq!(tagger.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_tagger_failure_is_model_unavailable() {
        let err = extract_metadata(GOOGLE_POST, &FailingTagger)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ModelUnavailable(_)));
    }

    #[tokio::test]
    async fn test_no_matches_yields_zero_confidences() {
        let tagger = StubTagger::new(vec![]);
        let result = extract_metadata("hello there", &tagger).await.unwrap();
        assert_eq!(result.company, None);
        assert_eq!(result.confidence, FieldConfidence::default());
    }

    #[tokio::test]
    async fn test_extraction_is_idempotent() {
        let tagger = google_tagger();
        let first = extract_metadata(GOOGLE_POST, &tagger).await.unwrap();
        let second = extract_metadata(GOOGLE_POST, &tagger).await.unwrap();
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_confidence_serializes_with_five_keys() {
        let tagger = StubTagger::new(vec![]);
        let result = extract_metadata("quick chat", &tagger).await.unwrap();
        let json = serde_json::to_value(result.confidence).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 5);
        for key in ["company", "role_type", "level", "location", "outcome"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    #[tokio::test]
    async fn test_company_only_path() {
        let tagger = google_tagger();
        let (company, conf) = extract_company_only(GOOGLE_POST, &tagger).await.unwrap();
        assert_eq!(company.as_deref(), Some("Google"));
        assert!((conf - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rounding_keeps_full_precision_source() {
        let conf = FieldConfidence {
            company: 2.0 / 3.0,
            ..FieldConfidence::default()
        };
        assert!((conf.rounded().company - 0.67).abs() < f64::EPSILON);
        assert!((conf.company - 2.0 / 3.0).abs() < f64::EPSILON);
    }
}

//! Training data: the ingestion boundary between the scraped-post store and
//! the models, plus the startup/retrain driver shared by `main` and the
//! retrain handler.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::post::{OutcomeCountRow, ScrapedPostRow};
use crate::prediction::predictor::{InterviewSuccessPredictor, TrainingReport};
use crate::prediction::skill_gap::SkillGapAnalyzer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingOutcome {
    Positive,
    Negative,
}

impl TrainingOutcome {
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "positive" => Some(Self::Positive),
            "negative" => Some(Self::Negative),
            _ => None,
        }
    }
}

/// Structured metadata attached to a scraped post. Missing lists default to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostMetadata {
    pub companies: Vec<String>,
    pub technologies: Vec<String>,
}

/// A single labelled training sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRow {
    pub body_text: String,
    pub outcome: TrainingOutcome,
    /// Falls back to a whitespace word count when absent.
    pub word_count: Option<usize>,
    pub metadata: Option<PostMetadata>,
}

impl TryFrom<ScrapedPostRow> for TrainingRow {
    type Error = String;

    fn try_from(row: ScrapedPostRow) -> Result<Self, Self::Error> {
        let outcome = TrainingOutcome::parse(&row.potential_outcome).ok_or_else(|| {
            format!(
                "post {} has unusable outcome '{}'",
                row.post_id, row.potential_outcome
            )
        })?;

        let body_text = row
            .body_text
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| format!("post {} has no body text", row.post_id))?;

        // The column is always selected, so every stored row carries metadata;
        // NULL or malformed JSON reads as empty lists.
        let metadata = row
            .metadata
            .and_then(|value| serde_json::from_value::<PostMetadata>(value).ok())
            .unwrap_or_default();

        Ok(TrainingRow {
            body_text,
            outcome,
            word_count: row.word_count.and_then(|w| usize::try_from(w).ok()),
            metadata: Some(metadata),
        })
    }
}

/// Count and mean labelling confidence for one outcome label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeCount {
    pub outcome: Option<String>,
    pub count: i64,
    pub avg_confidence: f64,
}

impl From<OutcomeCountRow> for OutcomeCount {
    fn from(row: OutcomeCountRow) -> Self {
        Self {
            outcome: row.potential_outcome,
            count: row.count,
            avg_confidence: row.avg_confidence.unwrap_or(0.0),
        }
    }
}

/// Where training rows come from. An empty result is not an error.
#[async_trait]
pub trait TrainingSource: Send + Sync {
    async fn fetch_training_rows(&self, min_confidence: f64)
        -> Result<Vec<TrainingRow>, AppError>;

    async fn outcome_counts(&self) -> Result<Vec<OutcomeCount>, AppError>;
}

/// Reads labelled posts from the `scraped_posts` table.
pub struct PgTrainingSource {
    pool: PgPool,
}

impl PgTrainingSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrainingSource for PgTrainingSource {
    async fn fetch_training_rows(
        &self,
        min_confidence: f64,
    ) -> Result<Vec<TrainingRow>, AppError> {
        let rows = sqlx::query_as::<_, ScrapedPostRow>(
            r#"
            SELECT
                post_id::text AS post_id,
                body_text,
                potential_outcome,
                metadata,
                word_count::int4 AS word_count
            FROM scraped_posts
            WHERE potential_outcome IN ('positive', 'negative')
              AND confidence_score >= $1
            ORDER BY scraped_at DESC
            "#,
        )
        .bind(min_confidence)
        .fetch_all(&self.pool)
        .await?;

        let fetched = rows.len();
        let samples = into_training_rows(rows);
        info!(
            "Loaded {} training samples ({} skipped)",
            samples.len(),
            fetched - samples.len()
        );
        Ok(samples)
    }

    async fn outcome_counts(&self) -> Result<Vec<OutcomeCount>, AppError> {
        let rows = sqlx::query_as::<_, OutcomeCountRow>(
            r#"
            SELECT
                potential_outcome,
                COUNT(*) AS count,
                AVG(confidence_score)::float8 AS avg_confidence
            FROM scraped_posts
            GROUP BY potential_outcome
            ORDER BY potential_outcome
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(OutcomeCount::from).collect())
    }
}

/// Validates raw rows, logging and skipping the unusable ones.
pub fn into_training_rows(rows: Vec<ScrapedPostRow>) -> Vec<TrainingRow> {
    rows.into_iter()
        .filter_map(|row| match TrainingRow::try_from(row) {
            Ok(sample) => Some(sample),
            Err(reason) => {
                warn!("Skipping training row: {reason}");
                None
            }
        })
        .collect()
}

/// Retrains the success predictor on `rows`, then refits the skill analyzer.
///
/// A predictor failure is returned before the analyzer is touched, so both
/// previous models keep serving. Analyzer fitting is best-effort: a failure is
/// logged and the previous frequency table stays. Both run off the async runtime.
pub async fn train_models(
    predictor: Arc<InterviewSuccessPredictor>,
    analyzer: Arc<SkillGapAnalyzer>,
    rows: Vec<TrainingRow>,
) -> Result<TrainingReport, AppError> {
    tokio::task::spawn_blocking(move || -> Result<TrainingReport, AppError> {
        let report = predictor.train(&rows)?;
        if let Err(e) = analyzer.fit(&rows) {
            warn!("Skill analyzer fit failed, keeping previous table: {e}");
        }
        Ok(report)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("training task panicked: {e}")))?
}

/// Startup training. Never fails: any problem leaves the models in fallback mode.
pub async fn bootstrap_models(
    source: Option<&dyn TrainingSource>,
    min_confidence: f64,
    predictor: Arc<InterviewSuccessPredictor>,
    analyzer: Arc<SkillGapAnalyzer>,
) {
    let Some(source) = source else {
        warn!("No training data source configured. Models will use fallback logic.");
        return;
    };

    let rows = match source.fetch_training_rows(min_confidence).await {
        Ok(rows) => rows,
        Err(e) => {
            warn!("Could not load training data ({e}). Models will use fallback logic.");
            return;
        }
    };

    if rows.is_empty() {
        warn!("No training data available. Models will use fallback logic.");
        return;
    }

    info!("Training models on {} samples", rows.len());
    match train_models(predictor, analyzer, rows).await {
        Ok(report) => info!(
            "Success predictor trained: accuracy={:.3}, samples={}",
            report.accuracy, report.training_samples
        ),
        Err(e) => warn!("Startup training failed ({e}). Using fallback prediction."),
    }
}

//! Interview success predictor: random forest over engineered features with
//! a deterministic rule-based fallback.
//!
//! The trained model lives behind `RwLock<Option<Arc<TrainedModel>>>`.
//! `train` builds a complete new model and swaps the `Arc` in one write, so a
//! concurrent `predict` sees either the old model or the new one.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::prediction::features::{extract_features, Document};
use crate::prediction::forest::{stratified_split, ForestError, ForestParams, RandomForest};
use crate::prediction::stats::ModelStats;
use crate::prediction::training::{PostMetadata, TrainingOutcome, TrainingRow};

const TEST_FRACTION: f64 = 0.2;
const SPLIT_SEED: u64 = 42;
const FALLBACK_BASE_PROBABILITY: f64 = 0.5;
const FALLBACK_CONFIDENCE: f64 = 0.6;
const MAX_MODEL_CONFIDENCE: f64 = 0.95;

const TOP_TIER_COMPANIES: &[&str] = &["google", "meta", "amazon", "microsoft", "apple"];
const CULTURE_RESEARCH_COMPANIES: &[&str] = &["google", "meta", "amazon"];

// ────────────────────────────────────────────────────────────────────────────
// Request / result models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionRequest {
    pub company: Option<String>,
    pub role: Option<String>,
    /// junior, mid, senior
    pub experience_level: Option<String>,
    #[serde(default)]
    pub interview_topics: Vec<String>,
    pub preparation_time_weeks: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSource {
    Model,
    RuleBased,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionFactors {
    pub company: Option<String>,
    pub role: Option<String>,
    pub experience_level: Option<String>,
    pub topics_covered: usize,
    pub preparation_weeks: Option<u32>,
    /// Human-readable log of the rule-based adjustments. Fallback path only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustments: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    pub success_probability: f64,
    pub confidence: f64,
    pub factors: PredictionFactors,
    pub recommendations: Vec<String>,
    pub prediction_source: PredictionSource,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub success: bool,
    pub training_samples: usize,
    pub accuracy: f64,
    pub positive_samples: usize,
    pub negative_samples: usize,
}

/// Everything a trained predictor needs, replaced wholesale on retrain.
#[derive(Debug)]
pub struct TrainedModel {
    classifier: RandomForest,
    feature_names: Vec<String>,
    training_samples: usize,
    accuracy: f64,
    last_trained: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Predictor
// ────────────────────────────────────────────────────────────────────────────

pub struct InterviewSuccessPredictor {
    model: RwLock<Option<Arc<TrainedModel>>>,
    params: ForestParams,
}

impl Default for InterviewSuccessPredictor {
    fn default() -> Self {
        Self::new(ForestParams::default())
    }
}

impl InterviewSuccessPredictor {
    pub fn new(params: ForestParams) -> Self {
        Self {
            model: RwLock::new(None),
            params,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.model.read().is_some()
    }

    /// Fits a new forest on `rows` and swaps it in.
    ///
    /// Fails without touching the serving model when the dataset is empty or
    /// either outcome has fewer than two samples.
    pub fn train(&self, rows: &[TrainingRow]) -> Result<TrainingReport, AppError> {
        if rows.is_empty() {
            return Err(AppError::Training("training dataset is empty".to_string()));
        }

        let labels: Vec<bool> = rows
            .iter()
            .map(|r| r.outcome == TrainingOutcome::Positive)
            .collect();
        let positive_samples = labels.iter().filter(|&&l| l).count();
        let negative_samples = labels.len() - positive_samples;

        if positive_samples < 2 || negative_samples < 2 {
            return Err(AppError::Training(format!(
                "need at least two samples of each outcome for a stratified split \
                 (positive={positive_samples}, negative={negative_samples})"
            )));
        }

        info!("Training with {} samples...", rows.len());

        let docs: Vec<Document> = rows.iter().map(Document::from).collect();
        let table = extract_features(&docs);
        let (train_idx, test_idx) = stratified_split(&labels, TEST_FRACTION, SPLIT_SEED);

        let x_train: Vec<Vec<f64>> = train_idx.iter().map(|&i| table.rows[i].clone()).collect();
        let y_train: Vec<bool> = train_idx.iter().map(|&i| labels[i]).collect();

        let classifier = RandomForest::fit(&x_train, &y_train, &self.params)
            .map_err(|e| AppError::Training(e.to_string()))?;

        let mut correct = 0;
        for &i in &test_idx {
            let predicted = classifier
                .predict(&table.rows[i])
                .map_err(|e| AppError::Training(e.to_string()))?;
            if predicted == labels[i] {
                correct += 1;
            }
        }
        let accuracy = correct as f64 / test_idx.len().max(1) as f64;

        let model = TrainedModel {
            classifier,
            feature_names: table.names,
            training_samples: rows.len(),
            accuracy,
            last_trained: Utc::now(),
        };
        *self.model.write() = Some(Arc::new(model));

        info!(
            "Model trained with accuracy {:.3} (positive={}, negative={})",
            accuracy, positive_samples, negative_samples
        );

        Ok(TrainingReport {
            success: true,
            training_samples: rows.len(),
            accuracy,
            positive_samples,
            negative_samples,
        })
    }

    /// Never fails: errors on the model path fall back to the rule-based score.
    pub fn predict(&self, request: &PredictionRequest) -> PredictionResult {
        let model = self.model.read().clone();

        match model {
            None => fallback_prediction(request),
            Some(model) => match model_prediction(&model, request) {
                Ok(result) => result,
                Err(e) => {
                    warn!("Prediction error, using rule-based fallback: {e}");
                    fallback_prediction(request)
                }
            },
        }
    }

    pub fn stats(&self) -> ModelStats {
        let model = self.model.read().clone();
        ModelStats {
            model_type: "InterviewSuccessPredictor".to_string(),
            training_samples: model.as_ref().map(|m| m.training_samples).unwrap_or(0),
            last_trained: model.as_ref().map(|m| m.last_trained),
            accuracy: model.as_ref().map(|m| m.accuracy),
            features_used: model
                .as_ref()
                .map(|m| m.feature_names.clone())
                .unwrap_or_default(),
        }
    }
}

/// Confidence grows with training-set size, from 0.5 up to a 0.95 cap.
pub fn model_confidence(training_samples: usize) -> f64 {
    (0.5 + (training_samples as f64 / 1000.0) * 0.45).min(MAX_MODEL_CONFIDENCE)
}

/// Blank strings count as absent.
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn synthetic_text(request: &PredictionRequest) -> String {
    let mut parts = Vec::new();
    if let Some(company) = non_blank(&request.company) {
        parts.push(format!("company {company}"));
    }
    if let Some(role) = non_blank(&request.role) {
        parts.push(format!("role {role}"));
    }
    parts.extend(request.interview_topics.iter().cloned());
    parts.join(" ").to_lowercase()
}

fn synthetic_metadata(request: &PredictionRequest) -> PostMetadata {
    PostMetadata {
        companies: non_blank(&request.company)
            .map(str::to_string)
            .into_iter()
            .collect(),
        technologies: request.interview_topics.clone(),
    }
}

fn model_prediction(
    model: &TrainedModel,
    request: &PredictionRequest,
) -> Result<PredictionResult, ForestError> {
    let text = synthetic_text(request);
    let metadata = synthetic_metadata(request);
    let doc = Document {
        body_text: &text,
        word_count: Some(text.split_whitespace().count()),
        metadata: Some(&metadata),
    };

    let aligned = extract_features(&[doc]).align(&model.feature_names);
    let probability = model.classifier.predict_proba(&aligned[0])?;

    Ok(PredictionResult {
        success_probability: probability,
        confidence: model_confidence(model.training_samples),
        factors: factors(request, None),
        recommendations: generate_recommendations(probability, request),
        prediction_source: PredictionSource::Model,
    })
}

fn factors(request: &PredictionRequest, adjustments: Option<Vec<String>>) -> PredictionFactors {
    PredictionFactors {
        company: request.company.clone(),
        role: request.role.clone(),
        experience_level: request.experience_level.clone(),
        topics_covered: request.interview_topics.len(),
        preparation_weeks: request.preparation_time_weeks,
        adjustments,
    }
}

fn is_one_of(company: Option<&str>, list: &[&str]) -> bool {
    company
        .map(|c| list.contains(&c.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Rule-based score used when no model is trained or the model path fails.
pub fn fallback_prediction(request: &PredictionRequest) -> PredictionResult {
    let mut probability = FALLBACK_BASE_PROBABILITY;
    let mut adjustments = Vec::new();

    if is_one_of(request.company.as_deref(), TOP_TIER_COMPANIES) {
        probability -= 0.10;
        adjustments.push("Top-tier company: slightly lower success rate".to_string());
    } else {
        adjustments.push("Company factor: neutral".to_string());
    }

    match request.preparation_time_weeks {
        Some(weeks) if weeks >= 8 => {
            probability += 0.15;
            adjustments.push("Excellent preparation time (+15%)".to_string());
        }
        Some(weeks) if weeks >= 4 => {
            probability += 0.08;
            adjustments.push("Good preparation time (+8%)".to_string());
        }
        _ => {}
    }

    if request.interview_topics.len() >= 5 {
        probability += 0.10;
        adjustments.push("Well-prepared on multiple topics (+10%)".to_string());
    }

    if request.experience_level.as_deref() == Some("senior") {
        probability += 0.05;
        adjustments.push("Senior level: slight advantage".to_string());
    }

    let probability = probability.clamp(0.0, 1.0);

    PredictionResult {
        success_probability: probability,
        confidence: FALLBACK_CONFIDENCE,
        factors: factors(request, Some(adjustments)),
        recommendations: generate_recommendations(probability, request),
        prediction_source: PredictionSource::RuleBased,
    }
}

fn generate_recommendations(probability: f64, request: &PredictionRequest) -> Vec<String> {
    let mut recommendations: Vec<String> = if probability < 0.4 {
        vec![
            "Consider extending your preparation time".into(),
            "Focus on fundamental concepts and common interview patterns".into(),
            "Practice mock interviews to build confidence".into(),
        ]
    } else if probability < 0.6 {
        vec![
            "Review company-specific interview formats and expectations".into(),
            "Strengthen weak areas identified in your preparation".into(),
        ]
    } else {
        vec![
            "You're well-prepared! Focus on behavioral questions".into(),
            "Review your past projects and be ready to discuss them in detail".into(),
        ]
    };

    if request.interview_topics.len() < 3 {
        recommendations.push("Expand your preparation to cover more relevant topics".into());
    }

    if let Some(company) = request.company.as_deref() {
        if is_one_of(Some(company), CULTURE_RESEARCH_COMPANIES) {
            recommendations.push(format!(
                "Research {company}'s leadership principles and company culture"
            ));
        }
    }

    if request
        .role
        .as_deref()
        .map(|r| r.to_lowercase().contains("engineer"))
        .unwrap_or(false)
    {
        recommendations.push("Practice system design and coding problems daily".into());
    }

    recommendations
}

//! Axum route handlers for the Prediction and Model Lifecycle APIs.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::prediction::predictor::{PredictionRequest, PredictionResult};
use crate::prediction::skill_gap::{SkillGapRequest, SkillGapResult};
use crate::prediction::stats::ModelStats;
use crate::prediction::training::{train_models, OutcomeCount, TrainingSource};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RetrainResponse {
    pub success: bool,
    pub message: String,
    pub training_samples: usize,
    pub accuracy: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct TrainingDataResponse {
    pub min_confidence: f64,
    pub outcomes: Vec<OutcomeCount>,
}

fn require_source(state: &AppState) -> Result<&dyn TrainingSource, AppError> {
    state
        .training_source
        .as_deref()
        .ok_or_else(|| AppError::InvalidInput("No training data source configured".to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/predict/interview-success
///
/// Always answers: an untrained or failing model falls back to rule-based scoring.
pub async fn handle_predict_success(
    State(state): State<AppState>,
    Json(request): Json<PredictionRequest>,
) -> Json<PredictionResult> {
    info!(
        "Predicting success for: company={:?}, role={:?}",
        request.company, request.role
    );
    let result = state.predictor.predict(&request);
    info!(
        "Prediction: {:.2} ({:?})",
        result.success_probability, result.prediction_source
    );
    Json(result)
}

/// POST /api/analyze/skill-gap
pub async fn handle_skill_gap(
    State(state): State<AppState>,
    Json(request): Json<SkillGapRequest>,
) -> Result<Json<SkillGapResult>, AppError> {
    if request.target_role.trim().is_empty() {
        return Err(AppError::InvalidInput("target_role cannot be empty".to_string()));
    }

    info!("Analyzing skill gap for role: {}", request.target_role);
    let result = state.skill_analyzer.analyze(
        &request.user_skills,
        &request.target_role,
        request.target_companies.as_deref(),
    );
    info!("Found {} skill gaps", result.missing_skills.len());

    Ok(Json(result))
}

/// GET /api/models/stats
pub async fn handle_model_stats(State(state): State<AppState>) -> Json<Vec<ModelStats>> {
    Json(vec![state.predictor.stats(), state.skill_analyzer.stats()])
}

/// POST /api/models/retrain
///
/// Reloads training rows and retrains both models. An empty dataset is a
/// client error; an unusable one (single class) is a training error and the
/// serving model is kept.
pub async fn handle_retrain(
    State(state): State<AppState>,
) -> Result<Json<RetrainResponse>, AppError> {
    info!("Retraining models with latest data...");

    let rows = require_source(&state)?
        .fetch_training_rows(state.training_min_confidence)
        .await?;
    if rows.is_empty() {
        return Err(AppError::InvalidInput("No training data available".to_string()));
    }

    let report = train_models(state.predictor.clone(), state.skill_analyzer.clone(), rows).await?;
    info!("Models retrained on {} samples", report.training_samples);

    Ok(Json(RetrainResponse {
        success: report.success,
        message: "Models retrained successfully".to_string(),
        training_samples: report.training_samples,
        accuracy: report.accuracy,
        timestamp: Utc::now(),
    }))
}

/// GET /api/models/training-data
///
/// Per-outcome post counts in the training store.
pub async fn handle_training_data(
    State(state): State<AppState>,
) -> Result<Json<TrainingDataResponse>, AppError> {
    let outcomes = require_source(&state)?.outcome_counts().await?;
    Ok(Json(TrainingDataResponse {
        min_confidence: state.training_min_confidence,
        outcomes,
    }))
}

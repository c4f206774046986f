//! Axum route handlers for the Extraction API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::orchestrator::{
    extract_company_only, extract_metadata, round2, ExtractionResult,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct CompanyResponse {
    pub company: Option<String>,
    pub confidence: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /extract-metadata
///
/// Extracts company, role type, level, location and outcome from post text.
/// Confidences are rounded to two decimals on the wire.
pub async fn handle_extract_metadata(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractionResult>, AppError> {
    let mut result = extract_metadata(&request.text, state.tagger.as_ref()).await?;
    result.confidence = result.confidence.rounded();
    Ok(Json(result))
}

/// POST /extract-company
///
/// Company only. Skips the pattern extractors.
pub async fn handle_extract_company(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<CompanyResponse>, AppError> {
    let (company, confidence) = extract_company_only(&request.text, state.tagger.as_ref()).await?;
    Ok(Json(CompanyResponse {
        company,
        confidence: round2(confidence),
    }))
}

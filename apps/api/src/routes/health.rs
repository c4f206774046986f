use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /
/// Service name, version and endpoint map.
pub async fn service_info_handler() -> Json<Value> {
    Json(json!({
        "service": "interview-intel-api",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "health": "/health",
            "extract_metadata": "/extract-metadata",
            "extract_company": "/extract-company",
            "predict": "/api/predict/interview-success",
            "skill_gap": "/api/analyze/skill-gap",
            "stats": "/api/models/stats",
            "retrain": "/api/models/retrain",
            "training_data": "/api/models/training-data"
        }
    }))
}

/// GET /health
/// Liveness plus model state. Does not call the tagger.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let predictor = if state.predictor.is_trained() {
        "loaded"
    } else {
        "not_trained"
    };

    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now(),
        "models": {
            "success_predictor": predictor,
            "skill_analyzer": "loaded",
            "entity_tagger": state.tagger.model_name()
        },
        "training_source": state.training_source.is_some()
    }))
}

pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::extraction::handlers as extraction;
use crate::prediction::handlers as prediction;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::service_info_handler))
        .route("/health", get(health::health_handler))
        // Extraction API
        .route("/extract-metadata", post(extraction::handle_extract_metadata))
        .route("/extract-company", post(extraction::handle_extract_company))
        // Prediction API
        .route(
            "/api/predict/interview-success",
            post(prediction::handle_predict_success),
        )
        .route("/api/analyze/skill-gap", post(prediction::handle_skill_gap))
        // Model lifecycle
        .route("/api/models/stats", get(prediction::handle_model_stats))
        .route("/api/models/retrain", post(prediction::handle_retrain))
        .route(
            "/api/models/training-data",
            get(prediction::handle_training_data),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::extraction::orchestrator::tests::{FailingTagger, StubTagger};
    use crate::extraction::tagger::{Entity, EntityCategory, EntityTagger};
    use crate::prediction::predictor::InterviewSuccessPredictor;
    use crate::prediction::skill_gap::SkillGapAnalyzer;
    use crate::prediction::training::tests::{sample, separable_dataset, MemorySource};
    use crate::prediction::training::{TrainingOutcome, TrainingRow, TrainingSource};

    fn state_with(tagger: Arc<dyn EntityTagger>, rows: Option<Vec<TrainingRow>>) -> AppState {
        AppState {
            tagger,
            predictor: Arc::new(InterviewSuccessPredictor::default()),
            skill_analyzer: Arc::new(SkillGapAnalyzer::default()),
            training_source: rows
                .map(|rows| Arc::new(MemorySource { rows }) as Arc<dyn TrainingSource>),
            training_min_confidence: 0.5,
        }
    }

    fn default_state() -> AppState {
        let tagger = StubTagger::new(vec![
            Entity::new("Google", EntityCategory::Org, 0.99),
            Entity::new("Seattle", EntityCategory::Loc, 0.97),
        ]);
        state_with(Arc::new(tagger), None)
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = build_router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    // =========================================================================
    // Service info / health
    // =========================================================================

    #[tokio::test]
    async fn test_service_info() {
        let (status, json) = send(default_state(), empty_request("GET", "/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["endpoints"]["predict"], "/api/predict/interview-success");
    }

    #[tokio::test]
    async fn test_health_reports_model_state() {
        let (status, json) = send(default_state(), empty_request("GET", "/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["models"]["success_predictor"], "not_trained");
        assert_eq!(json["models"]["entity_tagger"], "stub");
        assert_eq!(json["training_source"], false);
    }

    // =========================================================================
    // Extraction
    // =========================================================================

    #[tokio::test]
    async fn test_extract_metadata_rounds_confidence() {
        let body = json!({"text": "Senior SWE interview at Google in Seattle, got an offer"});
        let (status, json) =
            send(default_state(), json_request("POST", "/extract-metadata", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["company"], "Google");
        assert_eq!(json["role_type"], "SWE");
        assert_eq!(json["outcome"], "offer");
        assert_eq!(json["confidence"].as_object().unwrap().len(), 5);
        assert_eq!(json["confidence"]["level"], 0.9);
    }

    #[tokio::test]
    async fn test_extract_metadata_blank_text_is_400() {
        let (status, json) = send(
            default_state(),
            json_request("POST", "/extract-metadata", json!({"text": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_extract_metadata_tagger_failure_is_503() {
        let state = state_with(Arc::new(FailingTagger), None);
        let (status, json) = send(
            state,
            json_request("POST", "/extract-metadata", json!({"text": "Google offer"})),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["error"]["code"], "MODEL_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_extract_company() {
        let (status, json) = send(
            default_state(),
            json_request("POST", "/extract-company", json!({"text": "Google loop"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["company"], "Google");
        assert_eq!(json["confidence"], 1.0);
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    #[tokio::test]
    async fn test_predict_untrained_uses_rules() {
        let body = json!({"company": "Acme", "preparation_time_weeks": 10});
        let (status, json) = send(
            default_state(),
            json_request("POST", "/api/predict/interview-success", body),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["prediction_source"], "rule_based");
        assert!((json["success_probability"].as_f64().unwrap() - 0.65).abs() < 1e-9);
        assert_eq!(json["confidence"], 0.6);
    }

    #[tokio::test]
    async fn test_skill_gap() {
        let body = json!({"user_skills": ["Python", "SQL"], "target_role": "Data Scientist"});
        let (status, json) =
            send(default_state(), json_request("POST", "/api/analyze/skill-gap", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["priority_skills"][0], "R");
        assert_eq!(json["estimated_time_weeks"], 10);
        assert_eq!(json["learning_path"][0]["priority"], "high");
    }

    #[tokio::test]
    async fn test_skill_gap_blank_role_is_400() {
        let body = json!({"user_skills": [], "target_role": ""});
        let (status, _) =
            send(default_state(), json_request("POST", "/api/analyze/skill-gap", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // =========================================================================
    // Model lifecycle
    // =========================================================================

    #[tokio::test]
    async fn test_stats_lists_both_models() {
        let (status, json) = send(default_state(), empty_request("GET", "/api/models/stats")).await;
        assert_eq!(status, StatusCode::OK);
        let models = json.as_array().unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0]["model_type"], "InterviewSuccessPredictor");
        assert_eq!(models[1]["features_used"][1], "role_requirements");
    }

    #[tokio::test]
    async fn test_retrain_trains_predictor() {
        let state = state_with(Arc::new(StubTagger::new(vec![])), Some(separable_dataset()));
        let predictor = state.predictor.clone();
        let (status, json) = send(state, empty_request("POST", "/api/models/retrain")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["training_samples"], 40);
        assert!(predictor.is_trained());
    }

    #[tokio::test]
    async fn test_retrain_with_empty_source_is_400() {
        let state = state_with(Arc::new(StubTagger::new(vec![])), Some(vec![]));
        let (status, json) = send(state, empty_request("POST", "/api/models/retrain")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "No training data available");
    }

    #[tokio::test]
    async fn test_retrain_without_source_is_400() {
        let (status, _) = send(default_state(), empty_request("POST", "/api/models/retrain")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_retrain_single_class_is_422() {
        let rows = (0..10)
            .map(|i| sample(&format!("offer {i}"), TrainingOutcome::Positive, &["Go"]))
            .collect();
        let state = state_with(Arc::new(StubTagger::new(vec![])), Some(rows));
        let predictor = state.predictor.clone();
        let analyzer = state.skill_analyzer.clone();
        let before = analyzer.stats();
        let (status, json) = send(state, empty_request("POST", "/api/models/retrain")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["code"], "TRAINING_ERROR");
        assert!(!predictor.is_trained());
        assert_eq!(analyzer.stats().training_samples, before.training_samples);
        assert_eq!(analyzer.stats().last_trained, before.last_trained);
    }

    #[tokio::test]
    async fn test_training_data_counts() {
        let state = state_with(Arc::new(StubTagger::new(vec![])), Some(separable_dataset()));
        let (status, json) =
            send(state, empty_request("GET", "/api/models/training-data")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["outcomes"][1]["outcome"], "positive");
        assert_eq!(json["outcomes"][1]["count"], 20);
    }
}

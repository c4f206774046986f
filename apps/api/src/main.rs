mod config;
mod db;
mod errors;
mod extraction;
mod models;
mod prediction;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::extraction::tagger::HttpEntityTagger;
use crate::prediction::predictor::InterviewSuccessPredictor;
use crate::prediction::skill_gap::SkillGapAnalyzer;
use crate::prediction::training::{bootstrap_models, PgTrainingSource, TrainingSource};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview Intel API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize entity tagger
    let tagger = HttpEntityTagger::new(
        config.tagger_url.clone(),
        config.tagger_api_key.clone(),
        config.tagger_model.clone(),
    )
    .context("failed to build entity tagger client")?;
    info!("Entity tagger initialized (model: {})", config.tagger_model);

    // Training source is optional; without it both models run in fallback mode
    let training_source = match config.database_url.as_deref() {
        Some(url) => match create_pool(url).await {
            Ok(pool) => Some(Arc::new(PgTrainingSource::new(pool)) as Arc<dyn TrainingSource>),
            Err(e) => {
                warn!("Training database unreachable ({e:#}). Continuing without it.");
                None
            }
        },
        None => {
            warn!("DATABASE_URL not set. Continuing without a training source.");
            None
        }
    };

    let predictor = Arc::new(InterviewSuccessPredictor::default());
    let skill_analyzer = Arc::new(SkillGapAnalyzer::default());

    bootstrap_models(
        training_source.as_deref(),
        config.training_min_confidence,
        predictor.clone(),
        skill_analyzer.clone(),
    )
    .await;

    // Build app state
    let state = AppState {
        tagger: Arc::new(tagger),
        predictor,
        skill_analyzer,
        training_source,
        training_min_confidence: config.training_min_confidence,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        // TODO: restrict CORS origins once the frontend host is fixed
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

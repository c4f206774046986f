//! Entity tagger: the pretrained sequence-tagging model behind metadata extraction.
//!
//! The model itself runs out of process. `HttpEntityTagger` queries a
//! token-classification inference endpoint and returns aggregated spans.
//! `AppState` holds an `Arc<dyn EntityTagger>` so tests can swap in a stub.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::errors::AppError;

const TAGGER_TIMEOUT_SECS: u64 = 30;

/// Entity label assigned by the tagger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityCategory {
    Org,
    Loc,
    Gpe,
    Per,
    Misc,
    #[serde(other)]
    Other,
}

/// A single tagged span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "word")]
    pub span_text: String,
    #[serde(rename = "entity_group")]
    pub category: EntityCategory,
    pub score: f32,
}

#[cfg(test)]
impl Entity {
    pub fn new(span_text: impl Into<String>, category: EntityCategory, score: f32) -> Self {
        Self {
            span_text: span_text.into(),
            category,
            score,
        }
    }
}

#[derive(Debug, Error)]
pub enum TaggerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<TaggerError> for AppError {
    fn from(e: TaggerError) -> Self {
        AppError::ModelUnavailable(format!("entity tagger failed: {e}"))
    }
}

/// The tagger trait. Implement this to swap the model backend without
/// touching the extractors or handlers.
#[async_trait]
pub trait EntityTagger: Send + Sync {
    async fn tag(&self, text: &str) -> Result<Vec<Entity>, TaggerError>;

    /// Model identifier reported by the health endpoint.
    fn model_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct TagRequest<'a> {
    inputs: &'a str,
    parameters: TagParameters,
}

#[derive(Debug, Serialize)]
struct TagParameters {
    aggregation_strategy: &'static str,
}

/// Tagger backed by a Hugging Face inference-compatible endpoint.
#[derive(Clone)]
pub struct HttpEntityTagger {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl HttpEntityTagger {
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        model: String,
    ) -> Result<Self, TaggerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TAGGER_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl EntityTagger for HttpEntityTagger {
    async fn tag(&self, text: &str) -> Result<Vec<Entity>, TaggerError> {
        let body = TagRequest {
            inputs: text,
            parameters: TagParameters {
                aggregation_strategy: "simple",
            },
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let raw = response.text().await?;

        if !status.is_success() {
            return Err(TaggerError::Api {
                status: status.as_u16(),
                message: raw,
            });
        }

        let entities: Vec<Entity> = serde_json::from_str(&raw)?;
        debug!("Tagger returned {} entities", entities.len());
        Ok(entities)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

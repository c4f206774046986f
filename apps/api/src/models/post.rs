use serde_json::Value;
use sqlx::FromRow;

/// Labelled post as stored by the scraper.
#[derive(Debug, Clone, FromRow)]
pub struct ScrapedPostRow {
    pub post_id: String,
    pub body_text: Option<String>,
    pub potential_outcome: String,
    pub metadata: Option<Value>,
    pub word_count: Option<i32>,
}

#[derive(Debug, Clone, FromRow)]
pub struct OutcomeCountRow {
    pub potential_outcome: Option<String>,
    pub count: i64,
    pub avg_confidence: Option<f64>,
}

//! Hand-engineered features shared by training and prediction.
//!
//! Column order is part of the model: training fixes `feature_names`, and a
//! prediction row is re-aligned to exactly that list before scoring.

use crate::prediction::training::{PostMetadata, TrainingRow};

pub const TECH_COMPANIES: &[&str] = &[
    "google", "meta", "amazon", "microsoft", "apple", "netflix", "tesla", "uber", "airbnb",
    "stripe", "facebook", "faang",
];

pub const TECH_ROLES: &[&str] = &[
    "software engineer",
    "data scientist",
    "product manager",
    "data engineer",
    "ml engineer",
    "devops",
    "sre",
    "frontend",
    "backend",
    "fullstack",
    "full stack",
];

pub const POSITIVE_KEYWORDS: &[&str] = &["offer", "accepted", "hired", "passed", "success"];

pub const NEGATIVE_KEYWORDS: &[&str] = &["rejected", "failed", "ghosted", "denied"];

/// A document to featurize. Borrowed so training rows need no copy.
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    pub body_text: &'a str,
    pub word_count: Option<usize>,
    pub metadata: Option<&'a PostMetadata>,
}

impl<'a> From<&'a TrainingRow> for Document<'a> {
    fn from(row: &'a TrainingRow) -> Self {
        Self {
            body_text: &row.body_text,
            word_count: row.word_count,
            metadata: row.metadata.as_ref(),
        }
    }
}

/// Column-named numeric table, one row per document.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    pub names: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl FeatureTable {
    /// Re-orders every row to `names`: missing columns become 0, extras are dropped.
    pub fn align(&self, names: &[String]) -> Vec<Vec<f64>> {
        let positions: Vec<Option<usize>> = names
            .iter()
            .map(|name| self.names.iter().position(|n| n == name))
            .collect();

        self.rows
            .iter()
            .map(|row| {
                positions
                    .iter()
                    .map(|pos| pos.map(|i| row[i]).unwrap_or(0.0))
                    .collect()
            })
            .collect()
    }
}

fn flag(present: bool) -> f64 {
    if present {
        1.0
    } else {
        0.0
    }
}

/// Builds the feature table. The two metadata count columns are emitted only
/// when at least one document carries metadata.
pub fn extract_features(docs: &[Document<'_>]) -> FeatureTable {
    let with_metadata = docs.iter().any(|d| d.metadata.is_some());

    let mut names = vec!["text_length".to_string(), "word_count".to_string()];
    names.extend(TECH_COMPANIES.iter().map(|c| format!("mentions_{c}")));
    names.extend(TECH_ROLES.iter().map(|r| format!("role_{}", r.replace(' ', "_"))));
    names.extend(POSITIVE_KEYWORDS.iter().map(|k| format!("pos_{k}")));
    names.extend(NEGATIVE_KEYWORDS.iter().map(|k| format!("neg_{k}")));
    if with_metadata {
        names.push("has_companies".to_string());
        names.push("has_technologies".to_string());
    }

    let rows = docs
        .iter()
        .map(|doc| {
            let lower = doc.body_text.to_lowercase();
            let word_count = doc
                .word_count
                .unwrap_or_else(|| doc.body_text.split_whitespace().count());

            let mut row = Vec::with_capacity(names.len());
            row.push(doc.body_text.chars().count() as f64);
            row.push(word_count as f64);
            for phrase in TECH_COMPANIES
                .iter()
                .chain(TECH_ROLES)
                .chain(POSITIVE_KEYWORDS)
                .chain(NEGATIVE_KEYWORDS)
            {
                row.push(flag(lower.contains(phrase)));
            }
            if with_metadata {
                let (companies, technologies) = doc
                    .metadata
                    .map(|m| (m.companies.len(), m.technologies.len()))
                    .unwrap_or((0, 0));
                row.push(companies as f64);
                row.push(technologies as f64);
            }
            row
        })
        .collect();

    FeatureTable { names, rows }
}

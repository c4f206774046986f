//! Field extractors: one pure function per metadata field.
//!
//! Each returns `(value, confidence)` with confidence in `[0, 1]` and `0.0`
//! whenever the value is `None`. Confidences for the pattern-based fields are
//! fixed per source:
//!
//! | field    | source              | confidence |
//! |----------|---------------------|------------|
//! | role     | role pattern        | 0.8        |
//! | level    | level pattern       | 0.9        |
//! | location | keyword / tagger    | 0.8 / 0.7  |
//! | outcome  | keyword             | 0.7        |
//!
//! Company confidence is the share of the winning name among all candidates.
//! Company and location keywords are plain substring matches with no word
//! boundary, so short aliases ("gs", "la") can fire inside longer words.

use crate::extraction::tables::{
    InterviewOutcome, RoleType, COMPANY_ALIASES, LEVEL_PATTERNS, LOCATION_KEYWORDS,
    OUTCOME_KEYWORDS, ROLE_PATTERNS,
};
use crate::extraction::tagger::{Entity, EntityCategory};

pub const ROLE_CONFIDENCE: f64 = 0.8;
pub const LEVEL_CONFIDENCE: f64 = 0.9;
pub const LOCATION_KEYWORD_CONFIDENCE: f64 = 0.8;
pub const LOCATION_ENTITY_CONFIDENCE: f64 = 0.7;
pub const OUTCOME_CONFIDENCE: f64 = 0.7;

pub fn extract_company(text: &str, entities: &[Entity]) -> (Option<String>, f64) {
    let text_lower = text.to_lowercase();

    let candidates: Vec<&str> = entities
        .iter()
        .filter(|e| e.category == EntityCategory::Org)
        .map(|e| e.span_text.as_str())
        .chain(
            COMPANY_ALIASES
                .iter()
                .filter(|(alias, _)| text_lower.contains(alias))
                .map(|(_, canonical)| *canonical),
        )
        .collect();

    if candidates.is_empty() {
        return (None, 0.0);
    }

    // (name, count) in first-seen order; strict `>` keeps the earliest on ties.
    let mut tallies: Vec<(&str, usize)> = Vec::new();
    for name in &candidates {
        match tallies.iter().position(|(n, _)| n == name) {
            Some(i) => tallies[i].1 += 1,
            None => tallies.push((*name, 1)),
        }
    }

    let mut best = tallies[0];
    for tally in &tallies[1..] {
        if tally.1 > best.1 {
            best = *tally;
        }
    }

    let confidence = best.1 as f64 / candidates.len() as f64;
    (Some(best.0.to_string()), confidence)
}

pub fn extract_role_type(text: &str) -> (Option<RoleType>, f64) {
    let text_lower = text.to_lowercase();

    for (role, patterns) in ROLE_PATTERNS.iter() {
        if patterns.iter().any(|re| re.is_match(&text_lower)) {
            return (Some(*role), ROLE_CONFIDENCE);
        }
    }

    (None, 0.0)
}

pub fn extract_level(text: &str) -> (Option<String>, f64) {
    for (pattern, canonicalize) in LEVEL_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            return (Some(canonicalize(&caps)), LEVEL_CONFIDENCE);
        }
    }

    (None, 0.0)
}

/// Keyword lookup wins over tagger output.
pub fn extract_location(text: &str, entities: &[Entity]) -> (Option<String>, f64) {
    let text_lower = text.to_lowercase();

    if let Some((_, canonical)) = LOCATION_KEYWORDS
        .iter()
        .find(|(keyword, _)| text_lower.contains(keyword))
    {
        return (Some(canonical.to_string()), LOCATION_KEYWORD_CONFIDENCE);
    }

    if let Some(entity) = entities
        .iter()
        .find(|e| matches!(e.category, EntityCategory::Loc | EntityCategory::Gpe))
    {
        return (Some(entity.span_text.clone()), LOCATION_ENTITY_CONFIDENCE);
    }

    (None, 0.0)
}

pub fn extract_outcome(text: &str) -> (Option<InterviewOutcome>, f64) {
    let text_lower = text.to_lowercase();

    for (outcome, keywords) in OUTCOME_KEYWORDS {
        if keywords.iter().any(|k| text_lower.contains(k)) {
            return (Some(*outcome), OUTCOME_CONFIDENCE);
        }
    }

    (None, 0.0)
}

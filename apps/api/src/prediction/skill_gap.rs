//! Skill gap analysis: compares a user's skills with a role's static
//! requirement list, weighting gaps by how often each technology shows up in
//! the training posts.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::prediction::stats::ModelStats;
use crate::prediction::training::TrainingRow;

const PRIORITY_SKILL_COUNT: usize = 5;
const LEARNING_PATH_LENGTH: usize = 10;
const WEEKS_PER_PRIORITY_SKILL: usize = 2;

/// Role key → required skills. First key contained in the lower-cased role wins.
const ROLE_REQUIREMENTS: &[(&str, &[&str])] = &[
    (
        "software engineer",
        &[
            "Python", "Java", "JavaScript", "TypeScript", "SQL", "Git", "REST API", "Docker",
            "AWS", "System Design", "Data Structures", "Algorithms", "Testing",
        ],
    ),
    (
        "data scientist",
        &[
            "Python", "R", "SQL", "Machine Learning", "Statistics", "Pandas", "NumPy",
            "Scikit-learn", "TensorFlow", "PyTorch", "Data Visualization", "A/B Testing",
            "Feature Engineering",
        ],
    ),
    (
        "data engineer",
        &[
            "Python", "SQL", "Spark", "Kafka", "Airflow", "ETL", "Data Warehousing", "AWS",
            "Docker", "Kubernetes", "Data Modeling", "Data Pipeline",
        ],
    ),
    (
        "frontend developer",
        &[
            "JavaScript", "TypeScript", "React", "Vue", "Angular", "HTML", "CSS", "Webpack",
            "REST API", "Git", "Responsive Design", "Testing",
        ],
    ),
    (
        "backend developer",
        &[
            "Python", "Java", "Node.js", "SQL", "NoSQL", "REST API", "GraphQL", "Microservices",
            "Docker", "AWS", "System Design", "Caching", "Message Queues",
        ],
    ),
    (
        "product manager",
        &[
            "Product Strategy", "User Research", "A/B Testing", "SQL", "Data Analysis",
            "Roadmapping", "Agile", "Stakeholder Management", "Metrics", "Prioritization",
        ],
    ),
];

const LEARNING_RESOURCES: &[(&str, [&str; 3])] = &[
    ("python", ["Python.org Tutorial", "Real Python", "Python for Everybody"]),
    ("javascript", ["MDN Web Docs", "JavaScript.info", "Eloquent JavaScript"]),
    ("react", ["React Official Docs", "React Tutorial", "Full Stack Open"]),
    ("sql", ["SQLBolt", "Mode Analytics SQL Tutorial", "LeetCode SQL"]),
    ("machine learning", ["Coursera ML Course", "Fast.ai", "Kaggle Learn"]),
    ("system design", ["System Design Primer", "Grokking System Design", "ByteByteGo"]),
    ("docker", ["Docker Docs", "Docker for Beginners", "Play with Docker"]),
    ("aws", ["AWS Free Tier", "AWS Certified Cloud Practitioner", "A Cloud Guru"]),
];

const GENERIC_RESOURCES: [&str; 3] = [
    "Online tutorials",
    "Official documentation",
    "Hands-on projects",
];

const COMPLEX_SKILLS: &[&str] = &[
    "machine learning",
    "system design",
    "data structures",
    "algorithms",
];
const MODERATE_SKILLS: &[&str] = &["python", "java", "javascript", "react", "sql"];

// ────────────────────────────────────────────────────────────────────────────
// Result models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingSkill {
    pub skill: String,
    /// 0 to 100
    pub importance: u32,
    pub frequency: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningPriority {
    High,
    Medium,
    Low,
}

impl LearningPriority {
    fn for_step(step: usize) -> Self {
        match step {
            0..=3 => Self::High,
            4..=7 => Self::Medium,
            _ => Self::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LearningStep {
    pub step: usize,
    pub skill: String,
    pub resources: Vec<String>,
    pub estimated_hours: u32,
    pub priority: LearningPriority,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillGapResult {
    pub missing_skills: Vec<MissingSkill>,
    pub priority_skills: Vec<String>,
    pub learning_path: Vec<LearningStep>,
    pub estimated_time_weeks: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillGapRequest {
    pub user_skills: Vec<String>,
    pub target_role: String,
    #[serde(default)]
    pub target_companies: Option<Vec<String>>,
}

/// Lower-cased technology → number of mentions across the training posts.
#[derive(Debug, Clone, Default)]
pub struct SkillFrequencyTable {
    frequencies: HashMap<String, u32>,
    training_samples: usize,
    last_trained: Option<DateTime<Utc>>,
}

impl SkillFrequencyTable {
    fn frequency(&self, skill: &str) -> u32 {
        self.frequencies
            .get(&skill.to_lowercase())
            .copied()
            .unwrap_or(1)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Analyzer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct SkillGapAnalyzer {
    table: RwLock<Arc<SkillFrequencyTable>>,
}

impl SkillGapAnalyzer {
    /// Rebuilds the frequency table from the metadata technologies of `rows`.
    pub fn fit(&self, rows: &[TrainingRow]) -> Result<(), AppError> {
        if rows.is_empty() {
            return Err(AppError::Training(
                "cannot build skill frequencies from an empty dataset".to_string(),
            ));
        }

        let mut frequencies: HashMap<String, u32> = HashMap::new();
        for technology in rows
            .iter()
            .filter_map(|r| r.metadata.as_ref())
            .flat_map(|m| m.technologies.iter())
        {
            *frequencies.entry(technology.to_lowercase()).or_default() += 1;
        }

        info!("Analyzed {} unique skills", frequencies.len());

        *self.table.write() = Arc::new(SkillFrequencyTable {
            frequencies,
            training_samples: rows.len(),
            last_trained: Some(Utc::now()),
        });
        Ok(())
    }

    /// `target_companies` is accepted for API compatibility and does not
    /// influence the result.
    pub fn analyze(
        &self,
        user_skills: &[String],
        target_role: &str,
        _target_companies: Option<&[String]>,
    ) -> SkillGapResult {
        let table = self.table.read().clone();

        let owned: HashSet<String> = user_skills
            .iter()
            .map(|s| s.trim().to_lowercase())
            .collect();

        let mut missing_skills: Vec<MissingSkill> = role_requirements(target_role)
            .iter()
            .filter(|skill| !owned.contains(&skill.to_lowercase()))
            .map(|skill| {
                let frequency = table.frequency(skill);
                MissingSkill {
                    skill: skill.to_string(),
                    importance: frequency.saturating_mul(10).min(100),
                    frequency,
                }
            })
            .collect();

        // Stable, so equal importance keeps the role table's order.
        missing_skills.sort_by(|a, b| b.importance.cmp(&a.importance));

        let priority_skills: Vec<String> = missing_skills
            .iter()
            .take(PRIORITY_SKILL_COUNT)
            .map(|m| m.skill.clone())
            .collect();

        let learning_path = missing_skills
            .iter()
            .take(LEARNING_PATH_LENGTH)
            .enumerate()
            .map(|(i, m)| LearningStep {
                step: i + 1,
                skill: m.skill.clone(),
                resources: learning_resources(&m.skill),
                estimated_hours: estimate_learning_hours(&m.skill),
                priority: LearningPriority::for_step(i + 1),
            })
            .collect();

        SkillGapResult {
            estimated_time_weeks: priority_skills.len() * WEEKS_PER_PRIORITY_SKILL,
            missing_skills,
            priority_skills,
            learning_path,
        }
    }

    pub fn stats(&self) -> ModelStats {
        let table = self.table.read().clone();
        ModelStats {
            model_type: "SkillGapAnalyzer".to_string(),
            training_samples: table.training_samples,
            last_trained: table.last_trained,
            accuracy: None,
            features_used: vec!["skill_frequency".to_string(), "role_requirements".to_string()],
        }
    }
}

/// Required skills for a role; unknown roles get the software engineer list.
pub fn role_requirements(role: &str) -> &'static [&'static str] {
    let role = role.to_lowercase();
    ROLE_REQUIREMENTS
        .iter()
        .find(|(key, _)| role.contains(key))
        .map(|(_, skills)| *skills)
        .unwrap_or(ROLE_REQUIREMENTS[0].1)
}

fn learning_resources(skill: &str) -> Vec<String> {
    let skill = skill.to_lowercase();
    let resources = LEARNING_RESOURCES
        .iter()
        .find(|(key, _)| skill.contains(key))
        .map(|(_, res)| res)
        .unwrap_or(&GENERIC_RESOURCES);
    resources.iter().map(|r| r.to_string()).collect()
}

fn estimate_learning_hours(skill: &str) -> u32 {
    let skill = skill.to_lowercase();
    if COMPLEX_SKILLS.iter().any(|s| skill.contains(s)) {
        80
    } else if MODERATE_SKILLS.iter().any(|s| skill.contains(s)) {
        40
    } else {
        20
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::training::tests::{sample, separable_dataset};
    use crate::prediction::training::TrainingOutcome;

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_data_scientist_gap_untrained() {
        let analyzer = SkillGapAnalyzer::default();
        let result = analyzer.analyze(&skills(&["Python", " sql "]), "Data Scientist", None);

        let missing: Vec<&str> = result.missing_skills.iter().map(|m| m.skill.as_str()).collect();
        assert_eq!(missing.len(), 11);
        assert_eq!(&missing[..3], &["R", "Machine Learning", "Statistics"]);
        assert!(!missing.contains(&"Python"));
        assert!(!missing.contains(&"SQL"));

        assert!(result.missing_skills.iter().all(|m| m.frequency == 1 && m.importance == 10));
        assert_eq!(result.priority_skills.len(), 5);
        assert_eq!(result.estimated_time_weeks, 10);
        assert_eq!(result.learning_path.len(), 10);
    }

    #[test]
    fn test_learning_path_details() {
        let analyzer = SkillGapAnalyzer::default();
        let result = analyzer.analyze(&[], "data scientist", None);
        let path = &result.learning_path;

        assert_eq!(path[0].step, 1);
        assert_eq!(path[0].skill, "Python");
        assert_eq!(path[0].resources[0], "Python.org Tutorial");
        assert_eq!(path[0].estimated_hours, 40);
        assert_eq!(path[3].skill, "Machine Learning");
        assert_eq!(path[3].estimated_hours, 80);
        assert_eq!(path[1].skill, "R");
        assert_eq!(path[1].estimated_hours, 20);
        assert_eq!(path[1].resources, skills(&GENERIC_RESOURCES));

        assert_eq!(path[2].priority, LearningPriority::High);
        assert_eq!(path[3].priority, LearningPriority::Medium);
        assert_eq!(path[6].priority, LearningPriority::Medium);
        assert_eq!(path[7].priority, LearningPriority::Low);
    }

    #[test]
    fn test_no_gap_means_no_weeks() {
        let analyzer = SkillGapAnalyzer::default();
        let all = skills(role_requirements("product manager"));
        let result = analyzer.analyze(&all, "Senior Product Manager", None);
        assert!(result.missing_skills.is_empty());
        assert!(result.priority_skills.is_empty());
        assert_eq!(result.estimated_time_weeks, 0);
    }

    #[test]
    fn test_role_lookup() {
        assert_eq!(role_requirements("Backend Developer II")[2], "Node.js");
        assert_eq!(role_requirements("astronaut"), role_requirements("software engineer"));
    }

    #[test]
    fn test_fit_reorders_by_frequency() {
        let analyzer = SkillGapAnalyzer::default();
        let mut rows = separable_dataset();
        rows.push(sample("spark job", TrainingOutcome::Negative, &["Spark", "spark"]));
        analyzer.fit(&rows).unwrap();

        let result = analyzer.analyze(&[], "data engineer", None);
        // python: 40 mentions, sql: 20, spark: 2
        assert_eq!(result.missing_skills[0].skill, "Python");
        assert_eq!(result.missing_skills[0].importance, 100);
        assert_eq!(result.missing_skills[0].frequency, 40);
        assert_eq!(result.missing_skills[1].skill, "SQL");
        assert_eq!(result.missing_skills[2].skill, "Spark");
        assert_eq!(result.missing_skills[2].importance, 20);

        let stats = analyzer.stats();
        assert_eq!(stats.training_samples, 41);
        assert!(stats.last_trained.is_some());
        assert!(stats.accuracy.is_none());
    }

    #[test]
    fn test_empty_fit_keeps_previous_table() {
        let analyzer = SkillGapAnalyzer::default();
        analyzer.fit(&separable_dataset()).unwrap();
        assert!(matches!(analyzer.fit(&[]), Err(AppError::Training(_))));
        assert_eq!(analyzer.stats().training_samples, 40);
    }

    #[test]
    fn test_target_companies_do_not_change_result() {
        let analyzer = SkillGapAnalyzer::default();
        let companies = skills(&["Google"]);
        assert_eq!(
            analyzer.analyze(&[], "software engineer", Some(&companies)),
            analyzer.analyze(&[], "software engineer", None)
        );
    }
}

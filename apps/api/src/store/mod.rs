//! Career data store: where profile, experiences, skills and education come
//! from, and where finished CVs are written back to.
//!
//! Two backends implement `CareerStore`: Notion (the default) and Postgres.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::career::{EducationRecord, ExperienceRecord, Profile, SkillRecord};
use crate::models::cv::CvPayload;

pub mod notion;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Source of canonical career records and sink for generated CVs.
#[async_trait]
pub trait CareerStore: Send + Sync {
    /// Short backend name for logs and `/health`.
    fn backend(&self) -> &'static str;

    async fn fetch_profile(&self) -> Result<Profile, StoreError>;

    async fn fetch_experiences(&self) -> Result<Vec<ExperienceRecord>, StoreError>;

    /// May be empty when the backend keeps no skills table.
    async fn fetch_skills(&self) -> Result<Vec<SkillRecord>, StoreError>;

    async fn fetch_education(&self) -> Result<Vec<EducationRecord>, StoreError>;

    /// Persists a generated CV and returns its URL or identifier.
    async fn write_document(
        &self,
        profile: &Profile,
        payload: &CvPayload,
    ) -> Result<String, StoreError>;
}

/// Builds a skill list from experience tech tags when the store has none.
/// First-seen order, exact-string dedup, no synonyms.
pub fn derive_skills_from_experiences(experiences: &[ExperienceRecord]) -> Vec<SkillRecord> {
    let mut seen = std::collections::HashSet::new();
    experiences
        .iter()
        .flat_map(|exp| exp.tech.iter())
        .filter(|tag| !tag.is_empty() && seen.insert(tag.as_str()))
        .map(|tag| SkillRecord {
            name: tag.clone(),
            category: Some(categorize_skill(tag).to_string()),
            synonyms: Vec::new(),
        })
        .collect()
}

/// Keyword categoriser for derived skills. Rules are checked in order and
/// match on substrings, so "Kubernetes" lands in Mobile/Frontend via "rn".
pub fn categorize_skill(name: &str) -> &'static str {
    const RULES: &[(&[&str], &str)] = &[
        (&["react", "rn"], "Mobile/Frontend"),
        (&["android", "ios", "swift", "kotlin"], "Mobile"),
        (&["node", "nest", "express"], "Backend"),
        (&["aws", "gcp", "azure", "cloud"], "Cloud"),
        (&["ci", "jest", "testing", "cypress"], "Tooling/QA"),
        (&["typescript", "javascript", "python"], "Languages"),
        (&["docker", "kubernetes", "k8s"], "DevOps"),
        (&["graphql", "rest", "api"], "APIs"),
        (&["postgres", "mongo", "sql"], "Databases"),
    ];

    let lower = name.to_lowercase();
    RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| lower.contains(n)))
        .map(|(_, category)| *category)
        .unwrap_or("Other")
}

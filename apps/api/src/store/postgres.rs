//! Postgres-backed `CareerStore`. Schema lives in `migrations/0001_career.sql`.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::document;
use crate::models::career::{non_blank, EducationRecord, ExperienceRecord, Profile, SkillRecord};
use crate::models::cv::CvPayload;
use crate::store::{CareerStore, StoreError};

#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub full_name: String,
    pub title: String,
    pub location: String,
    pub email: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
    pub summary: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct ExperienceRow {
    pub id: Uuid,
    pub name: String,
    pub company: String,
    pub role: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub summary: String,
    pub responsibilities: String,
    pub achievements: String,
    pub tech: Vec<String>,
    pub industry: Option<String>,
    pub seniority: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct SkillRow {
    pub name: String,
    pub category: Option<String>,
    pub synonyms: Vec<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct EducationRow {
    pub name: String,
    pub kind: String,
    pub org: Option<String>,
    pub year: Option<String>,
    pub details: Option<String>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            full_name: row.full_name,
            title: row.title,
            location: row.location,
            email: row.email,
            linkedin: row.linkedin,
            github: row.github,
            portfolio: row.portfolio,
            summary: row.summary,
        }
    }
}

impl From<ExperienceRow> for ExperienceRecord {
    fn from(row: ExperienceRow) -> Self {
        ExperienceRecord {
            id: row.id.to_string(),
            name: row.name,
            company: row.company,
            role: row.role,
            start_date: row.start_date,
            end_date: row.end_date,
            summary: row.summary,
            responsibilities: row.responsibilities,
            achievements: row.achievements,
            tech: row.tech.into_iter().filter(|t| !t.is_empty()).collect(),
            industry: non_blank(row.industry),
            seniority: non_blank(row.seniority),
        }
    }
}

impl From<SkillRow> for SkillRecord {
    fn from(row: SkillRow) -> Self {
        SkillRecord {
            name: row.name,
            category: non_blank(row.category),
            synonyms: row
                .synonyms
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

impl From<EducationRow> for EducationRecord {
    fn from(row: EducationRow) -> Self {
        EducationRecord {
            name: row.name,
            kind: row.kind,
            org: non_blank(row.org),
            year: non_blank(row.year),
            details: non_blank(row.details),
        }
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CareerStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn fetch_profile(&self) -> Result<Profile, StoreError> {
        sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT full_name, title, location, email, linkedin, github, portfolio, summary
            FROM profiles
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?
        .map(Profile::from)
        .ok_or_else(|| StoreError::NotFound("No profile found in profiles table".into()))
    }

    async fn fetch_experiences(&self) -> Result<Vec<ExperienceRecord>, StoreError> {
        let rows = sqlx::query_as::<_, ExperienceRow>(
            r#"
            SELECT id, name, company, role, start_date, end_date, summary,
                   responsibilities, achievements, tech, industry, seniority
            FROM experiences
            ORDER BY start_date DESC NULLS LAST, position ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ExperienceRecord::from).collect())
    }

    async fn fetch_skills(&self) -> Result<Vec<SkillRecord>, StoreError> {
        let rows = sqlx::query_as::<_, SkillRow>(
            "SELECT name, category, synonyms FROM skills ORDER BY position ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(SkillRecord::from).collect())
    }

    async fn fetch_education(&self) -> Result<Vec<EducationRecord>, StoreError> {
        let rows = sqlx::query_as::<_, EducationRow>(
            "SELECT name, kind, org, year, details FROM education ORDER BY position ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(EducationRecord::from).collect())
    }

    async fn write_document(
        &self,
        profile: &Profile,
        payload: &CvPayload,
    ) -> Result<String, StoreError> {
        let id = Uuid::new_v4();
        let title = document::page_title(profile, Utc::now().date_naive());

        sqlx::query("INSERT INTO cv_documents (id, title, payload) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(&title)
            .bind(Json(payload))
            .execute(&self.pool)
            .await?;

        info!(%id, %title, "CV document stored in Postgres");
        Ok(format!("cv_documents/{id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_row_blanks_become_none() {
        let row = ExperienceRow {
            id: Uuid::nil(),
            name: "Checkout".to_string(),
            company: "Acme".to_string(),
            role: "Engineer".to_string(),
            start_date: NaiveDate::from_ymd_opt(2021, 1, 1),
            end_date: None,
            summary: String::new(),
            responsibilities: String::new(),
            achievements: String::new(),
            tech: vec!["Rust".to_string(), String::new()],
            industry: Some(" ".to_string()),
            seniority: Some("Senior".to_string()),
        };
        let record = ExperienceRecord::from(row);
        assert_eq!(record.id, "00000000-0000-0000-0000-000000000000");
        assert_eq!(record.tech, vec!["Rust"]);
        assert_eq!(record.industry, None);
        assert_eq!(record.seniority.as_deref(), Some("Senior"));
        assert_eq!(record.end_date, None);
    }

    #[test]
    fn test_skill_row_trims_synonyms() {
        let record = SkillRecord::from(SkillRow {
            name: "GraphQL".to_string(),
            category: Some(String::new()),
            synonyms: vec![" gql ".to_string(), "".to_string()],
        });
        assert_eq!(record.category, None);
        assert_eq!(record.synonyms, vec!["gql"]);
    }

    #[test]
    fn test_education_row_keeps_kind_verbatim() {
        let record = EducationRecord::from(EducationRow {
            name: "AWS SAA".to_string(),
            kind: "Certificate".to_string(),
            org: Some("AWS".to_string()),
            year: Some(String::new()),
            details: None,
        });
        assert_eq!(record.kind, "Certificate");
        assert_eq!(record.year, None);
    }
}

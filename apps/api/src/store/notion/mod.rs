//! Notion-backed `CareerStore`.
//!
//! Reads four databases (profile, experiences, optional skills, education)
//! through the database query endpoint and writes each CV as a child page of
//! a configured parent page.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::NotionConfig;
use crate::document;
use crate::models::career::{EducationRecord, ExperienceRecord, Profile, SkillRecord};
use crate::models::cv::CvPayload;
use crate::store::{CareerStore, StoreError};

pub mod normalize;

pub const NOTION_API_URL: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";
/// Notion caps query pages at 100 results.
const PAGE_SIZE: u32 = 100;

/// Sort properties tried in order for experiences; `None` means unsorted.
const EXPERIENCE_SORTS: &[Option<&str>] = &[Some("Start Date"), Some("Start"), None];

#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NotionErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct NotionStore {
    client: Client,
    config: NotionConfig,
    base_url: String,
}

impl NotionStore {
    pub fn new(config: NotionConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            config,
            base_url: NOTION_API_URL.to_string(),
        }
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, StoreError> {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, path))
            .bearer_auth(&self.config.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<NotionErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Follows `next_cursor` until the database is exhausted, or stops after
    /// the first page when `limit` is set.
    async fn query(
        &self,
        database_id: &str,
        sort_property: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<Value>, StoreError> {
        let mut results = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({ "page_size": limit.unwrap_or(PAGE_SIZE) });
            if let Some(property) = sort_property {
                body["sorts"] = json!([{ "property": property, "direction": "descending" }]);
            }
            if let Some(c) = &cursor {
                body["start_cursor"] = json!(c);
            }

            let value = self
                .post(&format!("databases/{database_id}/query"), &body)
                .await?;
            let page: QueryResponse = serde_json::from_value(value)?;
            results.extend(page.results);

            match page.next_cursor {
                Some(next) if page.has_more && limit.is_none() => cursor = Some(next),
                _ => break,
            }
        }

        debug!(database_id, count = results.len(), "Notion query complete");
        Ok(results)
    }
}

#[async_trait]
impl CareerStore for NotionStore {
    fn backend(&self) -> &'static str {
        "notion"
    }

    async fn fetch_profile(&self) -> Result<Profile, StoreError> {
        let pages = self.query(&self.config.profile_db, None, Some(1)).await?;
        let page = pages
            .first()
            .ok_or_else(|| StoreError::NotFound("No profile found in profile database".into()))?;
        Ok(normalize::profile_from_page(page))
    }

    async fn fetch_experiences(&self) -> Result<Vec<ExperienceRecord>, StoreError> {
        let mut last_error = None;

        for sort in EXPERIENCE_SORTS {
            match self.query(&self.config.experiences_db, *sort, None).await {
                Ok(pages) => {
                    return Ok(pages.iter().map(normalize::experience_from_page).collect())
                }
                // 400 means the sort property does not exist in this database
                Err(StoreError::Api { status: 400, message }) => {
                    warn!(sort = ?sort, "Experience query rejected: {message}");
                    last_error = Some(StoreError::Api {
                        status: 400,
                        message,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            StoreError::NotFound("Experience database could not be queried".into())
        }))
    }

    async fn fetch_skills(&self) -> Result<Vec<SkillRecord>, StoreError> {
        let Some(skills_db) = self.config.skills_db.as_deref() else {
            debug!("No skills database configured");
            return Ok(Vec::new());
        };
        let pages = self.query(skills_db, None, None).await?;
        Ok(pages.iter().map(normalize::skill_from_page).collect())
    }

    async fn fetch_education(&self) -> Result<Vec<EducationRecord>, StoreError> {
        let pages = self.query(&self.config.education_db, None, None).await?;
        Ok(pages.iter().map(normalize::education_from_page).collect())
    }

    async fn write_document(
        &self,
        profile: &Profile,
        payload: &CvPayload,
    ) -> Result<String, StoreError> {
        let parent = self.config.cv_parent_page.as_deref().ok_or_else(|| {
            StoreError::MissingConfig(
                "NOTION_CV_PARENT_PAGE_ID is not set; create a parent page for generated CVs"
                    .into(),
            )
        })?;

        let title = document::page_title(profile, Utc::now().date_naive());
        let body = json!({
            "parent": { "page_id": parent },
            "properties": {
                "title": { "title": [{ "text": { "content": title } }] }
            },
            "children": document::cv_blocks(profile, payload),
        });

        let page = self.post("pages", &body).await?;
        let url = page
            .get("url")
            .or_else(|| page.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| StoreError::NotFound("Created page has no url".into()))?;

        info!(%title, %url, "CV page created in Notion");
        Ok(url)
    }
}

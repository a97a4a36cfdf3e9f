//! Cache and output shapes for the PR miner.
//!
//! Top-level PR fields are camelCase and sub-resources keep GitHub's
//! snake_case, so caches written by earlier runs load unchanged.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub body: String,
    pub created_at: String,
    #[serde(default)]
    pub closed_at: Option<String>,
    #[serde(default)]
    pub details: Option<PrDetails>,
    #[serde(default)]
    pub comments: Vec<IssueComment>,
    #[serde(default)]
    pub review_comments: Vec<ReviewComment>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub files: Vec<PrFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrDetails {
    pub additions: u64,
    pub deletions: u64,
    pub changed_files: u64,
    pub commits: u64,
    #[serde(default)]
    pub mergeable: Option<bool>,
    #[serde(default)]
    pub merged_at: Option<String>,
    #[serde(default)]
    pub merged_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueComment {
    pub id: u64,
    pub user: String,
    #[serde(default)]
    pub body: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewComment {
    pub id: u64,
    pub user: String,
    #[serde(default)]
    pub body: String,
    pub path: String,
    #[serde(default)]
    pub line: Option<u64>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: u64,
    pub user: String,
    #[serde(default)]
    pub body: String,
    pub state: String,
    #[serde(default)]
    pub submitted_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrFile {
    pub filename: String,
    pub status: String,
    pub additions: u64,
    pub deletions: u64,
    pub changes: u64,
    #[serde(default)]
    pub patch: Option<String>,
}

/// A cluster of related PRs, shaped for import into the career store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubProject {
    pub title: String,
    #[serde(default)]
    pub time_frame: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub impact: Vec<String>,
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default)]
    pub metrics: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub related_prs: Vec<PrRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrRef {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pull_request_uses_cache_field_names() {
        let pr = PullRequest {
            number: 7,
            title: "Add Apple Pay".to_string(),
            url: "https://github.com/acme/app/pull/7".to_string(),
            body: String::new(),
            created_at: "2023-01-05T10:00:00Z".to_string(),
            closed_at: None,
            details: None,
            comments: Vec::new(),
            review_comments: Vec::new(),
            reviews: Vec::new(),
            files: Vec::new(),
        };
        let value = serde_json::to_value(&pr).unwrap();
        assert_eq!(value["createdAt"], "2023-01-05T10:00:00Z");
        assert!(value.get("reviewComments").is_some());
        assert!(value["closedAt"].is_null());
    }

    #[test]
    fn test_sub_project_tolerates_missing_lists() {
        let project: SubProject = serde_json::from_value(json!({
            "title": "Apple Pay Integration",
            "timeFrame": "Jan 2023 - Mar 2023",
            "relatedPrs": [{"number": 7, "title": "Add Apple Pay", "url": "https://x"}]
        }))
        .unwrap();
        assert_eq!(project.time_frame, "Jan 2023 - Mar 2023");
        assert!(project.metrics.is_empty());
        assert_eq!(project.related_prs[0].number, 7);
    }
}

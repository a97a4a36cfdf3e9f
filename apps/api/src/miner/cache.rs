//! On-disk PR cache. A missing or unreadable cache means "fetch again".

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use crate::miner::models::PullRequest;

pub fn default_cache_file(repo: &str) -> PathBuf {
    PathBuf::from(format!("prs-cache-{repo}.json"))
}

pub fn default_output_file(repo: &str) -> PathBuf {
    PathBuf::from(format!("subprojects-{repo}.json"))
}

pub async fn load(path: &Path) -> Option<Vec<PullRequest>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cache unreadable, ignoring it");
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(prs) => Some(prs),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cache is not valid PR JSON, ignoring it");
            None
        }
    }
}

pub async fn save(path: &Path, prs: &[PullRequest]) -> Result<()> {
    write_pretty(path, prs).await
}

/// Writes `value` as indented JSON.
pub async fn write_pretty<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pr(number: u64) -> PullRequest {
        PullRequest {
            number,
            title: format!("PR {number}"),
            url: format!("https://github.com/acme/app/pull/{number}"),
            body: String::new(),
            created_at: "2023-01-05T10:00:00Z".to_string(),
            closed_at: None,
            details: None,
            comments: Vec::new(),
            review_comments: Vec::new(),
            reviews: Vec::new(),
            files: Vec::new(),
        }
    }

    #[test]
    fn test_default_file_names_include_repo() {
        assert_eq!(default_cache_file("app"), PathBuf::from("prs-cache-app.json"));
        assert_eq!(default_output_file("app"), PathBuf::from("subprojects-app.json"));
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        save(&path, &[pr(1), pr(2)]).await.unwrap();

        let loaded = load(&path).await.unwrap();
        assert_eq!(loaded, vec![pr(1), pr(2)]);
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n  {"));
    }

    #[tokio::test]
    async fn test_missing_cache_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("absent.json")).await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_cache_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(load(&path).await.is_none());
    }

    #[tokio::test]
    async fn test_loads_cache_with_sub_resources() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(
            &path,
            r#"[{
                "number": 9, "title": "Fix crash", "url": "https://x/9", "body": "",
                "createdAt": "2023-03-01T00:00:00Z", "closedAt": "2023-03-02T00:00:00Z",
                "details": {"additions": 3, "deletions": 1, "changed_files": 1, "commits": 1,
                            "mergeable": null, "merged_at": "2023-03-02T00:00:00Z", "merged_by": "ada"},
                "comments": [{"id": 1, "user": "bob", "body": "lgtm", "created_at": "2023-03-01T01:00:00Z"}],
                "reviewComments": [],
                "reviews": [{"id": 2, "user": "bob", "body": "", "state": "APPROVED", "submitted_at": "2023-03-01T02:00:00Z"}],
                "files": [{"filename": "a.ts", "status": "modified", "additions": 3, "deletions": 1, "changes": 4}]
            }]"#,
        )
        .unwrap();

        let loaded = load(&path).await.unwrap();
        assert_eq!(loaded[0].details.as_ref().unwrap().merged_by.as_deref(), Some("ada"));
        assert_eq!(loaded[0].reviews[0].state, "APPROVED");
        assert_eq!(loaded[0].files[0].patch, None);
    }
}

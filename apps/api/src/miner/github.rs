//! GitHub REST client for the PR miner.
//!
//! The search endpoint is authoritative: a failed search page aborts the run.
//! Per-PR sub-resources are best effort and degrade to `None` or an empty
//! list with a warning.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::miner::models::{IssueComment, PrDetails, PrFile, PullRequest, Review, ReviewComment};

pub const GITHUB_API_URL: &str = "https://api.github.com";
/// Largest page the search endpoint serves.
pub const PER_PAGE: u32 = 100;
const USER_AGENT: &str = concat!("tailor-pr-miner/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

// Raw API shapes. Only the fields the cache keeps are read.

#[derive(Debug, Deserialize)]
struct SearchResponse {
    total_count: u64,
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    number: u64,
    title: String,
    html_url: String,
    body: Option<String>,
    created_at: String,
    closed_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ApiPull {
    additions: u64,
    deletions: u64,
    changed_files: u64,
    commits: u64,
    mergeable: Option<bool>,
    merged_at: Option<String>,
    merged_by: Option<ApiUser>,
}

#[derive(Debug, Deserialize)]
struct ApiComment {
    id: u64,
    user: Option<ApiUser>,
    body: Option<String>,
    created_at: String,
}

#[derive(Debug, Deserialize)]
struct ApiReviewComment {
    id: u64,
    user: Option<ApiUser>,
    body: Option<String>,
    path: String,
    line: Option<u64>,
    created_at: String,
}

#[derive(Debug, Deserialize)]
struct ApiReview {
    id: u64,
    user: Option<ApiUser>,
    body: Option<String>,
    state: String,
    submitted_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiFile {
    filename: String,
    status: String,
    additions: u64,
    deletions: u64,
    changes: u64,
    patch: Option<String>,
}

fn login(user: Option<ApiUser>) -> String {
    user.map(|u| u.login).unwrap_or_default()
}

impl From<SearchItem> for PullRequest {
    fn from(item: SearchItem) -> Self {
        PullRequest {
            number: item.number,
            title: item.title,
            url: item.html_url,
            body: item.body.unwrap_or_default(),
            created_at: item.created_at,
            closed_at: item.closed_at,
            details: None,
            comments: Vec::new(),
            review_comments: Vec::new(),
            reviews: Vec::new(),
            files: Vec::new(),
        }
    }
}

/// One page of search results.
#[derive(Debug)]
pub struct SearchPage {
    pub prs: Vec<PullRequest>,
    pub total_count: u64,
}

pub fn search_query(owner: &str, repo: &str, author: &str) -> String {
    format!("repo:{owner}/{repo} type:pr author:{author} is:merged")
}

/// Number of search pages needed for `total_count` results.
pub fn total_pages(total_count: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    total_count.div_ceil(per_page as u64) as u32
}

#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    token: String,
    base_url: String,
}

impl GithubClient {
    pub fn new(token: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to build HTTP client"),
            token,
            base_url: GITHUB_API_URL.to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, GithubError> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, path))
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GithubError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    pub async fn search_merged_prs(
        &self,
        owner: &str,
        repo: &str,
        author: &str,
        page: u32,
    ) -> Result<SearchPage, GithubError> {
        let query = [
            ("q", search_query(owner, repo, author)),
            ("per_page", PER_PAGE.to_string()),
            ("page", page.to_string()),
            ("sort", "created".to_string()),
            ("order", "desc".to_string()),
        ];
        let response: SearchResponse = self.get_json("search/issues", &query).await?;

        Ok(SearchPage {
            prs: response.items.into_iter().map(PullRequest::from).collect(),
            total_count: response.total_count,
        })
    }

    /// Walks every search page, sized from the first page's `total_count`.
    pub async fn fetch_all_merged_prs(
        &self,
        owner: &str,
        repo: &str,
        author: &str,
    ) -> Result<Vec<PullRequest>, GithubError> {
        let first = self.search_merged_prs(owner, repo, author, 1).await?;
        info!(total = first.total_count, "Merged PRs found");

        let pages = total_pages(first.total_count, PER_PAGE);
        let mut prs = first.prs;

        for page in 2..=pages {
            let batch = self.search_merged_prs(owner, repo, author, page).await?;
            prs.extend(batch.prs);
            debug!(page, pages, accumulated = prs.len(), "Search page fetched");
        }

        Ok(prs)
    }

    /// Attaches details, comments, review comments, reviews and files to `pr`.
    pub async fn fetch_complete(&self, owner: &str, repo: &str, pr: PullRequest) -> PullRequest {
        let number = pr.number;
        let pulls = format!("repos/{owner}/{repo}/pulls/{number}");
        let issue_comments = format!("repos/{owner}/{repo}/issues/{number}/comments");
        let review_comments = format!("{pulls}/comments");
        let reviews = format!("{pulls}/reviews");
        let files = format!("{pulls}/files");

        let (details, comments, review_comments, reviews, files) = tokio::join!(
            self.get_json::<ApiPull>(&pulls, &[]),
            self.get_json::<Vec<ApiComment>>(&issue_comments, &[]),
            self.get_json::<Vec<ApiReviewComment>>(&review_comments, &[]),
            self.get_json::<Vec<ApiReview>>(&reviews, &[]),
            self.get_json::<Vec<ApiFile>>(&files, &[]),
        );

        let details = best_effort(number, "details", details.map(Some), None).map(|d| PrDetails {
            additions: d.additions,
            deletions: d.deletions,
            changed_files: d.changed_files,
            commits: d.commits,
            mergeable: d.mergeable,
            merged_at: d.merged_at,
            merged_by: d.merged_by.map(|u| u.login),
        });

        let comments = best_effort(number, "comments", comments, Vec::new())
            .into_iter()
            .map(|c| IssueComment {
                id: c.id,
                user: login(c.user),
                body: c.body.unwrap_or_default(),
                created_at: c.created_at,
            })
            .collect();

        let review_comments = best_effort(number, "review comments", review_comments, Vec::new())
            .into_iter()
            .map(|c| ReviewComment {
                id: c.id,
                user: login(c.user),
                body: c.body.unwrap_or_default(),
                path: c.path,
                line: c.line,
                created_at: c.created_at,
            })
            .collect();

        let reviews = best_effort(number, "reviews", reviews, Vec::new())
            .into_iter()
            .map(|r| Review {
                id: r.id,
                user: login(r.user),
                body: r.body.unwrap_or_default(),
                state: r.state,
                submitted_at: r.submitted_at,
            })
            .collect();

        let files = best_effort(number, "files", files, Vec::new())
            .into_iter()
            .map(|f| PrFile {
                filename: f.filename,
                status: f.status,
                additions: f.additions,
                deletions: f.deletions,
                changes: f.changes,
                patch: f.patch,
            })
            .collect();

        PullRequest {
            details,
            comments,
            review_comments,
            reviews,
            files,
            ..pr
        }
    }
}

fn best_effort<T>(number: u64, what: &str, result: Result<T, GithubError>, fallback: T) -> T {
    result.unwrap_or_else(|e| {
        warn!(pr = number, error = %e, "Failed to fetch PR {what}");
        fallback
    })
}

//! Job page fetcher: downloads a posting and reduces it to plain text.

use std::sync::OnceLock;

use regex::Regex;
use reqwest::{Client, Url};
use thiserror::Error;
use tracing::{debug, error};

const USER_AGENT: &str = concat!("tailor-api/", env!("CARGO_PKG_VERSION"));
/// Upper bound on extracted text, in characters.
pub const MAX_TEXT_CHARS: usize = 20_000;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Invalid job URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to fetch job page: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Job page returned status {status}")]
    Status { status: u16 },
}

#[derive(Clone)]
pub struct JobPageFetcher {
    client: Client,
}

impl JobPageFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    /// Fetches `url` and returns its visible text. An empty URL yields an
    /// empty string without any request.
    pub async fn fetch_text(&self, url: &str) -> Result<String, ScrapeError> {
        if url.trim().is_empty() {
            return Ok(String::new());
        }
        let parsed = Url::parse(url).map_err(|e| ScrapeError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            error!(url, %status, "Job page fetch failed");
            return Err(ScrapeError::Status {
                status: status.as_u16(),
            });
        }

        let html = response.text().await?;
        let text = strip_markup(&html);
        debug!(url, chars = text.chars().count(), "Job page scraped");
        Ok(text)
    }
}

impl Default for JobPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

struct MarkupPatterns {
    script: Regex,
    style: Regex,
    tag: Regex,
    whitespace: Regex,
}

fn patterns() -> &'static MarkupPatterns {
    static PATTERNS: OnceLock<MarkupPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| MarkupPatterns {
        script: Regex::new(r"(?is)<script.*?</script>").expect("script pattern is valid"),
        style: Regex::new(r"(?is)<style.*?</style>").expect("style pattern is valid"),
        tag: Regex::new(r"<[^>]+>").expect("tag pattern is valid"),
        whitespace: Regex::new(r"\s+").expect("whitespace pattern is valid"),
    })
}

/// Drops script/style blocks and tags, collapses whitespace, trims, and
/// truncates to `MAX_TEXT_CHARS` characters.
pub fn strip_markup(html: &str) -> String {
    let p = patterns();
    let text = p.script.replace_all(html, " ");
    let text = p.style.replace_all(&text, " ");
    let text = p.tag.replace_all(&text, " ");
    let text = p.whitespace.replace_all(&text, " ");
    text.trim().chars().take(MAX_TEXT_CHARS).collect()
}

//! PR miner: collects a user's merged PRs from GitHub, caches them to disk,
//! and clusters them into CV sub-projects through the generation service.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::MinerConfig;
use crate::llm_client::output::GenerationOutput;
use crate::llm_client::TextGenerator;

pub mod cache;
pub mod github;
pub mod models;
pub mod prompts;

use github::GithubClient;
use models::{PullRequest, SubProject};

pub const DEFAULT_BATCH_SIZE: usize = 25;
const PR_FETCH_PAUSE: Duration = Duration::from_millis(500);
const BATCH_PAUSE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct MinerOptions {
    /// Stop once the cache exists.
    pub cache_only: bool,
    pub cache_file: PathBuf,
    pub output_file: PathBuf,
    pub batch_size: usize,
    /// Free-text company, role and stack context for the prompt.
    pub context: Option<String>,
}

impl MinerOptions {
    pub fn for_repo(repo: &str) -> Self {
        Self {
            cache_only: false,
            cache_file: cache::default_cache_file(repo),
            output_file: cache::default_output_file(repo),
            batch_size: DEFAULT_BATCH_SIZE,
            context: None,
        }
    }
}

pub async fn run(config: &MinerConfig, options: &MinerOptions, llm: &dyn TextGenerator) -> Result<()> {
    let prs = match cache::load(&options.cache_file).await {
        Some(prs) => {
            info!(count = prs.len(), cache = %options.cache_file.display(), "Using cached PRs");
            if options.cache_only {
                info!("Cache already exists; delete it to re-fetch");
                return Ok(());
            }
            prs
        }
        None => {
            info!("No cache found, fetching PRs from GitHub");
            let prs = collect(config).await?;
            cache::save(&options.cache_file, &prs).await?;
            info!(count = prs.len(), cache = %options.cache_file.display(), "Cache saved");
            if options.cache_only {
                info!("Cache-only mode, skipping summarisation");
                return Ok(());
            }
            prs
        }
    };

    let projects = summarize_batches(
        llm,
        &prs,
        options.batch_size,
        options.context.as_deref(),
        BATCH_PAUSE,
    )
    .await?;

    cache::write_pretty(&options.output_file, &projects).await?;
    info!(
        count = projects.len(),
        output = %options.output_file.display(),
        "Sub-projects written"
    );
    Ok(())
}

/// Searches every page, then completes each PR one at a time.
async fn collect(config: &MinerConfig) -> Result<Vec<PullRequest>> {
    let github = GithubClient::new(config.github_token.clone());
    let found = github
        .fetch_all_merged_prs(&config.owner, &config.repo, &config.author)
        .await
        .context("GitHub PR search failed")?;

    let total = found.len();
    let mut complete = Vec::with_capacity(total);

    for (i, pr) in found.into_iter().enumerate() {
        debug!(pr = pr.number, "[{}/{}] {}", i + 1, total, pr.title);
        let pr = github.fetch_complete(&config.owner, &config.repo, pr).await;
        debug!(
            files = pr.files.len(),
            comments = pr.comments.len(),
            reviews = pr.reviews.len(),
            "PR data fetched"
        );
        complete.push(pr);

        if i + 1 < total {
            tokio::time::sleep(PR_FETCH_PAUSE).await;
        }
    }

    Ok(complete)
}

/// Summarises `prs` in consecutive batches, pausing between batches. Any
/// batch failure aborts the run.
pub async fn summarize_batches(
    llm: &dyn TextGenerator,
    prs: &[PullRequest],
    batch_size: usize,
    context: Option<&str>,
    pause: Duration,
) -> Result<Vec<SubProject>> {
    let batch_size = batch_size.max(1);
    let total_batches = prs.len().div_ceil(batch_size);
    let mut projects = Vec::new();

    for (index, batch) in prs.chunks(batch_size).enumerate() {
        info!(batch = index + 1, total_batches, prs = batch.len(), "Summarising batch");

        let found = summarize_batch(llm, batch, context)
            .await
            .with_context(|| format!("Batch {}/{} failed", index + 1, total_batches))?;
        info!(sub_projects = found.len(), "Batch summarised");
        projects.extend(found);

        if index + 1 < total_batches {
            tokio::time::sleep(pause).await;
        }
    }

    Ok(projects)
}

async fn summarize_batch(
    llm: &dyn TextGenerator,
    batch: &[PullRequest],
    context: Option<&str>,
) -> Result<Vec<SubProject>> {
    let prompt = prompts::batch_prompt(batch, context)?;
    let raw = llm.generate(&prompt).await?;

    GenerationOutput::parse(&raw)
        .into_json::<Vec<SubProject>>()
        .with_context(|| format!("Model output is not a JSON array of sub-projects: {raw}"))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::llm_client::LlmError;

    struct ScriptedGenerator {
        replies: Mutex<Vec<String>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().rev().map(|r| r.to_string()).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies.lock().unwrap().pop().ok_or(LlmError::EmptyContent)
        }
    }

    fn prs(count: u64) -> Vec<PullRequest> {
        (1..=count)
            .map(|number| PullRequest {
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
            })
            .collect()
    }

    #[tokio::test]
    async fn test_batches_are_chunked_and_concatenated() {
        let llm = ScriptedGenerator::new(&[
            r#"[{"title": "Apple Pay"}, {"title": "Map Markers"}]"#,
            "```json\n[{\"title\": \"Search Performance\"}]\n```",
            r#"Here you go: [{"title": "Spend Limits"}]"#,
        ]);

        let projects = summarize_batches(&llm, &prs(5), 2, Some("Acme"), Duration::ZERO)
            .await
            .unwrap();

        let titles: Vec<&str> = projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Apple Pay", "Map Markers", "Search Performance", "Spend Limits"]
        );

        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[0].contains("\"number\": 2"));
        assert!(!prompts[0].contains("\"number\": 3"));
        assert!(prompts[2].contains("\"number\": 5"));
    }

    #[tokio::test]
    async fn test_non_array_output_fails_the_run() {
        let llm = ScriptedGenerator::new(&["I could not group these PRs."]);
        let err = summarize_batches(&llm, &prs(1), DEFAULT_BATCH_SIZE, None, Duration::ZERO)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Batch 1/1"));
    }

    #[tokio::test]
    async fn test_no_prs_makes_no_calls() {
        let llm = ScriptedGenerator::new(&[]);
        let projects = summarize_batches(&llm, &[], DEFAULT_BATCH_SIZE, None, Duration::ZERO)
            .await
            .unwrap();
        assert!(projects.is_empty());
        assert!(llm.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cache_only_with_existing_cache_stops_before_summarising() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = MinerOptions::for_repo("app");
        options.cache_only = true;
        options.cache_file = dir.path().join("cache.json");
        options.output_file = dir.path().join("out.json");
        cache::save(&options.cache_file, &prs(2)).await.unwrap();

        let config = MinerConfig {
            github_token: "t".to_string(),
            openai_api_key: "k".to_string(),
            openai_base_url: None,
            owner: "acme".to_string(),
            repo: "app".to_string(),
            author: "ada".to_string(),
            rust_log: "info".to_string(),
        };
        let llm = ScriptedGenerator::new(&[]);
        run(&config, &options, &llm).await.unwrap();

        assert!(llm.prompts.lock().unwrap().is_empty());
        assert!(!options.output_file.exists());
    }

    #[tokio::test]
    async fn test_cached_prs_are_summarised_to_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = MinerOptions::for_repo("app");
        options.cache_file = dir.path().join("cache.json");
        options.output_file = dir.path().join("out.json");
        cache::save(&options.cache_file, &prs(3)).await.unwrap();

        let config = MinerConfig {
            github_token: "t".to_string(),
            openai_api_key: "k".to_string(),
            openai_base_url: None,
            owner: "acme".to_string(),
            repo: "app".to_string(),
            author: "ada".to_string(),
            rust_log: "info".to_string(),
        };
        let llm = ScriptedGenerator::new(&[r#"[{"title": "Checkout", "relatedPrs": [{"number": 1}]}]"#]);
        run(&config, &options, &llm).await.unwrap();

        let written: Vec<SubProject> =
            serde_json::from_str(&std::fs::read_to_string(&options.output_file).unwrap()).unwrap();
        assert_eq!(written[0].title, "Checkout");
        assert_eq!(written[0].related_prs[0].number, 1);
    }
}

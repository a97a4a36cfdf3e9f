//! `pr-miner`: turns a user's merged GitHub PRs into CV sub-projects.
//!
//! ```bash
//! pr-miner --cache-only                 # fetch and cache PRs, no LLM calls
//! pr-miner --context "Senior RN developer at Acme"
//! ```
//!
//! Reads `GITHUB_TOKEN`, `OPENAI_API_KEY`, `GITHUB_OWNER`, `GITHUB_REPO` and
//! `GITHUB_AUTHOR` from the environment or `.env`.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use tailor_api::config::MinerConfig;
use tailor_api::llm_client::{GenerationSettings, LlmClient};
use tailor_api::miner::{self, MinerOptions, DEFAULT_BATCH_SIZE};

#[derive(Parser)]
#[command(name = "pr-miner", version, about = "Cluster merged PRs into CV sub-projects")]
struct Cli {
    /// Fetch and cache PRs, then stop before summarising.
    #[arg(long)]
    cache_only: bool,

    /// Cache path. Defaults to `prs-cache-{repo}.json`.
    #[arg(long)]
    cache_file: Option<PathBuf>,

    /// Output path. Defaults to `subprojects-{repo}.json`.
    #[arg(long)]
    output: Option<PathBuf>,

    /// PRs per summarisation call.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Company, role and main stack, one fact per line.
    #[arg(long)]
    context: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = MinerConfig::from_env()?;

    tailor_api::init_tracing(&config.rust_log);

    let defaults = MinerOptions::for_repo(&config.repo);
    let options = MinerOptions {
        cache_only: cli.cache_only,
        cache_file: cli.cache_file.unwrap_or(defaults.cache_file),
        output_file: cli.output.unwrap_or(defaults.output_file),
        batch_size: cli.batch_size,
        context: cli.context,
    };

    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        GenerationSettings::pr_miner(),
    );
    info!(
        repo = %format!("{}/{}", config.owner, config.repo),
        author = %config.author,
        model = llm.model(),
        "PR miner starting"
    );

    miner::run(&config, &options, &llm).await
}

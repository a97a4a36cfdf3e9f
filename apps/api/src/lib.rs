//! Tailored CV service: selects the most relevant slice of a candidate's
//! career records for a job posting, generates each CV section with an LLM,
//! and writes the assembled document back to the career store.
//!
//! Also hosts the PR miner used by the `pr-miner` binary.

pub mod config;
pub mod db;
pub mod document;
pub mod errors;
pub mod generation;
pub mod llm_client;
pub mod miner;
pub mod models;
pub mod routes;
pub mod scrape;
pub mod state;
pub mod store;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes structured logging. `RUST_LOG` wins when set; otherwise
/// `level` applies to this crate and to `tower_http`.
pub fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("tailor_api={level},tower_http={level}"))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

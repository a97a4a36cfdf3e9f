use std::sync::Arc;

use crate::llm_client::TextGenerator;
use crate::scrape::JobPageFetcher;
use crate::store::CareerStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable generator. Default: `LlmClient` with CV settings.
    pub llm: Arc<dyn TextGenerator>,
    /// Pluggable career store. Notion or Postgres, picked by `STORE_BACKEND`.
    pub store: Arc<dyn CareerStore>,
    pub scraper: JobPageFetcher,
}

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use tailor_api::config::{Config, StoreConfig};
use tailor_api::db::create_pool;
use tailor_api::llm_client::{GenerationSettings, LlmClient};
use tailor_api::routes::build_router;
use tailor_api::scrape::JobPageFetcher;
use tailor_api::state::AppState;
use tailor_api::store::notion::NotionStore;
use tailor_api::store::postgres::PgStore;
use tailor_api::store::CareerStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; every missing variable is reported at once
    let config = Config::from_env()?;

    tailor_api::init_tracing(&config.rust_log);

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize career store
    let store: Arc<dyn CareerStore> = match &config.store {
        StoreConfig::Notion(notion) => {
            if notion.cv_parent_page.is_none() {
                warn!("NOTION_CV_PARENT_PAGE_ID not set; CV generation will fail at write time");
            }
            Arc::new(NotionStore::new(notion.clone()))
        }
        StoreConfig::Postgres { database_url } => {
            Arc::new(PgStore::new(create_pool(database_url).await?))
        }
    };
    info!(backend = store.backend(), "Career store ready");

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        GenerationSettings::cv(),
    );
    info!("LLM client initialized (model: {})", llm.model());

    let state = AppState {
        llm: Arc::new(llm),
        store,
        scraper: JobPageFetcher::new(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

use anyhow::{bail, Context, Result};

/// Notion databases and pages backing the career store.
#[derive(Debug, Clone)]
pub struct NotionConfig {
    pub token: String,
    pub profile_db: String,
    pub experiences_db: String,
    /// Optional; skills are derived from experience tech tags when unset.
    pub skills_db: Option<String>,
    pub education_db: String,
    /// Parent page for generated CVs. Only needed when writing documents.
    pub cv_parent_page: Option<String>,
}

#[derive(Debug, Clone)]
pub enum StoreConfig {
    Notion(NotionConfig),
    Postgres { database_url: String },
}

/// Service configuration loaded from environment variables.
/// Every missing required variable is reported at once.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: Option<String>,
    pub store: StoreConfig,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut env = EnvReader::new(lookup);

        let openai_api_key = env.require("OPENAI_API_KEY");
        let openai_base_url = env.optional("OPENAI_BASE_URL");

        let backend = env
            .optional("STORE_BACKEND")
            .unwrap_or_else(|| "notion".to_string())
            .to_lowercase();
        let store = match backend.as_str() {
            "notion" => StoreConfig::Notion(NotionConfig {
                token: env.require("NOTION_TOKEN"),
                profile_db: env.require("NOTION_PROFILE_PAGE_ID"),
                experiences_db: env.require("NOTION_DB_EXPERIENCES"),
                skills_db: env.optional("NOTION_DB_SKILLS"),
                education_db: env.require("NOTION_DB_EDU"),
                cv_parent_page: env.optional("NOTION_CV_PARENT_PAGE_ID"),
            }),
            "postgres" => StoreConfig::Postgres {
                database_url: env.require("DATABASE_URL"),
            },
            other => bail!("STORE_BACKEND must be 'notion' or 'postgres', got '{other}'"),
        };

        let port = env
            .optional("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;
        let rust_log = env
            .optional("RUST_LOG")
            .unwrap_or_else(|| "info".to_string());

        env.finish()?;

        Ok(Config {
            openai_api_key,
            openai_base_url,
            store,
            port,
            rust_log,
        })
    }
}

/// Configuration for the `pr-miner` binary.
#[derive(Debug, Clone)]
pub struct MinerConfig {
    pub github_token: String,
    pub openai_api_key: String,
    pub openai_base_url: Option<String>,
    pub owner: String,
    pub repo: String,
    pub author: String,
    pub rust_log: String,
}

impl MinerConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut env = EnvReader::new(lookup);
        let config = MinerConfig {
            github_token: env.require("GITHUB_TOKEN"),
            openai_api_key: env.require("OPENAI_API_KEY"),
            openai_base_url: env.optional("OPENAI_BASE_URL"),
            owner: env.require("GITHUB_OWNER"),
            repo: env.require("GITHUB_REPO"),
            author: env.require("GITHUB_AUTHOR"),
            rust_log: env
                .optional("RUST_LOG")
                .unwrap_or_else(|| "info".to_string()),
        };
        env.finish()?;
        Ok(config)
    }
}

/// Collects missing variables instead of failing on the first one.
struct EnvReader<F> {
    lookup: F,
    missing: Vec<&'static str>,
}

impl<F: Fn(&str) -> Option<String>> EnvReader<F> {
    fn new(lookup: F) -> Self {
        Self {
            lookup,
            missing: Vec::new(),
        }
    }

    /// Blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.trim().is_empty())
    }

    fn require(&mut self, key: &'static str) -> String {
        self.optional(key).unwrap_or_else(|| {
            self.missing.push(key);
            String::new()
        })
    }

    fn finish(self) -> Result<()> {
        if self.missing.is_empty() {
            return Ok(());
        }
        bail!(
            "Missing required environment variables: {}. Please check your .env file.",
            self.missing.join(", ")
        )
    }
}

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

use crate::fetch::CacheMode;

const ENV_PREFIX: &str = "CATALOG";
const DEFAULT_OUTPUT_DIR: &str = "output";
const DEFAULT_PAGE_TIMEOUT_MS: u64 = 30_000;

/// Runtime settings from `CATALOG_*` environment variables over built-in defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub output_dir: PathBuf,
    /// Overrides every source's own result cap when set.
    pub max_results: Option<usize>,
    pub page_timeout_ms: u64,
    /// `bypass` or `enabled`.
    #[serde(default)]
    pub cache: CacheMode,
    pub spider_api_key: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_env(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    fn from_env(env: Environment) -> Result<Self, ConfigError> {
        let mut settings: Settings = Config::builder()
            .set_default("output_dir", DEFAULT_OUTPUT_DIR)?
            .set_default("page_timeout_ms", DEFAULT_PAGE_TIMEOUT_MS)?
            .add_source(env)
            .build()?
            .try_deserialize()?;
        if settings.spider_api_key.is_none() {
            settings.spider_api_key = std::env::var("SPIDER_API_KEY").ok();
        }
        Ok(settings)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_millis(self.page_timeout_ms)
    }
}

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::browser::{RequestFilter, ResourceKind, SessionOptions};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scraper: ScraperConfig,
    pub batch: BatchConfig,
}

/// Settings for a single URL: navigation, readiness, scrolling and retries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub timeout_ms: u64,
    pub ready_timeout_ms: u64,
    pub headless: bool,
    pub user_agent: String,
    pub chrome_path: Option<String>,
    pub scroll_step_px: u32,
    pub max_scroll_px: u64,
    pub scroll_interval_ms: u64,
    pub blocked_resources: Vec<ResourceKind>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 2000,
            max_delay_ms: 10000,
            timeout_ms: 30000,
            ready_timeout_ms: 5000,
            headless: true,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36"
                .to_string(),
            chrome_path: None,
            scroll_step_px: 400,
            max_scroll_px: 6000,
            scroll_interval_ms: 150,
            blocked_resources: vec![
                ResourceKind::Image,
                ResourceKind::Font,
                ResourceKind::Media,
                ResourceKind::Stylesheet,
            ],
        }
    }
}

impl ScraperConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    pub fn scroll_interval(&self) -> Duration {
        Duration::from_millis(self.scroll_interval_ms)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            user_agent: self.user_agent.clone(),
            timeout: self.timeout(),
        }
    }

    pub fn request_filter(&self) -> RequestFilter {
        RequestFilter::blocking(self.blocked_resources.iter().copied())
    }
}

/// Settings for a whole run: where URLs come from, where the report goes,
/// and the pacing window between URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub input_file: PathBuf,
    pub output_dir: PathBuf,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from("urls.txt"),
            output_dir: PathBuf::from("output"),
            min_delay_ms: 1000,
            max_delay_ms: 3000,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Add environment-specific config
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add local config (ignored by git)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix "BUYBOX_"
            .add_source(Environment::with_prefix("BUYBOX").separator("__"))
            .build()?;

        let mut config: AppConfig = s.try_deserialize()?;

        // Add Chrome path from environment if not set
        if config.scraper.chrome_path.is_none() {
            config.scraper.chrome_path = env::var("CHROME_PATH").ok();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate scraper configuration
        if self.scraper.timeout_ms == 0 {
            return Err(ConfigError::Message("Scraper timeout_ms must be greater than 0".into()));
        }

        if self.scraper.max_delay_ms < self.scraper.base_delay_ms {
            return Err(ConfigError::Message(
                "Scraper max_delay_ms cannot be less than base_delay_ms".into(),
            ));
        }

        if self.scraper.user_agent.trim().is_empty() {
            return Err(ConfigError::Message("Scraper user_agent must not be empty".into()));
        }

        if self.scraper.scroll_step_px == 0 {
            return Err(ConfigError::Message("Scraper scroll_step_px must be greater than 0".into()));
        }

        // Validate batch pacing window
        if self.batch.min_delay_ms > self.batch.max_delay_ms {
            return Err(ConfigError::Message(
                "Batch min_delay_ms cannot exceed max_delay_ms".into(),
            ));
        }

        Ok(())
    }
}

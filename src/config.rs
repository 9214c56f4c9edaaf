use crate::engine::CriteriaSet;
use crate::feed::http::DEFAULT_ENDPOINT;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

const ENDPOINT_ENV: &str = "JOB_FEED_ENDPOINT";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    /// Criteria applied before the user picks any filter.
    #[serde(default)]
    pub criteria: CriteriaSet,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Offset advance per page; `page_size` when unset.
    #[serde(default)]
    pub offset_step: Option<u32>,
    #[serde(default = "default_timeout")]
    pub request_timeout_ms: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}
fn default_page_size() -> u32 { 12 }
fn default_timeout() -> u64 { 10_000 }

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            page_size: default_page_size(),
            offset_step: None,
            request_timeout_ms: default_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Log to this file instead of stderr.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_filter() -> String {
    "job_feed=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            file: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .with_context(|| "Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.source.page_size == 0 {
            anyhow::bail!("source.page_size must be > 0");
        }
        if self.source.offset_step == Some(0) {
            anyhow::bail!("source.offset_step must be > 0");
        }
        if self.source.endpoint.trim().is_empty() {
            anyhow::bail!("source.endpoint cannot be empty");
        }
        Ok(())
    }

    /// Environment variables take precedence over the file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            let endpoint = endpoint.trim();
            if !endpoint.is_empty() {
                self.source.endpoint = endpoint.to_string();
            }
        }
    }
}

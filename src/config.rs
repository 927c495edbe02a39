//! Configuration management for jobimport using the prefer crate.
//!
//! A `jobimport.{toml,json,yaml,...}` file is discovered by prefer (or given
//! with `--config`), then environment variables override individual values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::scrapers::fetcher::{FetcherConfig, MAX_REDIRECT_DEPTH};
use crate::scrapers::HttpClient;

/// Default reader proxy used when direct fetches are blocked.
pub const DEFAULT_READER_PROXY_URL: &str = "https://r.jina.ai";

/// Default address for `jobimport serve`.
pub const DEFAULT_BIND: &str = "127.0.0.1:3030";

/// Environment variable overriding the reader proxy (empty disables it).
pub const ENV_READER_PROXY_URL: &str = "JOBIMPORT_READER_PROXY_URL";

/// Environment variable overriding the user agent.
pub const ENV_USER_AGENT: &str = "JOBIMPORT_USER_AGENT";

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, prefer::FromValue)]
pub struct Config {
    /// User agent string, or "impersonate" for a real browser one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Direct request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    /// Reader proxy request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_timeout: Option<u64>,
    /// Reader proxy base URL. Empty disables the fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reader_proxy_url: Option<String>,
    /// Maximum canonical/meta-refresh hops.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_redirect_depth: Option<u32>,
    /// Retries for timeouts and server errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_attempts: Option<u32>,
    /// Delay before each retry in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_delay_ms: Option<u64>,
    /// Listen address for the HTTP server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    #[prefer(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer for discovery.
    /// Falls back to defaults when no file is found or it fails to parse.
    pub async fn load() -> Self {
        match prefer::load("jobimport").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("Ignoring config {}: {}", path.display(), e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// The parser is picked from the file extension (JSON when unknown).
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut config = Self::parse(&contents, ext)?;
        config.source_path = Some(path.to_path_buf());
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn parse(contents: &str, ext: &str) -> Result<Self, String> {
        match ext {
            "toml" => {
                toml::from_str(contents).map_err(|e| format!("Failed to parse TOML config: {}", e))
            }
            "yaml" | "yml" => serde_yaml::from_str(contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e)),
            _ => serde_json::from_str(contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e)),
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = Some(user_agent.clone());
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(timeout) = self.proxy_timeout {
            settings.proxy_timeout = timeout;
        }
        if let Some(ref proxy) = self.reader_proxy_url {
            settings.set_reader_proxy(proxy);
        }
        if let Some(depth) = self.max_redirect_depth {
            settings.max_redirect_depth = depth;
        }
        if let Some(attempts) = self.retry_attempts {
            settings.retry_attempts = attempts;
        }
        if let Some(delay) = self.retry_delay_ms {
            settings.retry_delay_ms = delay;
        }
        if let Some(ref bind) = self.bind {
            settings.bind = bind.clone();
        }
    }
}

/// Resolved settings with concrete values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Custom user agent; `None` impersonates a browser.
    pub user_agent: Option<String>,
    /// Direct request timeout in seconds.
    pub request_timeout: u64,
    /// Reader proxy timeout in seconds.
    pub proxy_timeout: u64,
    /// Reader proxy base URL; `None` disables the fallback.
    pub reader_proxy_url: Option<String>,
    pub max_redirect_depth: u32,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
    /// Listen address for the HTTP server.
    pub bind: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_agent: None,
            request_timeout: 15,
            proxy_timeout: 20,
            reader_proxy_url: Some(DEFAULT_READER_PROXY_URL.to_string()),
            max_redirect_depth: MAX_REDIRECT_DEPTH,
            retry_attempts: 1,
            retry_delay_ms: 500,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl Settings {
    fn set_reader_proxy(&mut self, url: &str) {
        let url = url.trim();
        self.reader_proxy_url = (!url.is_empty()).then(|| url.to_string());
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(proxy) = lookup(ENV_READER_PROXY_URL) {
            self.set_reader_proxy(&proxy);
        }
        if let Some(ua) = lookup(ENV_USER_AGENT).filter(|ua| !ua.trim().is_empty()) {
            self.user_agent = Some(ua);
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn proxy_timeout(&self) -> Duration {
        Duration::from_secs(self.proxy_timeout)
    }

    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            max_redirect_depth: self.max_redirect_depth,
            retry_attempts: self.retry_attempts,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }

    /// Build the shared HTTP client for these settings.
    pub fn http_client(&self) -> Result<HttpClient, reqwest::Error> {
        let mut builder = HttpClient::builder(self.request_timeout())
            .proxy_timeout(self.proxy_timeout())
            .reader_proxy(self.reader_proxy_url.as_deref());
        if let Some(ref ua) = self.user_agent {
            builder = builder.user_agent(ua);
        }
        builder.build()
    }
}

/// Load settings, from an explicit config file or by discovery.
/// Returns (Settings, Config) tuple.
pub async fn load_settings(config_path: Option<&Path>) -> Result<(Settings, Config), String> {
    let config = match config_path {
        Some(path) => Config::load_from_path(path).await?,
        None => Config::load().await,
    };

    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings.apply_env(|name| std::env::var(name).ok());

    Ok((settings, config))
}

//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Shared HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Storefront endpoints and scraping rules
    #[serde(default)]
    pub source: SourceConfig,

    /// Content-storage backend address
    #[serde(default)]
    pub storage: StorageConfig,

    /// Population behavior
    #[serde(default)]
    pub populate: PopulateConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Override the storage address with `HOST` / `PORT` from the environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(std::env::var("HOST").ok(), std::env::var("PORT").ok());
    }

    fn apply_overrides(&mut self, host: Option<String>, port: Option<String>) {
        if let Some(host) = host.filter(|h| !h.trim().is_empty()) {
            self.storage.host = host.trim().to_string();
        }
        if let Some(port) = port {
            match port.trim().parse::<u16>() {
                Ok(port) => self.storage.port = port,
                Err(e) => log::warn!("Ignoring invalid PORT value {:?}: {}", port, e),
            }
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.storage.host.trim().is_empty() {
            return Err(AppError::validation("storage.host is empty"));
        }
        if self.populate.max_concurrent_uploads == 0 {
            return Err(AppError::validation(
                "populate.max_concurrent_uploads must be > 0",
            ));
        }
        if self.source.description_selector.trim().is_empty() {
            return Err(AppError::validation("source.description_selector is empty"));
        }
        Url::parse(&self.source.listing_url)?;
        Url::parse(&self.source.detail_base_url)?;
        self.storage.base_url()?;
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Storefront endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Filtered listing endpoint (fixed query parameters are appended)
    #[serde(default = "defaults::listing_url")]
    pub listing_url: String,

    /// Base URL of product detail pages; the slug is appended
    #[serde(default = "defaults::detail_base_url")]
    pub detail_base_url: String,

    /// CSS selector of the description block on a detail page
    #[serde(default = "defaults::description_selector")]
    pub description_selector: String,

    /// Suffix appended to image references to pick a crop size
    #[serde(default = "defaults::image_suffix")]
    pub image_suffix: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            listing_url: defaults::listing_url(),
            detail_base_url: defaults::detail_base_url(),
            description_selector: defaults::description_selector(),
            image_suffix: defaults::image_suffix(),
        }
    }
}

/// Content-storage backend address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "defaults::scheme")]
    pub scheme: String,

    #[serde(default = "defaults::host")]
    pub host: String,

    #[serde(default = "defaults::port")]
    pub port: u16,
}

impl StorageConfig {
    /// Base URL of the backend, e.g. `http://localhost:1337/`.
    pub fn base_url(&self) -> Result<Url> {
        let raw = format!("{}://{}:{}/", self.scheme, self.host, self.port);
        Ok(Url::parse(&raw)?)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            scheme: defaults::scheme(),
            host: defaults::host(),
            port: defaults::port(),
        }
    }
}

/// How relation names are sanitized before slugification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlugSanitization {
    /// Strip only the first character outside `[a-zA-Z0-9 ]`.
    ///
    /// Matches slugs already stored by earlier runs.
    #[default]
    FirstOnly,
    /// Strip every character outside `[a-zA-Z0-9 ]`.
    All,
}

/// Population behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulateConfig {
    /// Pause after each created product, in milliseconds
    #[serde(default = "defaults::settle_delay")]
    pub settle_delay_ms: u64,

    /// Maximum image transfers in flight across the whole batch
    #[serde(default = "defaults::max_concurrent_uploads")]
    pub max_concurrent_uploads: usize,

    #[serde(default)]
    pub slug_sanitization: SlugSanitization,
}

impl Default for PopulateConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: defaults::settle_delay(),
            max_concurrent_uploads: defaults::max_concurrent_uploads(),
            slug_sanitization: SlugSanitization::default(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; populator/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Storefront defaults
    pub fn listing_url() -> String {
        "https://www.gog.com/games/ajax/filtered".into()
    }
    pub fn detail_base_url() -> String {
        "https://www.gog.com/game/".into()
    }
    pub fn description_selector() -> String {
        ".description".into()
    }
    pub fn image_suffix() -> String {
        "_bg_crop_1680x655.jpg".into()
    }

    // Storage defaults
    pub fn scheme() -> String {
        "http".into()
    }
    pub fn host() -> String {
        "localhost".into()
    }
    pub fn port() -> u16 {
        1337
    }

    // Populate defaults
    pub fn settle_delay() -> u64 {
        2000
    }
    pub fn max_concurrent_uploads() -> usize {
        4
    }

    pub fn log_level() -> String {
        "info".into()
    }
}

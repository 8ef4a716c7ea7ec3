//! Configuration management for the scraper.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/sewakost/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Target site settings
    pub site: SiteConfig,
    /// Browser automation settings
    pub browser: BrowserConfig,
    /// Retry budgets and pacing
    pub scraping: ScrapingConfig,
    /// Output file settings
    pub export: ExportConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `SEWAKOST_HEADLESS`: Override browser headless mode (true/false)
    /// - `SEWAKOST_LAST_PAGE`: Override the last listing page to visit
    /// - `SEWAKOST_OUTPUT`: Override the export file path
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("SEWAKOST_HEADLESS") {
            if let Ok(headless) = val.parse() {
                self.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Ok(val) = std::env::var("SEWAKOST_LAST_PAGE") {
            if let Ok(last_page) = val.parse() {
                self.site.last_page = last_page;
                tracing::debug!("Override site.last_page from env: {}", last_page);
            }
        }

        if let Ok(val) = std::env::var("SEWAKOST_OUTPUT") {
            tracing::debug!("Override export.output_path from env: {}", val);
            self.export.output_path = PathBuf::from(val);
        }

        self
    }

    /// Load configuration with environment variable overrides.
    pub fn load_with_env() -> ConfigResult<Self> {
        Ok(Self::load()?.with_env_overrides())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/sewakost/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "sewakost", "sewakost").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.site.first_page == 0 {
            return Err(invalid("site.first_page", "pages are numbered from 1"));
        }
        if self.site.last_page < self.site.first_page {
            return Err(invalid(
                "site.last_page",
                &format!(
                    "must not be below first_page ({} < {})",
                    self.site.last_page, self.site.first_page
                ),
            ));
        }
        if self.browser.user_agents.is_empty() {
            return Err(invalid("browser.user_agents", "at least one user agent is required"));
        }

        self.scraping.listing_retry.validate("scraping.listing_retry")?;
        self.scraping.detail_retry.validate("scraping.detail_retry")?;
        self.scraping.detail_delay.validate("scraping.detail_delay")?;
        self.scraping.page_delay.validate("scraping.page_delay")?;

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Target site settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Listing collection URL (page 1)
    pub base_url: String,
    /// Origin used to resolve relative detail links
    pub origin: String,
    /// First listing page to visit
    pub first_page: u32,
    /// Last listing page to visit (inclusive)
    pub last_page: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.sewakost.com/kost-jakarta/jenis:Kost+Putri/price:500000-1000000/"
                .to_string(),
            origin: "https://www.sewakost.com".to_string(),
            first_page: 1,
            last_page: 35,
        }
    }
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Page load timeout in seconds
    pub page_load_timeout_secs: u64,
    /// Client identification strings; one is picked at random per session
    pub user_agents: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            page_load_timeout_secs: 30,
            user_agents: vec![
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15".to_string(),
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            ],
        }
    }
}

/// Inclusive range for a randomized wait, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    /// Lower bound
    pub min_ms: u64,
    /// Upper bound
    pub max_ms: u64,
}

impl DelayRange {
    /// Range from seconds.
    #[must_use]
    pub const fn from_secs(min: u64, max: u64) -> Self {
        Self {
            min_ms: min * 1000,
            max_ms: max * 1000,
        }
    }

    /// A range that never waits.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            min_ms: 0,
            max_ms: 0,
        }
    }

    fn validate(&self, field: &str) -> ConfigResult<()> {
        if self.min_ms > self.max_ms {
            return Err(invalid(
                field,
                &format!("min_ms {} exceeds max_ms {}", self.min_ms, self.max_ms),
            ));
        }
        Ok(())
    }
}

/// Bounded retry budget with randomized backoff between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Wait before each retry
    pub backoff: DelayRange,
}

impl RetryConfig {
    fn validate(&self, field: &str) -> ConfigResult<()> {
        if self.max_attempts == 0 {
            return Err(invalid(field, "max_attempts must be at least 1"));
        }
        self.backoff.validate(field)
    }
}

/// Retry budgets, waits and pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapingConfig {
    /// Listing page retry budget
    pub listing_retry: RetryConfig,
    /// Detail page retry budget
    pub detail_retry: RetryConfig,
    /// Pause between detail pages
    pub detail_delay: DelayRange,
    /// Pause between listing pages
    pub page_delay: DelayRange,
    /// Timeout for element-presence and ready-state waits
    pub element_timeout_ms: u64,
    /// Timeout for the cookie consent button to appear
    pub consent_timeout_ms: u64,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            listing_retry: RetryConfig {
                max_attempts: 3,
                backoff: DelayRange::from_secs(3, 5),
            },
            detail_retry: RetryConfig {
                max_attempts: 3,
                backoff: DelayRange::from_secs(5, 10),
            },
            detail_delay: DelayRange::from_secs(1, 3),
            page_delay: DelayRange::from_secs(2, 5),
            element_timeout_ms: 20_000,
            consent_timeout_ms: 10_000,
        }
    }
}

/// Output file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Path of the CSV file to write
    pub output_path: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("sewakost_data.csv"),
        }
    }
}

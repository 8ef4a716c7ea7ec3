//! Kost Core - Foundation crate for the SewaKost listing scraper.
//!
//! This crate provides the listing record model, configuration management
//! and error types that the browser and scraper crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Listing record, `DetailUrl` and `PageIndex`
//!
//! # Example
//!
//! ```rust
//! use kost_core::{AppConfig, PageIndex};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let page = PageIndex::new(2)?;
//! println!("{}", page.listing_url(&config.site.base_url));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{
    AppConfig, BrowserConfig, DelayRange, ExportConfig, RetryConfig, ScrapingConfig, SiteConfig,
};
pub use error::{ConfigError, ConfigResult, CoreError, Result};
pub use types::{
    DetailUrl, Facilities, ListingRecord, Location, PageIndex, EXPORT_COLUMNS,
    FACILITY_SEPARATOR, NOT_AVAILABLE,
};

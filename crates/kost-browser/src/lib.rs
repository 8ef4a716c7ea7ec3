//! Browser automation for the SewaKost listing scraper.
//!
//! Provides a single-tab Chromium session with basic fingerprint
//! randomization, behind the [`BrowserActions`] trait so the scrape
//! pipeline can run against a scripted fake in tests.

pub mod actions;
pub mod engine;
pub mod error;
pub mod fingerprint;

pub use actions::{selector_present, BrowserActions, READY_STATE_COMPLETE};
pub use engine::BrowserEngine;
pub use error::{BrowserError, Result};
pub use fingerprint::FingerprintConfig;

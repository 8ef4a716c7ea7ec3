//! Kost Scraper - Listing scrape pipeline.
//!
//! This crate drives one browser session across a fixed range of listing
//! pages, visits every listing's detail page and extracts a normalized
//! record from it, then exports the gathered records to CSV.
//!
//! # Features
//!
//! - Bounded retries with randomized backoff for page loads
//! - Not-found detection so dead listings are skipped without retrying
//! - Per-field extraction defaults: a missing section never drops a record
//! - Page-level failures skip the page, run-fatal failures keep partial results
//!
//! # Example
//!
//! ```rust,ignore
//! use kost_core::AppConfig;
//! use kost_scraper::{export, Driver, Session};
//!
//! let config = AppConfig::load_with_env()?;
//! let session = Session::launch(&config.browser).await?;
//! let report = Driver::new(session.browser(), &config.site, &config.scraping)?
//!     .run()
//!     .await;
//! export::write_csv(&config.export.output_path, &report.records)?;
//! session.close().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod detail;
pub mod driver;
#[allow(missing_docs)]
pub mod error;
pub mod export;
pub mod extract;
#[allow(missing_docs)]
pub mod listing;
pub mod pacing;
pub mod retry;
#[allow(missing_docs)]
pub mod session;

// Re-export commonly used types
pub use detail::DetailFetcher;
pub use driver::{Driver, PageState, RunAccumulator, RunOutcome, RunReport, Termination};
pub use error::{Result, ScrapeError};
pub use extract::extract_record;
pub use listing::ListingFetcher;
pub use retry::{RetryError, RetryPolicy};
pub use session::Session;

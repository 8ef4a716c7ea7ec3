use kost_browser::BrowserError;
use kost_core::PageIndex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("listing page {page} abandoned after {attempts} attempts: {source}")]
    PageExhausted {
        page: PageIndex,
        attempts: u32,
        #[source]
        source: BrowserError,
    },

    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error("Export error: {0}")]
    Export(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] kost_core::ConfigError),

    #[error("Invalid input: {0}")]
    Core(#[from] kost_core::CoreError),
}

impl ScrapeError {
    /// Whether this failure only costs the current listing page.
    #[must_use]
    pub fn is_page_level(&self) -> bool {
        matches!(self, Self::PageExhausted { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

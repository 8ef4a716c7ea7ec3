//! Detail page fetching: one listing URL in, one record (or nothing) out.

use crate::error::{Result, ScrapeError};
use crate::extract::extract_record;
use crate::retry::{RetryError, RetryPolicy};
use kost_browser::{BrowserActions, BrowserError};
use kost_core::{DetailUrl, ListingRecord};
use scraper::Html;
use tracing::{info, warn};

/// Outcome of one successful page load.
enum Loaded {
    Page(String),
    NotFound,
}

/// Fetches listing detail pages and extracts records from them.
pub struct DetailFetcher<'a, B> {
    browser: &'a B,
    retry: RetryPolicy,
    element_timeout_ms: u64,
}

impl<'a, B: BrowserActions> DetailFetcher<'a, B> {
    /// Create a fetcher over `browser`.
    #[must_use]
    pub fn new(browser: &'a B, retry: RetryPolicy, element_timeout_ms: u64) -> Self {
        Self {
            browser,
            retry,
            element_timeout_ms,
        }
    }

    /// Fetch `url` and extract its record.
    ///
    /// Returns `Ok(None)` when the page is a not-found page (no retry) or when
    /// every attempt failed transiently. Retries reload the page first.
    /// A non-transient browser error is returned as `Err`.
    pub async fn fetch(&self, url: &DetailUrl) -> Result<Option<ListingRecord>> {
        let browser = self.browser;
        let timeout_ms = self.element_timeout_ms;
        let target = url.as_str();

        let loaded = self
            .retry
            .run(
                "detail page",
                move |attempt| async move {
                    info!(attempt, url = target, "loading detail page");
                    if attempt > 1 {
                        if let Err(e) = browser.reload().await {
                            warn!(url = target, error = %e, "reload before retry failed");
                        }
                    }

                    browser.navigate(target).await?;

                    let title = browser.title().await?;
                    let source = browser.page_source().await?;
                    if is_not_found(&title, &source) {
                        return Ok(Loaded::NotFound);
                    }

                    browser.wait_for_ready_state(timeout_ms).await?;
                    Ok::<_, BrowserError>(Loaded::Page(browser.page_source().await?))
                },
                BrowserError::is_transient,
            )
            .await;

        match loaded {
            Ok(Loaded::Page(html)) => Ok(Some(extract_record(&Html::parse_document(&html), url))),
            Ok(Loaded::NotFound) => {
                warn!(url = target, "page not found, skipping listing");
                Ok(None)
            }
            Err(RetryError::Exhausted { attempts, last }) => {
                warn!(url = target, attempts, error = %last, "giving up on listing");
                Ok(None)
            }
            Err(RetryError::Fatal(e)) => Err(ScrapeError::Browser(e)),
        }
    }
}

/// Whether a loaded page is the site's error page rather than a listing.
#[must_use]
pub fn is_not_found(title: &str, source: &str) -> bool {
    title.contains("404") || source.contains("Not Found")
}

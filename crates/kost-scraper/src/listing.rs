//! Listing page fetching: one results page in, detail URLs out.

use crate::error::{Result, ScrapeError};
use crate::retry::{RetryError, RetryPolicy};
use kost_browser::{BrowserActions, BrowserError, READY_STATE_COMPLETE};
use kost_core::{DetailUrl, PageIndex};
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

/// Present once the listing cards have rendered.
pub const LISTING_CONTAINER: &str = "article.item.two-inline";

/// One summary card per listing.
pub const LISTING_CARD: &str = "section#listings article.item.two-inline";

/// Anchor to the detail page inside a card.
pub const CARD_LINK: &str = "li.title a";

/// Fetches listing pages and extracts the detail links on them.
pub struct ListingFetcher<'a, B> {
    browser: &'a B,
    base_url: &'a str,
    origin: &'a str,
    retry: RetryPolicy,
    element_timeout_ms: u64,
}

impl<'a, B: BrowserActions> ListingFetcher<'a, B> {
    #[must_use]
    pub fn new(
        browser: &'a B,
        base_url: &'a str,
        origin: &'a str,
        retry: RetryPolicy,
        element_timeout_ms: u64,
    ) -> Self {
        Self {
            browser,
            base_url,
            origin,
            retry,
            element_timeout_ms,
        }
    }

    /// Load `page` and return the detail URLs of its listing cards, in page order.
    ///
    /// A page without cards yields an empty list. Exhausting the retry budget
    /// yields [`ScrapeError::PageExhausted`]; a non-transient browser error is
    /// returned as-is.
    pub async fn fetch(&self, page: PageIndex) -> Result<Vec<DetailUrl>> {
        let url = page.listing_url(self.base_url);
        let predicate = listing_ready_predicate()?;

        let browser = self.browser;
        let timeout_ms = self.element_timeout_ms;
        let (url_ref, predicate_ref) = (url.as_str(), predicate.as_str());

        let html = self
            .retry
            .run(
                "listing page",
                move |attempt| async move {
                    info!(page = page.get(), attempt, url = url_ref, "loading listing page");
                    browser.navigate(url_ref).await?;
                    browser.wait_until(predicate_ref, timeout_ms).await?;
                    browser.page_source().await
                },
                BrowserError::is_transient,
            )
            .await
            .map_err(|e| match e {
                RetryError::Exhausted { attempts, last } => ScrapeError::PageExhausted {
                    page,
                    attempts,
                    source: last,
                },
                RetryError::Fatal(e) => ScrapeError::Browser(e),
            })?;

        let urls = parse_detail_urls(&html, self.origin);
        debug!(page = page.get(), count = urls.len(), "extracted detail links");
        Ok(urls)
    }
}

/// Cards rendered, or the document finished loading without any.
fn listing_ready_predicate() -> std::result::Result<String, BrowserError> {
    let cards = kost_browser::selector_present(LISTING_CONTAINER)?;
    Ok(format!("({cards}) || ({READY_STATE_COMPLETE})"))
}

/// Detail URLs referenced by the listing cards of `html`.
///
/// Cards without a usable link are skipped.
#[must_use]
pub fn parse_detail_urls(html: &str, origin: &str) -> Vec<DetailUrl> {
    let document = Html::parse_document(html);
    let (Ok(card_selector), Ok(link_selector)) =
        (Selector::parse(LISTING_CARD), Selector::parse(CARD_LINK))
    else {
        return Vec::new();
    };

    document
        .select(&card_selector)
        .filter_map(|card| card.select(&link_selector).next())
        .filter_map(|link| link.value().attr("href"))
        .filter(|href| !href.trim().is_empty())
        .filter_map(|href| match DetailUrl::resolve(origin, href) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(href, error = %e, "skipping unresolvable listing link");
                None
            }
        })
        .collect()
}

//! Pagination driver for coordinating a scrape run.
//!
//! The driver walks the configured page range one page at a time, hands each
//! page to the [`ListingFetcher`], visits every detail link with the
//! [`DetailFetcher`] and accumulates the resulting records.
//!
//! Failures are contained at the narrowest layer: a missing field is
//! defaulted by the extractor, a dead listing is skipped by the detail
//! fetcher, a page that exhausts its retries is skipped here. Anything else
//! aborts the run, keeping the records gathered so far.

use crate::detail::DetailFetcher;
use crate::error::{Result, ScrapeError};
use crate::listing::ListingFetcher;
use crate::pacing;
use crate::retry::RetryPolicy;
use kost_browser::BrowserActions;
use kost_core::{ConfigError, ListingRecord, PageIndex, ScrapingConfig, SiteConfig};
use tracing::{error, info, warn};

/// Position of the driver in the page range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// About to process this page
    AtPage(PageIndex),
    /// Every page in the range was visited
    Done,
    /// A run-fatal error stopped pagination
    Aborted,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// All pages visited
    Done,
    /// Stopped early on `page`
    Aborted {
        /// Page being processed when the run stopped
        page: PageIndex,
        /// Error that stopped the run
        reason: String,
    },
}

/// Append-only record store owned by a single run.
#[derive(Debug, Default)]
pub struct RunAccumulator {
    records: Vec<ListingRecord>,
}

impl RunAccumulator {
    /// Append a record.
    pub fn push(&mut self, record: ListingRecord) {
        self.records.push(record);
    }

    /// Number of records gathered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been gathered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in the order they were gathered.
    #[must_use]
    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    /// Hand the records over for export.
    #[must_use]
    pub fn into_records(self) -> Vec<ListingRecord> {
        self.records
    }
}

/// How pagination ended, without the records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// How pagination ended
    pub termination: Termination,
    /// Pages abandoned after exhausting their retries
    pub skipped_pages: Vec<PageIndex>,
    /// Listings skipped because their detail page was unavailable
    pub skipped_listings: usize,
}

impl RunOutcome {
    /// Pair the outcome with the records it produced.
    #[must_use]
    pub fn into_report(self, accumulator: RunAccumulator) -> RunReport {
        RunReport {
            records: accumulator.into_records(),
            termination: self.termination,
            skipped_pages: self.skipped_pages,
            skipped_listings: self.skipped_listings,
        }
    }
}

/// Summary of a finished run.
#[derive(Debug)]
pub struct RunReport {
    /// Records gathered, in scrape order
    pub records: Vec<ListingRecord>,
    /// How pagination ended
    pub termination: Termination,
    /// Pages abandoned after exhausting their retries
    pub skipped_pages: Vec<PageIndex>,
    /// Listings skipped because their detail page was unavailable
    pub skipped_listings: usize,
}

impl RunReport {
    /// Whether the run stopped before the end of the page range.
    #[must_use]
    pub fn aborted(&self) -> bool {
        matches!(self.termination, Termination::Aborted { .. })
    }
}

/// Walks a fixed page range over one browser session.
pub struct Driver<'a, B> {
    browser: &'a B,
    site: &'a SiteConfig,
    scraping: &'a ScrapingConfig,
    first_page: PageIndex,
    last_page: PageIndex,
}

impl<'a, B: BrowserActions> Driver<'a, B> {
    /// Create a driver over `site.first_page..=site.last_page`.
    pub fn new(browser: &'a B, site: &'a SiteConfig, scraping: &'a ScrapingConfig) -> Result<Self> {
        let first_page = PageIndex::new(site.first_page)?;
        let last_page = PageIndex::new(site.last_page)?;
        if last_page < first_page {
            return Err(ScrapeError::Config(ConfigError::InvalidValue {
                field: "site.last_page".to_string(),
                reason: format!("must not be below first_page ({last_page} < {first_page})"),
            }));
        }

        Ok(Self {
            browser,
            site,
            scraping,
            first_page,
            last_page,
        })
    }

    /// Run pagination to completion or abort.
    pub async fn run(&self) -> RunReport {
        let mut accumulator = RunAccumulator::default();
        let outcome = self.run_into(&mut accumulator).await;
        outcome.into_report(accumulator)
    }

    /// Run pagination, appending records to a caller-owned accumulator.
    ///
    /// Records gathered before a panic stay in `accumulator`.
    pub async fn run_into(&self, accumulator: &mut RunAccumulator) -> RunOutcome {
        let mut outcome = RunOutcome {
            termination: Termination::Done,
            skipped_pages: Vec::new(),
            skipped_listings: 0,
        };

        let mut state = PageState::AtPage(self.first_page);
        while let PageState::AtPage(page) = state {
            info!(page = page.get(), "processing page");

            state = match self
                .process_page(page, accumulator, &mut outcome.skipped_listings)
                .await
            {
                Ok(()) => self.advance(page).await,
                Err(e) if e.is_page_level() => {
                    warn!(page = page.get(), error = %e, "skipping listing page");
                    outcome.skipped_pages.push(page);
                    self.advance(page).await
                }
                Err(e) => {
                    error!(page = page.get(), error = %e, "critical error, stopping pagination");
                    outcome.termination = Termination::Aborted {
                        page,
                        reason: e.to_string(),
                    };
                    PageState::Aborted
                }
            };
        }

        info!(
            records = accumulator.len(),
            skipped_pages = outcome.skipped_pages.len(),
            skipped_listings = outcome.skipped_listings,
            aborted = matches!(state, PageState::Aborted),
            "pagination finished"
        );

        outcome
    }

    /// Visit every listing on `page`.
    async fn process_page(
        &self,
        page: PageIndex,
        accumulator: &mut RunAccumulator,
        skipped_listings: &mut usize,
    ) -> Result<()> {
        let listing = ListingFetcher::new(
            self.browser,
            &self.site.base_url,
            &self.site.origin,
            RetryPolicy::from(self.scraping.listing_retry),
            self.scraping.element_timeout_ms,
        );
        let detail = DetailFetcher::new(
            self.browser,
            RetryPolicy::from(self.scraping.detail_retry),
            self.scraping.element_timeout_ms,
        );

        let urls = listing.fetch(page).await?;
        if urls.is_empty() {
            info!(page = page.get(), "no listings found on page, moving on");
            return Ok(());
        }
        info!(page = page.get(), count = urls.len(), "found listings");

        for (i, url) in urls.iter().enumerate() {
            if i > 0 {
                pacing::sleep_random(self.scraping.detail_delay).await;
            }

            match detail.fetch(url).await? {
                Some(record) => accumulator.push(record),
                None => *skipped_listings += 1,
            }
        }

        Ok(())
    }

    /// Move past `page`, pausing when another page follows.
    async fn advance(&self, page: PageIndex) -> PageState {
        if page >= self.last_page {
            return PageState::Done;
        }

        pacing::sleep_random(self.scraping.page_delay).await;
        match PageIndex::new(page.get() + 1) {
            Ok(next) => PageState::AtPage(next),
            Err(_) => PageState::Done,
        }
    }
}

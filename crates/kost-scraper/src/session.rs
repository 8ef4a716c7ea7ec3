//! Browser session ownership for one run.

use crate::error::Result;
use crate::pacing;
use kost_browser::{BrowserActions, BrowserEngine};
use kost_core::{BrowserConfig, DelayRange};
use tracing::{info, warn};

/// Holds while the cookie consent button is on the page.
pub const CONSENT_BUTTON_PRESENT: &str = "Array.from(document.querySelectorAll('button')).some(b => b.textContent.includes('Setuju'))";

/// Clicks the consent button, returning whether one was found.
pub const CONSENT_BUTTON_CLICK: &str = "(() => { const b = Array.from(document.querySelectorAll('button')).find(b => b.textContent.includes('Setuju')); if (b) { b.click(); return true; } return false; })()";

/// Owns the browser for the lifetime of a run. Call [`Session::close`] on every exit path.
pub struct Session<B: BrowserActions> {
    browser: B,
    closed: bool,
}

impl Session<BrowserEngine> {
    /// Launch Chromium and wrap it in a session.
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        Ok(Self::new(BrowserEngine::launch(config).await?))
    }
}

impl<B: BrowserActions> Session<B> {
    pub fn new(browser: B) -> Self {
        Self {
            browser,
            closed: false,
        }
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    /// Open the listing collection and accept the cookie banner if it shows up.
    ///
    /// Failure here is logged and otherwise ignored.
    pub async fn dismiss_cookie_consent(
        &self,
        base_url: &str,
        timeout_ms: u64,
        settle: DelayRange,
    ) -> bool {
        if let Err(e) = self.browser.navigate(base_url).await {
            warn!(url = base_url, error = %e, "could not open listing collection");
            return false;
        }

        if let Err(e) = self
            .browser
            .wait_until(CONSENT_BUTTON_PRESENT, timeout_ms)
            .await
        {
            warn!(error = %e, "cookie consent button not found");
            return false;
        }

        match self.browser.execute_script(CONSENT_BUTTON_CLICK).await {
            Ok(value) if value.as_bool() == Some(true) => {
                info!("cookie consent accepted");
                pacing::sleep_random(settle).await;
                true
            }
            Ok(_) => {
                warn!("cookie consent button disappeared before click");
                false
            }
            Err(e) => {
                warn!(error = %e, "cookie consent click failed");
                false
            }
        }
    }

    /// Shut the browser down.
    pub async fn close(mut self) -> Result<()> {
        self.closed = true;
        self.browser.shutdown().await?;
        info!("scraper session terminated");
        Ok(())
    }
}

impl<B: BrowserActions> Drop for Session<B> {
    fn drop(&mut self) {
        if !self.closed {
            warn!("session dropped without close");
        }
    }
}

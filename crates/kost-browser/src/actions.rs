use crate::error::{BrowserError, Result};
use std::time::{Duration, Instant};

/// Interval between evaluations of a wait predicate.
const POLL_INTERVAL_MS: u64 = 250;

/// Predicate satisfied once the document has fully loaded.
pub const READY_STATE_COMPLETE: &str = "document.readyState === 'complete'";

/// Browser actions for automation
#[async_trait::async_trait]
pub trait BrowserActions: Send + Sync {
    /// Navigate to a URL and wait for the load to commit
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Evaluate a script in the current page and return its value
    async fn execute_script(&self, script: &str) -> Result<serde_json::Value>;

    /// Serialized DOM of the current page
    async fn page_source(&self) -> Result<String>;

    /// Title of the current page, empty if none
    async fn title(&self) -> Result<String>;

    /// Force a full reload of the current page
    async fn reload(&self) -> Result<()>;

    /// Tear the session down. Further calls fail with `SessionClosed`.
    async fn shutdown(&mut self) -> Result<()>;

    /// Poll a boolean script predicate until it holds or `timeout_ms` elapses
    async fn wait_until(&self, predicate: &str, timeout_ms: u64) -> Result<()> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);

        loop {
            let value = self.execute_script(predicate).await?;
            if value.as_bool() == Some(true) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout(format!(
                    "'{predicate}' not satisfied within {timeout_ms}ms"
                )));
            }
            tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
        }
    }

    /// Wait for a selector to appear
    async fn wait_for_selector(&self, selector: &str, timeout_ms: u64) -> Result<()> {
        let predicate = selector_present(selector)?;
        self.wait_until(&predicate, timeout_ms).await
    }

    /// Wait until `document.readyState` reports complete
    async fn wait_for_ready_state(&self, timeout_ms: u64) -> Result<()> {
        self.wait_until(READY_STATE_COMPLETE, timeout_ms).await
    }
}

/// Build a predicate that holds when `selector` matches at least one element.
pub fn selector_present(selector: &str) -> Result<String> {
    let literal = serde_json::to_string(selector)
        .map_err(|e| BrowserError::Script(format!("cannot quote selector: {e}")))?;
    Ok(format!("document.querySelector({literal}) !== null"))
}

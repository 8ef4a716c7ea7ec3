use crate::actions::BrowserActions;
use crate::error::{BrowserError, Result};
use crate::fingerprint::FingerprintConfig;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use kost_core::BrowserConfig;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Injected before any page script runs.
const HIDE_WEBDRIVER: &str =
    "Object.defineProperty(navigator, 'webdriver', { get: () => undefined });";

/// Browser automation engine driving a single Chromium tab
pub struct BrowserEngine {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    page_load_timeout: Duration,
    closed: bool,
}

impl BrowserEngine {
    /// Launch Chromium with a randomized fingerprint drawn from `config`
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        let fingerprint = FingerprintConfig::randomized_from(&config.user_agents)
            .with_viewport(config.window_width, config.window_height);
        Self::with_fingerprint(config, fingerprint).await
    }

    /// Launch Chromium with a specific fingerprint
    pub async fn with_fingerprint(
        config: &BrowserConfig,
        fingerprint: FingerprintConfig,
    ) -> Result<Self> {
        let page_load_timeout = Duration::from_secs(config.page_load_timeout_secs);

        let mut builder = ChromeConfig::builder()
            .no_sandbox()
            .request_timeout(page_load_timeout)
            .window_size(fingerprint.viewport_width, fingerprint.viewport_height)
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-dev-shm-usage")
            .arg(format!("--user-agent={}", fingerprint.user_agent));
        if !config.headless {
            builder = builder.with_head();
        }
        let chrome_config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut handler) = Browser::launch(chrome_config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        // Spawn browser handler
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "browser handler event error");
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;
        page.evaluate_on_new_document(AddScriptToEvaluateOnNewDocumentParams::new(HIDE_WEBDRIVER))
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        info!(
            headless = config.headless,
            user_agent = %fingerprint.user_agent,
            "browser session started"
        );

        Ok(Self {
            browser,
            page,
            handler,
            page_load_timeout,
            closed: false,
        })
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(BrowserError::SessionClosed);
        }
        Ok(())
    }

    /// Bound a page-load operation by the configured timeout
    async fn with_load_timeout<T, F>(&self, what: &str, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, chromiumoxide::error::CdpError>>,
    {
        match tokio::time::timeout(self.page_load_timeout, fut).await {
            Ok(result) => result.map_err(BrowserError::from),
            Err(_) => Err(BrowserError::Timeout(format!(
                "{what} exceeded {}s",
                self.page_load_timeout.as_secs()
            ))),
        }
    }
}

#[async_trait::async_trait]
impl BrowserActions for BrowserEngine {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.ensure_open()?;
        debug!(url, "navigating");
        self.with_load_timeout("navigation", self.page.goto(url))
            .await
            .map(|_| ())
    }

    async fn execute_script(&self, script: &str) -> Result<serde_json::Value> {
        self.ensure_open()?;
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| match BrowserError::from(e) {
                BrowserError::Transport(msg) => BrowserError::Script(msg),
                other => other,
            })?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn page_source(&self) -> Result<String> {
        self.ensure_open()?;
        Ok(self.page.content().await?)
    }

    async fn title(&self) -> Result<String> {
        self.ensure_open()?;
        Ok(self.page.get_title().await?.unwrap_or_default())
    }

    async fn reload(&self) -> Result<()> {
        self.ensure_open()?;
        self.with_load_timeout("reload", self.page.reload())
            .await
            .map(|_| ())
    }

    async fn shutdown(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let closed = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "browser process did not exit cleanly");
        }
        self.handler.abort();

        closed.map(|_| ()).map_err(BrowserError::from)?;
        info!("browser session closed");
        Ok(())
    }
}

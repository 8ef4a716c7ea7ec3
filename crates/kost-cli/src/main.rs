//! SewaKost scraper command-line shell.
//!
//! This is the thin entry point that loads configuration, owns the browser
//! session and reports the outcome. The pipeline lives in `kost-scraper`.

use anyhow::{Context, Result};
use clap::Parser;
use futures::FutureExt;
use kost_browser::BrowserEngine;
use kost_core::AppConfig;
use kost_scraper::{export, Driver, RunAccumulator, RunOutcome, Session, Termination};
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Scrape rooming-house listings from sewakost.com into a CSV file.
#[derive(Debug, Parser)]
#[command(name = "sewakost-scraper", version, about)]
struct Cli {
    /// Configuration file (defaults to the XDG config path)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// CSV file to write
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// First listing page to visit
    #[arg(long)]
    first_page: Option<u32>,

    /// Last listing page to visit (inclusive)
    #[arg(long)]
    last_page: Option<u32>,

    /// Show the browser window
    #[arg(long)]
    headful: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize tracing subscriber for logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose { "debug" } else { "info,kost=debug" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::load().context("loading config")?,
    };
    let mut config = config.with_env_overrides();

    if let Some(output) = &cli.output {
        config.export.output_path.clone_from(output);
    }
    if let Some(first_page) = cli.first_page {
        config.site.first_page = first_page;
    }
    if let Some(last_page) = cli.last_page {
        config.site.last_page = last_page;
    }
    if cli.headful {
        config.browser.headless = false;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Consent, then paginate into `accumulator`.
async fn paginate(
    session: &Session<BrowserEngine>,
    config: &AppConfig,
    accumulator: &mut RunAccumulator,
) -> Result<RunOutcome> {
    session
        .dismiss_cookie_consent(
            &config.site.base_url,
            config.scraping.consent_timeout_ms,
            config.scraping.detail_delay,
        )
        .await;

    let driver = Driver::new(session.browser(), &config.site, &config.scraping)?;
    Ok(driver.run_into(accumulator).await)
}

fn summarize(outcome: &RunOutcome, records: usize) {
    match &outcome.termination {
        Termination::Done => info!(
            records,
            skipped_pages = outcome.skipped_pages.len(),
            skipped_listings = outcome.skipped_listings,
            "scrape finished"
        ),
        Termination::Aborted { page, reason } => warn!(
            page = page.get(),
            reason = %reason,
            records,
            "scrape aborted early, partial results exported"
        ),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    info!("Starting sewakost-scraper v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    let session = Session::launch(&config.browser)
        .await
        .context("launching browser")?;

    let mut accumulator = RunAccumulator::default();
    let outcome = AssertUnwindSafe(paginate(&session, &config, &mut accumulator))
        .catch_unwind()
        .await;

    if outcome.is_err() && !accumulator.is_empty() {
        warn!(
            records = accumulator.len(),
            "exporting records gathered before the run panicked"
        );
    }
    let output = &config.export.output_path;
    let exported = export::write_csv(output, accumulator.records())
        .with_context(|| format!("writing export to {}", output.display()));

    if let Err(e) = session.close().await {
        warn!(error = %e, "browser teardown failed");
    }

    let records = exported?;
    match outcome {
        Ok(Ok(outcome)) => {
            summarize(&outcome, records);
            Ok(())
        }
        Ok(Err(e)) => {
            error!(error = %e, "scrape failed");
            Err(e)
        }
        Err(_) => {
            error!("scrape run panicked");
            anyhow::bail!("scrape run panicked")
        }
    }
}

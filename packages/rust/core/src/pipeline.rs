//! The two entry points of a run, kept independent of each other:
//!
//! - [`fetch_and_report`]: scrape the remote quote of the day and report it
//! - [`pick_and_publish`]: pick a catalog quote and publish it into the README

use std::io::Write;
use std::sync::Mutex;

use tracing::{instrument, warn};

use maqeal_fetcher::RemoteQuoteFetcher;
use maqeal_shared::{MaqealError, Result, ScrapedQuote};

use crate::publish::{PublishOutcome, ReadmePublisher};

/// Receives the operator-facing events of a run.
pub trait StatusReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called with the scraped quote on a successful fetch.
    fn fetched(&self, quote: &ScrapedQuote);
    /// Called when the fetch failed, before the error is returned.
    fn fetch_failed(&self, error: &MaqealError);
    /// Called after a publish run finished without error.
    fn published(&self, outcome: &PublishOutcome);
}

/// No-op reporter for headless/test usage.
pub struct SilentReporter;

impl StatusReporter for SilentReporter {
    fn phase(&self, _name: &str) {}
    fn fetched(&self, _quote: &ScrapedQuote) {}
    fn fetch_failed(&self, _error: &MaqealError) {}
    fn published(&self, _outcome: &PublishOutcome) {}
}

/// Writes human-readable status lines to any writer (stdout in the CLI).
pub struct ConsoleReporter<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Give back the writer, e.g. to inspect a buffer.
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lines(&self, lines: &[String]) {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        for line in lines {
            if let Err(e) = writeln!(out, "{line}") {
                warn!(error = %e, "failed to write status line");
                return;
            }
        }
    }
}

impl<W: Write + Send> StatusReporter for ConsoleReporter<W> {
    fn phase(&self, _name: &str) {}

    fn fetched(&self, quote: &ScrapedQuote) {
        self.lines(&[
            "✅ Daily quote updated successfully.".into(),
            format!("Quote: {}", quote.quote),
            format!("Author: {}", quote.author),
        ]);
    }

    fn fetch_failed(&self, _error: &MaqealError) {
        self.lines(&[
            "Failed to update daily quote.".into(),
            "Failed to fetch a random quote from Wikiquote.".into(),
        ]);
    }

    fn published(&self, outcome: &PublishOutcome) {
        if outcome.replaced {
            self.lines(&[
                format!("✅ Quote published to {}.", outcome.document.display()),
                format!("Quote: {}", outcome.quote.quote),
                format!("Author: {}", outcome.quote.author),
                format!("Hits: {}", outcome.quote.hits),
            ]);
        } else {
            self.lines(&[format!(
                "No quote markers in {}, nothing published.",
                outcome.document.display()
            )]);
        }
    }
}

/// Fetch the remote quote of the day and report it.
///
/// On failure both failure lines are reported and the error is returned, so the
/// caller can exit non-zero. The local catalog is never used as a fallback.
#[instrument(skip_all, fields(url = %fetcher.url()))]
pub async fn fetch_and_report(
    fetcher: &RemoteQuoteFetcher,
    reporter: &dyn StatusReporter,
) -> Result<ScrapedQuote> {
    reporter.phase("Fetching quote of the day");

    match fetcher.fetch().await {
        Ok(quote) => {
            reporter.fetched(&quote);
            Ok(quote)
        }
        Err(e) => {
            warn!(error = %e, "remote fetch failed");
            reporter.fetch_failed(&e);
            Err(e)
        }
    }
}

/// Pick a catalog quote, publish it into the target document, and report it.
#[instrument(skip_all)]
pub fn pick_and_publish(
    publisher: &ReadmePublisher,
    reporter: &dyn StatusReporter,
) -> Result<PublishOutcome> {
    reporter.phase("Publishing quote");
    let outcome = publisher.publish()?;
    reporter.published(&outcome);
    Ok(outcome)
}

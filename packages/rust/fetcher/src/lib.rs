//! Remote "quote of the day" fetcher.
//!
//! Fetches a single wiki page over HTTP and hands the parsed document to a
//! [`QuoteExtractor`]. There is no retry and no cache: one request per run,
//! bounded by a timeout since runs are unattended.

mod extract;

use std::time::Duration;

use maqeal_shared::{MaqealError, RemoteConfig, Result, ScrapedQuote};
use reqwest::Client;
use scraper::Html;
use tracing::{debug, info, instrument};
use url::Url;

pub use extract::{QuoteExtractor, StructuralPath, StructuralPathExtractor};

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// User-Agent string for fetch requests.
const USER_AGENT: &str = concat!("ma-qeal/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Fetch options
// ---------------------------------------------------------------------------

/// Transport settings for the fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Timeout for the whole request in seconds.
    pub timeout_secs: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self { timeout_secs: 20 }
    }
}

// ---------------------------------------------------------------------------
// RemoteQuoteFetcher
// ---------------------------------------------------------------------------

/// Fetches a page and extracts a quote from it.
pub struct RemoteQuoteFetcher {
    client: Client,
    url: Url,
    extractor: Box<dyn QuoteExtractor>,
}

impl RemoteQuoteFetcher {
    /// Create a fetcher for `url` using the given extraction strategy.
    pub fn new(url: Url, opts: &FetchOptions, extractor: Box<dyn QuoteExtractor>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(opts.timeout_secs))
            .build()
            .map_err(|e| MaqealError::fetch(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url,
            extractor,
        })
    }

    /// Build a fetcher from the `[remote]` config section with the structural-path extractor.
    pub fn from_config(config: &RemoteConfig) -> Result<Self> {
        let extractor = StructuralPathExtractor::parse(&config.structural_path)?;
        let opts = FetchOptions {
            timeout_secs: config.timeout_secs,
        };
        Self::new(config.parsed_url()?, &opts, Box::new(extractor))
    }

    /// The page this fetcher reads.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch the page and extract its quote.
    #[instrument(skip_all, fields(url = %self.url, extractor = self.extractor.name()))]
    pub async fn fetch(&self) -> Result<ScrapedQuote> {
        let body = self.fetch_raw().await?;

        let doc = Html::parse_document(&body);
        let quote = self.extractor.extract(&doc)?;

        info!(author = %quote.author, "quote extracted");
        Ok(quote)
    }

    /// GET the page body. Fails on transport errors, non-2xx status, or an empty body.
    async fn fetch_raw(&self) -> Result<String> {
        let url = &self.url;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| MaqealError::fetch(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MaqealError::fetch(format!("{url}: HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| MaqealError::fetch(format!("{url}: failed to read body: {e}")))?;

        if body.trim().is_empty() {
            return Err(MaqealError::fetch(format!("{url}: empty response")));
        }

        debug!(bytes = body.len(), "page fetched");
        Ok(body)
    }
}

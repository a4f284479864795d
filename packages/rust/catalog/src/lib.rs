//! Flat-file quote catalog.
//!
//! The catalog is a JSON array of [`Quote`] records (`assets/quotes.json`),
//! always read wholesale. Writes go through a sibling temp file and a rename so
//! a crashed run never leaves a half-written catalog behind.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use maqeal_shared::{MaqealError, Quote, QuoteId, Result, fs};

/// Read/write access to the quote catalog file.
#[derive(Debug, Clone)]
pub struct QuoteStore {
    path: PathBuf,
}

impl QuoteStore {
    /// Create a store backed by the catalog file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the catalog file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every quote in catalog order.
    pub fn load_all(&self) -> Result<Vec<Quote>> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            MaqealError::storage(format!("cannot read {}: {e}", self.path.display()))
        })?;

        let quotes: Vec<Quote> = serde_json::from_str(&content).map_err(|e| {
            MaqealError::storage(format!("invalid catalog {}: {e}", self.path.display()))
        })?;

        debug!(path = %self.path.display(), count = quotes.len(), "catalog loaded");
        Ok(quotes)
    }

    /// Pick a quote uniformly at random.
    pub fn pick_random(&self) -> Result<Quote> {
        self.pick_random_with(&mut fastrand::Rng::new())
    }

    /// Pick a quote uniformly at random using the given generator.
    ///
    /// Fails with [`MaqealError::NotFound`] when the catalog is empty or cannot be loaded.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn pick_random_with(&self, rng: &mut fastrand::Rng) -> Result<Quote> {
        let mut quotes = match self.load_all() {
            Ok(quotes) => quotes,
            Err(e) => {
                warn!(error = %e, "catalog unavailable");
                return Err(MaqealError::not_found(e.to_string()));
            }
        };

        if quotes.is_empty() {
            return Err(MaqealError::not_found(format!(
                "catalog {} is empty",
                self.path.display()
            )));
        }

        let index = rng.usize(..quotes.len());
        let quote = quotes.swap_remove(index);
        debug!(id = %quote.id, hits = quote.hits, "quote selected");
        Ok(quote)
    }

    /// Find a quote by id.
    pub fn get(&self, id: &QuoteId) -> Result<Quote> {
        self.load_all()?
            .into_iter()
            .find(|q| &q.id == id)
            .ok_or_else(|| MaqealError::not_found(format!("no quote with id {id}")))
    }

    /// Write `quote.hits` back to the catalog record with the same id.
    ///
    /// The catalog is re-read right before the write; all other records and
    /// fields are written back unchanged.
    #[instrument(skip_all, fields(id = %quote.id, hits = quote.hits))]
    pub fn record_hits(&self, quote: &Quote) -> Result<()> {
        let mut quotes = self.load_all()?;

        let record = quotes
            .iter_mut()
            .find(|q| q.id == quote.id)
            .ok_or_else(|| MaqealError::not_found(format!("no quote with id {}", quote.id)))?;
        record.hits = quote.hits;

        self.save_all(&quotes)?;
        debug!("hit counter persisted");
        Ok(())
    }

    /// Replace the catalog file atomically.
    fn save_all(&self, quotes: &[Quote]) -> Result<()> {
        let mut json = serde_json::to_string_pretty(quotes).map_err(|e| {
            MaqealError::storage(format!("catalog serialization failed: {e}"))
        })?;
        json.push('\n');
        fs::write_atomic(&self.path, &json)
    }
}

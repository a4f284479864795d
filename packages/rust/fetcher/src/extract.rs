//! Quote extraction strategies for the fetched page.
//!
//! The remote page has no stable markup for the quote of the day, so extraction
//! is a swappable strategy. The built-in one follows a fixed element path and
//! breaks as soon as the page layout changes; a new layout means a new path (or
//! a new extractor), not a change to the transport.

use std::str::FromStr;

use maqeal_shared::{MaqealError, Result, ScrapedQuote};
use scraper::{ElementRef, Html};

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Pulls a quote out of a parsed page.
pub trait QuoteExtractor: Send + Sync {
    /// Extract the quote, or fail with [`MaqealError::Fetch`] if the page does
    /// not have the expected shape.
    fn extract(&self, doc: &Html) -> Result<ScrapedQuote>;

    /// Human-readable extractor name for tracing.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Structural path
// ---------------------------------------------------------------------------

/// One `tag[n]` step of a [`StructuralPath`]. `n` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PathStep {
    tag: String,
    index: usize,
}

/// Absolute element path such as `/html/body/div[2]/table/tbody/tr/td[3]`.
///
/// Each step selects the `n`-th element child with the given tag name; a step
/// without an index selects the first one. Text nodes are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralPath {
    steps: Vec<PathStep>,
}

impl FromStr for StructuralPath {
    type Err = MaqealError;

    fn from_str(s: &str) -> Result<Self> {
        let rest = s
            .strip_prefix('/')
            .ok_or_else(|| MaqealError::config(format!("structural path must be absolute: {s}")))?;

        let steps = rest
            .split('/')
            .map(|raw| parse_step(raw).ok_or_else(|| {
                MaqealError::config(format!("invalid step '{raw}' in structural path {s}"))
            }))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { steps })
    }
}

fn parse_step(raw: &str) -> Option<PathStep> {
    let (tag, index) = match raw.split_once('[') {
        Some((tag, rest)) => (tag, rest.strip_suffix(']')?.parse::<usize>().ok()?),
        None => (raw, 1),
    };

    let valid_tag = !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphanumeric());
    if !valid_tag || index == 0 {
        return None;
    }

    Some(PathStep {
        tag: tag.to_ascii_lowercase(),
        index,
    })
}

impl StructuralPath {
    /// Walk the path from the document root. `None` if any step is missing.
    pub fn locate<'a>(&self, doc: &'a Html) -> Option<ElementRef<'a>> {
        let (first, rest) = self.steps.split_first()?;

        let root = doc.root_element();
        if root.value().name() != first.tag || first.index != 1 {
            return None;
        }

        rest.iter().try_fold(root, |node, step| {
            node.children()
                .filter_map(ElementRef::wrap)
                .filter(|el| el.value().name() == step.tag)
                .nth(step.index - 1)
        })
    }
}

// ---------------------------------------------------------------------------
// StructuralPathExtractor
// ---------------------------------------------------------------------------

/// Reads the quote from the cell at a fixed [`StructuralPath`].
///
/// The cell's text is split into trimmed non-empty lines; the first is the
/// quote and the third is the attribution.
#[derive(Debug, Clone)]
pub struct StructuralPathExtractor {
    path: StructuralPath,
}

impl StructuralPathExtractor {
    pub fn new(path: StructuralPath) -> Self {
        Self { path }
    }

    /// Build from a path string, see [`StructuralPath`].
    pub fn parse(path: &str) -> Result<Self> {
        Ok(Self::new(path.parse()?))
    }
}

impl QuoteExtractor for StructuralPathExtractor {
    fn extract(&self, doc: &Html) -> Result<ScrapedQuote> {
        let cell = self
            .path
            .locate(doc)
            .ok_or_else(|| MaqealError::fetch("quote cell not found on page"))?;

        let text = cell.text().collect::<String>();
        quote_from_lines(&text)
    }

    fn name(&self) -> &str {
        "structural-path"
    }
}

/// Trimmed, non-empty lines of `text`.
fn content_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

fn quote_from_lines(text: &str) -> Result<ScrapedQuote> {
    let lines = content_lines(text);
    match lines.as_slice() {
        [quote, _, author, ..] => Ok(ScrapedQuote {
            quote: (*quote).to_string(),
            author: (*author).to_string(),
        }),
        _ => Err(MaqealError::fetch(format!(
            "quote cell has {} non-empty lines, expected at least 3",
            lines.len()
        ))),
    }
}

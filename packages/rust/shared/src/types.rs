//! Core domain types for ma-qeal quotes.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// QuoteId
// ---------------------------------------------------------------------------

/// Stable identifier of a catalog quote.
///
/// Catalog files in the wild use both numeric and string ids, so both are accepted
/// and written back in the form they were read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuoteId {
    Number(u64),
    Text(String),
}

impl std::fmt::Display for QuoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl std::str::FromStr for QuoteId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.parse::<u64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(s.to_string()),
        })
    }
}

impl From<u64> for QuoteId {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

// ---------------------------------------------------------------------------
// Quote
// ---------------------------------------------------------------------------

/// A single record of the quote catalog (`assets/quotes.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Unique identifier within the catalog.
    pub id: QuoteId,
    /// Quote text. May contain line breaks; they are collapsed before publishing.
    pub quote: String,
    /// Attribution.
    pub author: String,
    /// How many times this quote has been published.
    #[serde(default)]
    pub hits: u64,
    /// Optional image URL or repository-relative path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Any other fields present on the record, kept so a rewrite does not drop them.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Quote {
    /// Build a catalog quote with no hits, image, or extra fields.
    pub fn new(id: impl Into<QuoteId>, quote: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            quote: quote.into(),
            author: author.into(),
            hits: 0,
            image: None,
            extra: serde_json::Map::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// ScrapedQuote
// ---------------------------------------------------------------------------

/// A quote scraped from the remote wiki page. Never stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedQuote {
    pub quote: String,
    pub author: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_id_accepts_numbers_and_strings() {
        let quotes: Vec<Quote> = serde_json::from_str(
            r#"[
                {"id": 7, "quote": "a", "author": "b", "hits": 2},
                {"id": "ibn-khaldun-1", "quote": "c", "author": "d"}
            ]"#,
        )
        .expect("parse");

        assert_eq!(quotes[0].id, QuoteId::Number(7));
        assert_eq!(quotes[0].hits, 2);
        assert_eq!(quotes[1].id, QuoteId::Text("ibn-khaldun-1".into()));
        assert_eq!(quotes[1].hits, 0);
        assert_eq!(quotes[1].id.to_string(), "ibn-khaldun-1");
    }

    #[test]
    fn quote_id_from_str_prefers_numbers() {
        assert_eq!("12".parse::<QuoteId>().unwrap(), QuoteId::Number(12));
        assert_eq!("x12".parse::<QuoteId>().unwrap(), QuoteId::Text("x12".into()));
    }

    #[test]
    fn unknown_fields_survive_a_rewrite() {
        let json = r#"{"id":1,"quote":"q","author":"a","hits":0,"lang":"ar"}"#;
        let quote: Quote = serde_json::from_str(json).expect("parse");
        assert_eq!(quote.extra.get("lang"), Some(&serde_json::json!("ar")));

        let out = serde_json::to_string(&quote).expect("serialize");
        assert!(out.contains(r#""lang":"ar""#));
        assert!(!out.contains("image"));
    }

    #[test]
    fn catalog_fixture_validates() {
        let fixture = std::fs::read_to_string("../../../fixtures/json/quotes.fixture.json")
            .expect("read fixture");
        let quotes: Vec<Quote> = serde_json::from_str(&fixture).expect("deserialize fixture");
        assert_eq!(quotes.len(), 3);
        assert!(quotes.iter().any(|q| q.image.is_some()));
    }
}

//! Local pick-and-publish flow: catalog quote → README quote block.
//!
//! Picks a random catalog quote, bumps its hit counter, renders it to Markdown
//! and splices it between the quote markers of the target document. Everything
//! outside the marked region is written back unchanged.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::Local;
use regex::{NoExpand, Regex};
use tracing::{debug, info, instrument, warn};

use maqeal_catalog::QuoteStore;
use maqeal_markdown::{normalize_line_breaks, to_html_fragment, to_markdown};
use maqeal_shared::{AppConfig, MaqealError, PublishConfig, Quote, Result, fs};

use crate::log::UpdateLog;

/// Opening marker of the quote region.
pub const QUOTE_START: &str = "<!-- QUOTE:START -->";

/// Closing marker of the quote region.
pub const QUOTE_END: &str = "<!-- QUOTE:END -->";

static REGION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "(?s){}.*?{}",
        regex::escape(QUOTE_START),
        regex::escape(QUOTE_END)
    ))
    .expect("valid regex")
});

/// Result of a publish run.
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    /// The selected quote, with its incremented hit counter and collapsed line breaks.
    pub quote: Quote,
    /// Whether the quote region was found and replaced.
    pub replaced: bool,
    /// The document that was (or would have been) updated.
    pub document: PathBuf,
}

/// Publishes catalog quotes into a Markdown document.
#[derive(Debug, Clone)]
pub struct ReadmePublisher {
    store: QuoteStore,
    document: PathBuf,
    log: UpdateLog,
    settings: PublishConfig,
    html_fragment: Option<PathBuf>,
}

impl ReadmePublisher {
    /// Publisher with default settings: hits persisted, missing markers skipped.
    pub fn new(store: QuoteStore, document: impl Into<PathBuf>, log: UpdateLog) -> Self {
        Self {
            store,
            document: document.into(),
            log,
            settings: PublishConfig::default(),
            html_fragment: None,
        }
    }

    /// Publisher wired to the paths and `[publish]` settings of `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        let paths = config.paths.resolve();
        Self::new(QuoteStore::new(paths.catalog), paths.readme, UpdateLog::new(paths.log))
            .with_settings(config.publish.clone())
            .with_html_fragment(paths.html_fragment)
    }

    pub fn with_settings(mut self, settings: PublishConfig) -> Self {
        self.settings = settings;
        self
    }

    /// Also write the HTML snippet of the published quote to `path`.
    pub fn with_html_fragment(mut self, path: Option<PathBuf>) -> Self {
        self.html_fragment = path;
        self
    }

    pub fn store(&self) -> &QuoteStore {
        &self.store
    }

    /// Publish a randomly chosen quote.
    pub fn publish(&self) -> Result<PublishOutcome> {
        self.publish_with(&mut fastrand::Rng::new())
    }

    /// Publish a quote chosen with the given generator.
    #[instrument(skip_all, fields(document = %self.document.display()))]
    pub fn publish_with(&self, rng: &mut fastrand::Rng) -> Result<PublishOutcome> {
        let mut quote = self.store.pick_random_with(rng)?;
        quote.hits = quote.hits.checked_add(1).ok_or_else(|| {
            MaqealError::storage(format!("hit counter of quote {} overflows", quote.id))
        })?;
        quote.quote = normalize_line_breaks(&quote.quote);

        let markdown = to_markdown(&quote);
        let content = read_document(&self.document)?;

        let Some(updated) = splice(&content, &markdown) else {
            if self.settings.require_markers {
                return Err(MaqealError::MarkersNotFound {
                    path: self.document.clone(),
                });
            }
            warn!(id = %quote.id, "quote markers not found, document left unchanged");
            return Ok(PublishOutcome {
                quote,
                replaced: false,
                document: self.document.clone(),
            });
        };

        if self.settings.persist_hits {
            self.store.record_hits(&quote)?;
        }

        fs::write_atomic(&self.document, &updated)?;
        debug!(bytes = updated.len(), "document written");

        if let Err(e) = self.log.append(&format!("{} - {}", quote.id, quote.hits)) {
            warn!(error = %e, log = %self.log.path().display(), "failed to write update log");
        }

        if let Some(path) = &self.html_fragment {
            write_fragment(path, &quote)?;
        }

        info!(id = %quote.id, hits = quote.hits, "quote published");
        Ok(PublishOutcome {
            quote,
            replaced: true,
            document: self.document.clone(),
        })
    }
}

/// Replace the first marked region of `document` with `markdown`, keeping both markers.
///
/// Returns `None` when the document has no complete region. The replacement is
/// inserted literally.
pub fn splice(document: &str, markdown: &str) -> Option<String> {
    if !REGION_RE.is_match(document) {
        return None;
    }
    let block = format!("{QUOTE_START}{markdown}{QUOTE_END}");
    Some(REGION_RE.replace(document, NoExpand(&block)).into_owned())
}

fn read_document(path: &Path) -> Result<String> {
    let not_found = || MaqealError::DocumentNotFound {
        path: path.to_path_buf(),
    };

    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "cannot read document");
        }
        not_found()
    })?;

    if content.is_empty() {
        return Err(not_found());
    }
    Ok(content)
}

fn write_fragment(path: &Path, quote: &Quote) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| MaqealError::io(dir, e))?;
    }
    fs::write_atomic(path, &to_html_fragment(quote, &Local::now()))?;
    debug!(path = %path.display(), "HTML fragment written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const README: &str = "# ما قال\n\nIntro paragraph.\n\n<!-- QUOTE:START -->\n# old quote\n\n- old author\n\n<!-- QUOTE:END -->\n\n## Footer\n\nCost: $5 and $1.\n";

    struct Fixture {
        dir: PathBuf,
        publisher: ReadmePublisher,
    }

    impl Fixture {
        fn new(catalog: &str, readme: Option<&str>) -> Self {
            let dir = std::env::temp_dir().join(format!("maqeal-publish-test-{}", uuid::Uuid::now_v7()));
            std::fs::create_dir_all(dir.join("assets")).unwrap();
            std::fs::write(dir.join("assets/quotes.json"), catalog).unwrap();
            if let Some(readme) = readme {
                std::fs::write(dir.join("README.md"), readme).unwrap();
            }

            let publisher = ReadmePublisher::new(
                QuoteStore::new(dir.join("assets/quotes.json")),
                dir.join("README.md"),
                UpdateLog::new(dir.join("assets/DEPLOYMENT.log")),
            );
            Self { dir, publisher }
        }

        fn readme(&self) -> String {
            std::fs::read_to_string(self.dir.join("README.md")).unwrap()
        }

        fn log(&self) -> Option<String> {
            std::fs::read_to_string(self.dir.join("assets/DEPLOYMENT.log")).ok()
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            std::fs::remove_dir_all(&self.dir).ok();
        }
    }

    const SINGLE: &str = r#"[{"id": 1, "quote": "A\nB", "author": "X", "hits": 0}]"#;

    #[test]
    fn end_to_end_single_quote() {
        let fx = Fixture::new(SINGLE, Some(README));

        let outcome = fx.publisher.publish().expect("publish");
        assert!(outcome.replaced);
        assert_eq!(outcome.quote.hits, 1);
        assert_eq!(outcome.quote.quote, "A B");

        let readme = fx.readme();
        assert!(readme.contains("# A B\n"));
        assert!(!readme.contains("A\nB"));

        let log = fx.log().expect("log written");
        assert_eq!(log.lines().count(), 1);
        assert!(log.lines().next().unwrap().ends_with("1 - 1"));
    }

    #[test]
    fn content_outside_region_is_preserved() {
        let fx = Fixture::new(SINGLE, Some(README));
        fx.publisher.publish().unwrap();

        let readme = fx.readme();
        let (before, after) = README.split_once(QUOTE_START).unwrap();
        let (_, after) = after.split_once(QUOTE_END).unwrap();
        assert!(readme.starts_with(&format!("{before}{QUOTE_START}")));
        assert!(readme.ends_with(&format!("{QUOTE_END}{after}")));
        assert_eq!(
            readme,
            format!("{before}{QUOTE_START}\n# A B\n\n- X\n\n{QUOTE_END}{after}")
        );
    }

    #[test]
    fn hits_increment_by_one_and_persist() {
        let fx = Fixture::new(
            r#"[{"id": "q7", "quote": "Q", "author": "Y", "hits": 41}]"#,
            Some(README),
        );

        let first = fx.publisher.publish().unwrap();
        assert_eq!(first.quote.hits, 42);
        let second = fx.publisher.publish().unwrap();
        assert_eq!(second.quote.hits, 43);

        let stored = fx.publisher.store().load_all().unwrap();
        assert_eq!(stored[0].hits, 43);
        assert!(fx.log().unwrap().ends_with("q7 - 43\n"));
    }

    #[test]
    fn hits_stay_in_memory_when_persistence_is_off() {
        let fx = Fixture::new(SINGLE, Some(README));
        let publisher = fx.publisher.clone().with_settings(PublishConfig {
            persist_hits: false,
            require_markers: false,
        });

        assert_eq!(publisher.publish().unwrap().quote.hits, 1);
        assert_eq!(publisher.publish().unwrap().quote.hits, 1);
        assert_eq!(publisher.store().load_all().unwrap()[0].hits, 0);
    }

    #[test]
    fn republishing_keeps_markers() {
        let fx = Fixture::new(SINGLE, Some(README));
        fx.publisher.publish().unwrap();
        fx.publisher.publish().unwrap();

        let readme = fx.readme();
        assert_eq!(readme.matches(QUOTE_START).count(), 1);
        assert_eq!(readme.matches(QUOTE_END).count(), 1);
    }

    #[test]
    fn image_is_embedded_when_present() {
        let fx = Fixture::new(
            r#"[{"id": 3, "quote": "Q", "author": "Y", "hits": 0, "image": "assets/q.png"}]"#,
            Some(README),
        );
        fx.publisher.publish().unwrap();
        assert!(
            fx.readme()
                .contains("- Y\n\n\n![Quote Image](assets/q.png)<!-- QUOTE:END -->")
        );
    }

    #[test]
    fn missing_markers_leave_document_unchanged() {
        let original = "# Title\n\nNo markers here.\n";
        let fx = Fixture::new(SINGLE, Some(original));

        let outcome = fx.publisher.publish().expect("no-op publish");
        assert!(!outcome.replaced);
        assert_eq!(fx.readme(), original);
        assert!(fx.log().is_none());
        assert_eq!(fx.publisher.store().load_all().unwrap()[0].hits, 0);
    }

    #[test]
    fn missing_markers_fail_when_required() {
        let original = "# Title\n\n<!-- QUOTE:START --> but never closed\n";
        let fx = Fixture::new(SINGLE, Some(original));
        let publisher = fx.publisher.clone().with_settings(PublishConfig {
            persist_hits: true,
            require_markers: true,
        });

        let err = publisher.publish().unwrap_err();
        assert!(matches!(err, MaqealError::MarkersNotFound { .. }));
        assert_eq!(fx.readme(), original);
    }

    #[test]
    fn missing_document_is_document_not_found() {
        let fx = Fixture::new(SINGLE, None);
        assert!(matches!(
            fx.publisher.publish(),
            Err(MaqealError::DocumentNotFound { .. })
        ));
        assert!(fx.log().is_none());
    }

    #[test]
    fn empty_document_is_document_not_found() {
        let fx = Fixture::new(SINGLE, Some(""));
        assert!(matches!(
            fx.publisher.publish(),
            Err(MaqealError::DocumentNotFound { .. })
        ));
    }

    #[test]
    fn failed_hit_persistence_leaves_document_untouched() {
        let fx = Fixture::new(SINGLE, Some(README));
        // A directory where the catalog's temp file goes makes the rewrite fail.
        std::fs::create_dir_all(fx.dir.join("assets/.quotes.json.tmp")).unwrap();

        let err = fx.publisher.publish().unwrap_err();
        assert!(matches!(err, MaqealError::Io { .. }));
        assert_eq!(fx.readme(), README);
        assert!(fx.log().is_none());
        assert_eq!(fx.publisher.store().load_all().unwrap()[0].hits, 0);
    }

    #[test]
    fn unwritable_log_does_not_fail_publish() {
        let fx = Fixture::new(SINGLE, Some(README));
        std::fs::create_dir_all(fx.dir.join("assets/DEPLOYMENT.log")).unwrap();

        let outcome = fx.publisher.publish().expect("publish despite log failure");
        assert!(outcome.replaced);
        assert!(fx.readme().contains("# A B\n"));
        assert_eq!(fx.publisher.store().load_all().unwrap()[0].hits, 1);
    }

    #[test]
    fn saturated_hit_counter_is_storage_error() {
        let catalog = format!(
            r#"[{{"id": 1, "quote": "Q", "author": "Y", "hits": {}}}]"#,
            u64::MAX
        );
        let fx = Fixture::new(&catalog, Some(README));

        let err = fx.publisher.publish().unwrap_err();
        assert!(matches!(err, MaqealError::Storage { .. }));
        assert_eq!(fx.readme(), README);
    }

    #[test]
    fn empty_catalog_is_not_found() {
        let fx = Fixture::new("[]", Some(README));
        assert!(matches!(
            fx.publisher.publish(),
            Err(MaqealError::NotFound { .. })
        ));
        assert_eq!(fx.readme(), README);
    }

    #[test]
    fn html_fragment_is_written_when_configured() {
        let fx = Fixture::new(SINGLE, Some(README));
        let target = fx.dir.join("public/quote.html");
        let publisher = fx.publisher.clone().with_html_fragment(Some(target.clone()));

        publisher.publish().unwrap();

        let html = std::fs::read_to_string(&target).expect("fragment written");
        assert!(html.contains("<h1 class=\"quote-text\">A B</h1>"));
        assert!(html.contains("المشاهدات: 1"));
    }

    #[test]
    fn from_config_uses_resolved_paths() {
        let fx = Fixture::new(SINGLE, Some(README));
        let mut config = AppConfig::default();
        config.paths.base_dir = fx.dir.clone();

        let outcome = ReadmePublisher::from_config(&config).publish().unwrap();
        assert_eq!(outcome.document, fx.dir.join("README.md"));
        assert!(fx.readme().contains("# A B"));
    }

    #[test]
    fn splice_inserts_dollar_signs_literally() {
        let doc = "a <!-- QUOTE:START -->x<!-- QUOTE:END --> b";
        let out = splice(doc, "\n# costs $1 and ${name}\n").unwrap();
        assert_eq!(
            out,
            "a <!-- QUOTE:START -->\n# costs $1 and ${name}\n<!-- QUOTE:END --> b"
        );
    }

    #[test]
    fn splice_is_non_greedy_and_replaces_first_region() {
        let doc = "<!-- QUOTE:START -->1<!-- QUOTE:END -->|<!-- QUOTE:START -->2<!-- QUOTE:END -->";
        let out = splice(doc, "N").unwrap();
        assert_eq!(
            out,
            "<!-- QUOTE:START -->N<!-- QUOTE:END -->|<!-- QUOTE:START -->2<!-- QUOTE:END -->"
        );
    }

    #[test]
    fn splice_without_markers_is_none() {
        assert!(splice("plain", "N").is_none());
        assert!(splice("<!-- QUOTE:END --><!-- QUOTE:START -->", "N").is_none());
    }
}

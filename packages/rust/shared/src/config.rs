//! Application configuration for ma-qeal.
//!
//! Config lives in `maqeal.toml`, looked up next to the repository being
//! updated first and under `~/.maqeal/` second. CLI flags override config file
//! values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{MaqealError, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "maqeal.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".maqeal";

/// Arabic Wikiquote main page ("الصفحة_الرئيسية").
const DEFAULT_REMOTE_URL: &str = "https://ar.wikiquote.org/wiki/%D8%A7%D9%84%D8%B5%D9%81%D8%AD%D8%A9_%D8%A7%D9%84%D8%B1%D8%A6%D9%8A%D8%B3%D9%8A%D8%A9";

/// Location of the "quote of the day" cell on the Arabic Wikiquote main page.
const DEFAULT_STRUCTURAL_PATH: &str = "/html/body/div[2]/div/div[3]/main/div[3]/div[3]/div[1]/table[1]/tbody/tr[1]/td/div[2]/div[2]/center/table/tbody/tr/td[3]";

// ---------------------------------------------------------------------------
// Config structs (matching maqeal.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// File locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Remote quote source.
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Publish behavior.
    #[serde(default)]
    pub publish: PublishConfig,
}

/// `[paths]` section. Relative paths are resolved against `base_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Repository root that the other paths are relative to.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Markdown document holding the quote markers.
    #[serde(default = "default_readme")]
    pub readme: PathBuf,

    /// JSON quote catalog.
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,

    /// Append-only update log.
    #[serde(default = "default_log")]
    pub log: PathBuf,

    /// Where to write the HTML snippet on publish. Not written when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_fragment: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            readme: default_readme(),
            catalog: default_catalog(),
            log: default_log(),
            html_fragment: None,
        }
    }
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_readme() -> PathBuf {
    PathBuf::from("README.md")
}
fn default_catalog() -> PathBuf {
    PathBuf::from("assets/quotes.json")
}
fn default_log() -> PathBuf {
    PathBuf::from("assets/DEPLOYMENT.log")
}

/// `[remote]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Page to scrape the quote of the day from.
    #[serde(default = "default_remote_url")]
    pub url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Absolute element path to the quote cell, e.g. `/html/body/div[2]/...`.
    #[serde(default = "default_structural_path")]
    pub structural_path: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: default_remote_url(),
            timeout_secs: default_timeout_secs(),
            structural_path: default_structural_path(),
        }
    }
}

impl RemoteConfig {
    /// Parse and validate the configured URL.
    pub fn parsed_url(&self) -> Result<Url> {
        Url::parse(&self.url)
            .map_err(|e| MaqealError::config(format!("invalid remote url '{}': {e}", self.url)))
    }
}

fn default_remote_url() -> String {
    DEFAULT_REMOTE_URL.into()
}
fn default_timeout_secs() -> u64 {
    20
}
fn default_structural_path() -> String {
    DEFAULT_STRUCTURAL_PATH.into()
}

/// `[publish]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Write the incremented hit counter back to the catalog.
    #[serde(default = "default_true")]
    pub persist_hits: bool,

    /// Fail instead of skipping when the document has no quote markers.
    #[serde(default)]
    pub require_markers: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            persist_hits: true,
            require_markers: false,
        }
    }
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Resolved paths
// ---------------------------------------------------------------------------

/// Absolute-or-cwd-relative file locations derived from [`PathsConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub readme: PathBuf,
    pub catalog: PathBuf,
    pub log: PathBuf,
    pub html_fragment: Option<PathBuf>,
}

impl PathsConfig {
    /// Join every configured path onto `base_dir`. Absolute paths are kept as-is.
    pub fn resolve(&self) -> ResolvedPaths {
        let base = &self.base_dir;
        ResolvedPaths {
            readme: base.join(&self.readme),
            catalog: base.join(&self.catalog),
            log: base.join(&self.log),
            html_fragment: self.html_fragment.as_ref().map(|p| base.join(p)),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the user config directory (`~/.maqeal/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| MaqealError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the user config file (`~/.maqeal/maqeal.toml`).
pub fn user_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the config for a repository rooted at `base_dir`.
///
/// Tries `<base_dir>/maqeal.toml`, then `~/.maqeal/maqeal.toml`, and returns
/// defaults if neither exists. A relative `paths.base_dir` in the user file is
/// taken relative to `base_dir`, so only an absolute one moves the repository.
pub fn load_config(base_dir: &Path) -> Result<AppConfig> {
    load_config_with(base_dir, user_config_path().ok().as_deref())
}

fn load_config_with(base_dir: &Path, user: Option<&Path>) -> Result<AppConfig> {
    let local = base_dir.join(CONFIG_FILE_NAME);
    if local.exists() {
        return load_config_from(&local);
    }

    if let Some(user) = user.filter(|p| p.exists()) {
        let mut config = parse_config_file(user)?;
        config.paths.base_dir = base_dir.join(&config.paths.base_dir);
        tracing::debug!(
            path = %user.display(),
            base_dir = %config.paths.base_dir.display(),
            "using user config"
        );
        return Ok(config);
    }

    tracing::debug!(base_dir = %base_dir.display(), "config file not found, using defaults");
    let mut config = AppConfig::default();
    config.paths.base_dir = base_dir.to_path_buf();
    Ok(config)
}

/// Load the application config from a specific file path.
///
/// A relative `paths.base_dir` is interpreted relative to the file's directory.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let mut config = parse_config_file(path)?;

    if config.paths.base_dir.is_relative() {
        if let Some(parent) = path.parent() {
            config.paths.base_dir = parent.join(&config.paths.base_dir);
        }
    }

    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| MaqealError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| MaqealError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a default config file at `path`. Refuses to overwrite an existing file.
pub fn init_config(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Err(MaqealError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| MaqealError::io(dir, e))?;
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| MaqealError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| MaqealError::io(path, e))?;
    tracing::info!(path = %path.display(), "created default config file");

    Ok(path.to_path_buf())
}

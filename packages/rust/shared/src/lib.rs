//! Shared types, error model, and configuration for ma-qeal.
//!
//! This crate is the foundation depended on by all other ma-qeal crates.
//! It provides:
//! - [`MaqealError`] — the unified error type
//! - Domain types ([`Quote`], [`QuoteId`], [`ScrapedQuote`])
//! - Configuration ([`AppConfig`], config loading and path resolution)
//! - [`fs::write_atomic`] for whole-file rewrites

pub mod config;
pub mod error;
pub mod fs;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, PathsConfig, PublishConfig, RemoteConfig, ResolvedPaths,
    config_dir, init_config, load_config, load_config_from, user_config_path,
};
pub use error::{MaqealError, Result};
pub use types::{Quote, QuoteId, ScrapedQuote};

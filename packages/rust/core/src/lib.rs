//! Core pipelines for ma-qeal.
//!
//! - [`publish`] — pick a catalog quote and splice it into the README
//! - [`log`] — append-only update log
//! - [`pipeline`] — the remote-fetch and local-publish entry points and status reporting

pub mod log;
pub mod pipeline;
pub mod publish;

pub use log::UpdateLog;
pub use pipeline::{
    ConsoleReporter, SilentReporter, StatusReporter, fetch_and_report, pick_and_publish,
};
pub use publish::{PublishOutcome, QUOTE_END, QUOTE_START, ReadmePublisher, splice};

//! ma-qeal CLI: quote of the day for a repository README.
//!
//! Scrapes the Arabic Wikiquote quote of the day, or picks a quote from the
//! local catalog and splices it into the README between the quote markers.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}

//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use maqeal_catalog::QuoteStore;
use maqeal_core::{
    ConsoleReporter, PublishOutcome, ReadmePublisher, StatusReporter, fetch_and_report,
    pick_and_publish,
};
use maqeal_fetcher::RemoteQuoteFetcher;
use maqeal_markdown::{normalize_line_breaks, to_html_fragment, to_markdown};
use maqeal_shared::{
    AppConfig, CONFIG_FILE_NAME, MaqealError, QuoteId, ScrapedQuote, init_config, load_config,
    load_config_from, user_config_path,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// ma-qeal: keep a quote of the day in your README.
#[derive(Parser)]
#[command(
    name = "maqeal",
    version,
    about = "Fetch the quote of the day or publish a catalog quote into a README.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to <base-dir>/maqeal.toml, then ~/.maqeal/maqeal.toml).
    #[arg(long, global = true, env = "MAQEAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Repository root the configured paths are relative to.
    #[arg(long, global = true, env = "MAQEAL_BASE_DIR")]
    pub base_dir: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Scrape the remote quote of the day and print it.
    Fetch {
        /// Page to scrape instead of the configured one.
        #[arg(long)]
        url: Option<String>,

        /// Request timeout in seconds.
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Pick a random catalog quote and publish it into the README.
    Publish {
        /// Also write the HTML snippet of the quote to this path (relative to the base dir).
        #[arg(long)]
        html: Option<PathBuf>,

        /// Fail when the README has no quote markers.
        #[arg(long)]
        require_markers: bool,

        /// Do not write the incremented hit counter back to the catalog.
        #[arg(long)]
        no_persist_hits: bool,
    },

    /// Print the rendered block for one catalog quote without touching any file.
    Render {
        /// Quote id.
        id: String,

        /// Render the HTML snippet instead of Markdown.
        #[arg(long)]
        html: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a config file with defaults.
    Init {
        /// Write to ~/.maqeal/maqeal.toml instead of <base-dir>/maqeal.toml.
        #[arg(long)]
        user: bool,
    },
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr; stdout carries status lines.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "maqeal=info",
        1 => "maqeal=debug",
        _ => "maqeal=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(cli.config.as_deref(), cli.base_dir.as_deref())?;

    match cli.command {
        Command::Fetch { url, timeout } => cmd_fetch(config, url, timeout).await,
        Command::Publish {
            html,
            require_markers,
            no_persist_hits,
        } => cmd_publish(config, html, require_markers, no_persist_hits),
        Command::Render { id, html } => cmd_render(&config, &id, html),
        Command::Config { action } => match action {
            ConfigAction::Init { user } => cmd_config_init(&config, user),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

/// Load the config file, then apply `--base-dir`.
fn resolve_config(config_path: Option<&Path>, base_dir: Option<&Path>) -> Result<AppConfig> {
    let mut config = match config_path {
        Some(path) => load_config_from(path)?,
        None => load_config(base_dir.unwrap_or(Path::new(".")))?,
    };

    if let Some(base) = base_dir {
        config.paths.base_dir = base.to_path_buf();
    }
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_fetch(mut config: AppConfig, url: Option<String>, timeout: Option<u64>) -> Result<()> {
    if let Some(url) = url {
        config.remote.url = url;
    }
    if let Some(timeout) = timeout {
        config.remote.timeout_secs = timeout;
    }

    let fetcher = RemoteQuoteFetcher::from_config(&config.remote)?;
    info!(url = %fetcher.url(), "fetching remote quote");

    let reporter = CliReporter::new();
    fetch_and_report(&fetcher, &reporter).await?;
    Ok(())
}

fn cmd_publish(
    mut config: AppConfig,
    html: Option<PathBuf>,
    require_markers: bool,
    no_persist_hits: bool,
) -> Result<()> {
    if html.is_some() {
        config.paths.html_fragment = html;
    }
    config.publish.require_markers |= require_markers;
    if no_persist_hits {
        config.publish.persist_hits = false;
    }

    let publisher = ReadmePublisher::from_config(&config);
    info!(
        catalog = %publisher.store().path().display(),
        persist_hits = config.publish.persist_hits,
        "publishing catalog quote"
    );

    let reporter = CliReporter::new();
    pick_and_publish(&publisher, &reporter)?;
    Ok(())
}

fn cmd_render(config: &AppConfig, id: &str, html: bool) -> Result<()> {
    let store = QuoteStore::new(config.paths.resolve().catalog);
    let Ok(id) = id.parse::<QuoteId>();

    let mut quote = store.get(&id)?;
    quote.quote = normalize_line_breaks(&quote.quote);

    if html {
        println!("{}", to_html_fragment(&quote, &chrono::Local::now()));
    } else {
        print!("{}", to_markdown(&quote));
    }
    Ok(())
}

fn cmd_config_init(config: &AppConfig, user: bool) -> Result<()> {
    let path = if user {
        user_config_path()?
    } else {
        config.paths.base_dir.join(CONFIG_FILE_NAME)
    };
    let path = init_config(&path)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config).wrap_err("failed to render config")?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI status reporter
// ---------------------------------------------------------------------------

/// Spinner while working, plain status lines on stdout when done.
struct CliReporter {
    spinner: ProgressBar,
    console: ConsoleReporter<std::io::Stdout>,
}

impl CliReporter {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self {
            spinner,
            console: ConsoleReporter::new(std::io::stdout()),
        }
    }
}

impl StatusReporter for CliReporter {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn fetched(&self, quote: &ScrapedQuote) {
        self.spinner.finish_and_clear();
        self.console.fetched(quote);
    }

    fn fetch_failed(&self, error: &MaqealError) {
        self.spinner.finish_and_clear();
        self.console.fetch_failed(error);
    }

    fn published(&self, outcome: &PublishOutcome) {
        self.spinner.finish_and_clear();
        self.console.published(outcome);
    }
}

impl Drop for CliReporter {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

//! CLI command definitions, routing, and tracing setup.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use steeplescout_core::pipeline::{ProgressReporter, RunConfig};
use steeplescout_shared::{
    AppConfig, FetchConfig, OrgOutcome, RunReport, expand_home, init_config, load_config,
};
use steeplescout_storage::Storage;
use tracing::info;
use url::Url;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// SteepleScout — harvest staff records from a church directory.
#[derive(Parser)]
#[command(
    name = "steeplescout",
    version,
    about = "Crawl a church directory and persist staff/seminary records.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
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
    /// Crawl the directory and persist staff records.
    Run {
        /// Seed directory URL (defaults to the configured directory).
        #[arg(long)]
        url: Option<String>,

        /// Database file path (defaults to the configured path).
        #[arg(long)]
        db: Option<String>,
    },

    /// List persisted staff records.
    List {
        /// Only show records for this church site URL.
        #[arg(long)]
        church: Option<String>,

        /// Maximum rows to print.
        #[arg(long, default_value = "50")]
        limit: u32,

        /// Database file path (defaults to the configured path).
        #[arg(long)]
        db: Option<String>,
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
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "steeplescout=info",
        1 => "steeplescout=debug",
        _ => "steeplescout=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run { url, db } => cmd_run(url.as_deref(), db.as_deref()).await,
        Command::List { church, limit, db } => {
            cmd_list(church.as_deref(), limit, db.as_deref()).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

async fn cmd_run(url: Option<&str>, db: Option<&str>) -> Result<()> {
    let config = load_config()?;

    let directory_url = url.unwrap_or(&config.defaults.directory_url);
    let directory_url =
        Url::parse(directory_url).map_err(|e| eyre!("invalid URL '{directory_url}': {e}"))?;

    let db_path = expand_home(db.unwrap_or(&config.defaults.db_path));

    let run_config = RunConfig {
        directory_url: directory_url.clone(),
        db_path,
        fetch: FetchConfig::from(&config),
    };

    info!(url = %directory_url, "starting crawl run");

    // Ctrl-C requests cancellation; the in-flight organization finishes first.
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("cancellation requested, finishing current organization...");
                cancel.store(true, Ordering::Relaxed);
            }
        });
    }

    let reporter = CliProgress::new();
    let report = steeplescout_core::pipeline::run(&run_config, &cancel, &reporter).await?;

    // Print summary
    println!();
    if report.cancelled {
        println!("  Run cancelled before completion.");
    } else {
        println!("  Run completed.");
    }
    println!("  Organizations: {}", report.orgs_discovered);
    println!("  Persisted:     {}", report.orgs_persisted);
    println!("  Skipped:       {}", report.orgs_skipped);
    println!("  Failed:        {}", report.orgs_failed);
    println!("  Records:       {}", report.records_written);
    println!("  Time:          {:.1}s", report.elapsed.as_secs_f64());
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn org_started(&self, url: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("[{current}/{total}] {url}"));
    }

    fn org_finished(&self, url: &str, outcome: &OrgOutcome) {
        self.spinner
            .set_message(format!("{url}: {}", outcome.label()));
    }

    fn done(&self, _report: &RunReport) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

async fn cmd_list(church: Option<&str>, limit: u32, db: Option<&str>) -> Result<()> {
    let config = load_config()?;
    let db_path = expand_home(db.unwrap_or(&config.defaults.db_path));

    let storage = Storage::open(&db_path).await?;
    let rows = storage.list_records(church, limit).await?;
    let total = storage.count_records().await?;

    if rows.is_empty() {
        println!("No records found.");
        return Ok(());
    }

    for row in &rows {
        println!(
            "{}\t{}\t{}\t{}",
            row.church_url, row.name, row.degree, row.seminary
        );
    }
    println!();
    println!("{} shown, {} total", rows.len(), total);

    Ok(())
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

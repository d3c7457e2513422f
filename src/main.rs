use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use citation_counts::config::{
    find_config_file, get_config, load_config, AutoRetrieve, Config, Preferences,
};
use citation_counts::models::Item;
use citation_counts::retrieval::{citation_count_column, BatchReport, ItemOutcome};
use citation_counts::ui::{
    self, print_status, ProgressWindow, RecordingProgress, Status, TerminalProgress,
};
use citation_counts::{CitationService, Library};
use serde_json::json;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Citation Counts - Record citation counts from Crossref, INSPIRE-HEP and Semantic Scholar
#[derive(Parser, Debug)]
#[command(name = "citation-counts")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Retrieve citation counts for a library of papers", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Library file path
    #[arg(long, short, global = true)]
    library: Option<PathBuf>,

    /// Preferences file path
    #[arg(long, global = true)]
    preferences: Option<PathBuf>,

    /// Show all environment variables
    #[arg(long, global = true)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
}

impl OutputFormat {
    fn is_json(self) -> bool {
        match self {
            OutputFormat::Json => true,
            OutputFormat::Table => false,
            OutputFormat::Auto => !std::io::stdout().is_terminal(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the available citation APIs
    Apis,

    /// Get citation counts for items in the library
    #[command(alias = "r")]
    Retrieve {
        /// Citation API to query (crossref, inspire, semanticscholar)
        #[arg(long, short)]
        api: String,

        /// Item keys; every item in the library when omitted
        keys: Vec<String>,
    },

    /// Add items from a JSON file to the library
    #[command(alias = "i")]
    Import {
        /// JSON array of items
        file: PathBuf,
    },

    /// Show or set the API used for newly imported items
    Autoretrieve {
        /// API key, or "none" to disable
        api: Option<String>,
    },

    /// List library items with their citation counts
    #[command(alias = "ls")]
    List,
}

/// Print all available environment variables
fn print_env_vars() {
    println!("Citation Counts - Environment Variables");
    println!();
    println!("HTTP:");
    println!("  CITATION_COUNTS_HTTP__USER_AGENT          User agent sent to the APIs");
    println!("  CITATION_COUNTS_HTTP__TIMEOUT_SECS        Request timeout (default: none)");
    println!();
    println!("Progress:");
    println!("  CITATION_COUNTS_PROGRESS__CLOSE_DELAY_MS  Delay before the progress window closes (default: 5000)");
    println!();
    println!("Semantic Scholar:");
    println!("  CITATION_COUNTS_SEMANTIC_SCHOLAR__THROTTLE_MS  Pause after each request (default: 3000)");
    println!();
    println!("Library:");
    println!("  CITATION_COUNTS_LIBRARY__PATH             Library file (default: data dir)");
    println!();
    println!("Other Settings:");
    println!("  RUST_LOG                    Rust logging level (e.g., debug, info, warn, error)");
    std::process::exit(0);
}

fn open_progress(quiet: bool) -> Box<dyn ProgressWindow> {
    if !quiet && ui::is_terminal() {
        Box::new(TerminalProgress::new())
    } else {
        Box::new(RecordingProgress::new())
    }
}

fn report_json(report: &BatchReport) -> serde_json::Value {
    let items: Vec<_> = report
        .items
        .iter()
        .map(|entry| match &entry.outcome {
            ItemOutcome::Succeeded { count, source } => json!({
                "key": entry.key,
                "count": count,
                "source": source,
            }),
            ItemOutcome::Failed { message, .. } => json!({
                "key": entry.key,
                "error": message,
            }),
        })
        .collect();

    json!({
        "api": report.api,
        "succeeded": report.succeeded(),
        "failed": report.failed(),
        "items": items,
    })
}

fn print_report(report: &BatchReport, cli: &Cli) -> Result<()> {
    if cli.output.is_json() {
        println!("{}", serde_json::to_string_pretty(&report_json(report))?);
    } else if !cli.quiet {
        ui::print_report(report);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.env {
        print_env_vars();
    }

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let config: Config = match &config_path {
        Some(path) => load_config(path)?,
        None => get_config()?,
    };

    // Initialize tracing from RUST_LOG, the verbosity flags or the configured level
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| config.logging.filter(cli.verbose, cli.quiet)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let library_path = cli
        .library
        .clone()
        .or_else(|| config.library.path.clone())
        .unwrap_or_else(Library::default_path);
    let prefs_path = cli
        .preferences
        .clone()
        .unwrap_or_else(Preferences::default_path);

    let service = CitationService::from_config(&config)?;

    match &cli.command {
        Some(Commands::Apis) => {
            let prefs = Preferences::load(&prefs_path)?;
            let apis: Vec<_> = service.registry().all().cloned().collect();
            let current = prefs.autoretrieve_api(service.registry()).map(|a| a.key().to_string());

            if cli.output.is_json() {
                let listing: Vec<_> = apis
                    .iter()
                    .map(|api| {
                        json!({
                            "key": api.key(),
                            "name": api.name(),
                            "doi": api.uses_doi(),
                            "arxiv": api.uses_arxiv(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                ui::print_apis(&apis, current.as_deref());
            }
        }

        Some(Commands::Retrieve { api, keys }) => {
            let mut library = Library::open(&library_path)
                .with_context(|| format!("opening library {}", library_path.display()))?;
            let items = library.select(keys)?;

            let mut progress = open_progress(cli.quiet);
            let report = service
                .update_items(items, api, &mut library, progress.as_mut())
                .await?;

            print_report(&report, &cli)?;
        }

        Some(Commands::Import { file }) => {
            let content = std::fs::read_to_string(file)
                .with_context(|| format!("reading {}", file.display()))?;
            let items: Vec<Item> = serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", file.display()))?;

            let mut library = Library::open(&library_path)?;
            library.add_items(&items)?;
            if !cli.quiet {
                print_status(
                    Status::Success,
                    &format!("Imported {} items into {}", items.len(), library_path.display()),
                );
            }

            let prefs = Preferences::load(&prefs_path)?;
            let mut progress = open_progress(cli.quiet);
            if let Some(report) = service
                .on_items_added(items, &prefs, &mut library, progress.as_mut())
                .await
            {
                print_report(&report, &cli)?;
            }
        }

        Some(Commands::Autoretrieve { api }) => {
            let mut prefs = Preferences::load(&prefs_path)?;

            if let Some(value) = api {
                let choice = AutoRetrieve::from(value.clone());
                if let AutoRetrieve::Api(key) = &choice {
                    service.registry().get_required(key)?;
                }
                prefs.autoretrieve = choice;
                prefs.save(&prefs_path)?;
            }

            let current = match prefs.autoretrieve_api(service.registry()) {
                Some(api) => service.localization().format_value(
                    "citationcounts-menutools-autoretrieve-api",
                    Some(api.name()),
                ),
                None => service
                    .localization()
                    .format_value("citationcounts-menutools-autoretrieve-api-none", None),
            };
            print_status(Status::Info, &current);
        }

        Some(Commands::List) => {
            let library = Library::open(&library_path)?;

            if cli.output.is_json() {
                let listing: Vec<_> = library
                    .items()
                    .iter()
                    .map(|item| {
                        json!({
                            "key": item.key,
                            "title": item.title,
                            "citations": citation_count_column(&item.extra),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                let title = service
                    .localization()
                    .format_value("citationcounts-column-title", None);
                ui::print_items(library.items(), &title);
            }
        }

        None => {
            print_status(
                Status::Info,
                "No command given. Run `citation-counts --help` for usage.",
            );
        }
    }

    Ok(())
}

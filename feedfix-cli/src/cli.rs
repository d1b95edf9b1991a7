use std::io::Write;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use feedfix::ValidationResult;
use feedfix::output::{ReportOptions, write_human, write_json};

use crate::config::{DEFAULT_FETCH_TIMEOUT_SECS, FetchConfig, ServerConfig};
use crate::fetch::FeedFetcher;
use crate::logging::init_tracing;
use crate::pipeline::{FeedSource, load_and_validate};
use crate::server::run_server;

/// Google Shopping product feed quality validator
#[derive(Parser, Debug)]
#[command(name = "feedfix")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v info logs and request summaries, -vv debug logs and bodies)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a feed from a local file or an http(s) URL
    Check(CheckArgs),
    /// Run the HTTP validation API
    Serve(ServeArgs),
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Path to a feed file, or an http(s) URL
    pub source: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Exit with an error when the score is below this value
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub min_score: Option<u8>,

    /// Number of critical errors listed in the human report
    #[arg(long, default_value_t = 30)]
    pub max_critical: usize,

    /// Download timeout in seconds
    #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub timeout: u64,
}

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "FEEDFIX_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "FEEDFIX_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Download timeout in seconds for URL validation
    #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub timeout: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Parse arguments and run the selected command.
///
/// # Errors
///
/// Returns an error if the feed cannot be loaded, the score is below
/// `--min-score`, or the server fails.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Check(args) => check(&args).await,
        Commands::Serve(args) => {
            let mut config = ServerConfig::default();
            config.host = args.host;
            config.port = args.port;
            config.verbose = cli.verbose;
            config.fetch = FetchConfig::default().with_timeout(Duration::from_secs(args.timeout));
            run_server(&config).await
        }
    }
}

async fn check(args: &CheckArgs) -> Result<()> {
    let fetch_config = FetchConfig::default().with_timeout(Duration::from_secs(args.timeout));
    let fetcher = FeedFetcher::new(&fetch_config)?;
    let source = FeedSource::from_arg(&args.source);

    let result = load_and_validate(&source, &fetcher, fetch_config.max_bytes).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Json => write_json(&result, &mut out)?,
        OutputFormat::Human => {
            let options = ReportOptions::default()
                .with_max_critical(args.max_critical)
                .with_generated_at(chrono::Local::now());
            write_human(&result, &options, &mut out)?;
            writeln!(out, "{}", verdict(&result))?;
        }
    }
    out.flush()?;

    if let Some(min_score) = args.min_score
        && result.score < min_score
    {
        bail!(
            "feed score {} is below the required minimum of {min_score}",
            result.score
        );
    }
    Ok(())
}

fn verdict(result: &ValidationResult) -> String {
    let line = format!(
        "Score {}/100 across {} product(s): {} critical, {} warning(s)",
        result.score, result.products_checked, result.total_critical, result.total_warnings
    );
    match result.score {
        90..=100 => format!("\u{2713} {line}").green().to_string(),
        60..=89 => format!("! {line}").yellow().to_string(),
        _ => format!("\u{2717} {line}").red().to_string(),
    }
}

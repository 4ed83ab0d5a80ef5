use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use textscout::{run, CliOverrides, RunSummary, SearchConfig, SearchProgress, SearchReport};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Search for a regex pattern in files within a directory.
#[derive(Parser, Debug)]
#[command(name = "textscout", author, version, about, long_about = None)]
struct Cli {
    /// The path to the search directory
    directory: PathBuf,

    /// The search regex pattern
    regex: String,

    /// An optional regex pattern to exclude file names
    #[arg(long)]
    exclude: Option<String>,

    /// Encoding to try when decoding files, in order (repeatable)
    #[arg(short = 'e', long = "encoding")]
    encodings: Vec<String>,

    /// Configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Hide per-file progress
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            root_path: Some(self.directory.clone()),
            pattern: Some(self.regex.clone()),
            exclude_pattern: self.exclude.clone(),
            encodings: (!self.encodings.is_empty()).then(|| self.encodings.clone()),
            log_level: self.log_level.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // The directory check comes first so nothing else runs for a bad root
    if !cli.directory.is_dir() {
        eprintln!(
            "Error: The specified path '{}' is not a valid directory.",
            cli.directory.display()
        );
        return ExitCode::FAILURE;
    }

    match run_cli(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run_cli(cli: &Cli) -> Result<()> {
    let config = SearchConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?
        .merge_with_cli(cli.overrides());

    init_tracing(&config.log_level);
    info!(
        directory = %config.root_path.display(),
        regex = %config.pattern,
        exclude = ?config.exclude_pattern,
        encodings = ?config.encodings,
        "Parsed arguments"
    );

    let progress = progress_bar(cli.quiet);
    let started = Instant::now();

    let summary = run(&config, |event| {
        progress.set_message(format_progress(&event));
        progress.inc(1);
    });
    progress.finish_and_clear();
    let summary = summary?;

    let elapsed = humantime::format_duration(round_to_millis(started.elapsed()));
    debug!("Run finished in {}", elapsed);
    println!("{} (in {})", status_line(&summary), elapsed);
    Ok(())
}

fn init_tracing(log_level: &str) {
    // RUST_LOG wins over the configured level
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn progress_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner} [{pos} files] {wide_msg}")
    {
        progress.set_style(style);
    }
    progress
}

fn format_progress(event: &SearchProgress<'_>) -> String {
    let detail = match event {
        SearchProgress::Loaded { matches, .. } => format!("{} matches", matches),
        SearchProgress::Failed { reason, .. } => reason.to_string(),
    };
    format!("Processing file: {} ({})", event.path().display(), detail)
}

fn round_to_millis(elapsed: Duration) -> Duration {
    Duration::from_millis(elapsed.as_millis() as u64)
}

fn status_line(summary: &RunSummary) -> String {
    match summary {
        RunSummary::Empty => "No matches found.".yellow().to_string(),
        RunSummary::Written { path, report } if report.results.is_empty() => format!(
            "No matches found, {} file(s) could not be read. Report written to {}",
            report.error_count().to_string().red(),
            path.display().to_string().blue()
        ),
        RunSummary::Written { path, report } => format!(
            "Found {} matches in {} files{}. Report written to {}",
            report.total_matches().to_string().green(),
            report.files_with_matches().to_string().green(),
            error_suffix(report),
            path.display().to_string().blue()
        ),
    }
}

fn error_suffix(report: &SearchReport) -> String {
    match report.error_count() {
        0 => String::new(),
        n => format!(", {} file(s) could not be read", n.to_string().red()),
    }
}

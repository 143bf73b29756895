//! Photo Organizer - CLI entry point
//!
//! Parses the three directory arguments, sets up logging, runs the
//! organizer over the source tree, and prints a styled summary.

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use photo_organizer::{Cli, FileOutcome, Organizer};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{Level, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// CLI Output Module
mod cli_output {
    //! Styling helpers for the run summary.

    use crossterm::{
        ExecutableCommand,
        style::{Color, Print, Stylize, style},
    };
    use std::io::stdout;

    /// CLI theme colors
    pub struct CliTheme;

    impl CliTheme {
        pub const SUCCESS: Color = Color::Green;
        pub const WARNING: Color = Color::Yellow;
        pub const ERROR: Color = Color::Red;
        pub const HINT: Color = Color::DarkGrey;
        pub const ACCENT: Color = Color::Cyan;
    }

    pub fn print_separator() {
        let _ = stdout().execute(Print(&format!("{}\n", "─".repeat(60))));
    }

    pub fn print_stat(key: &str, value: &str, color: Color) {
        let key_styled = style(key).with(CliTheme::HINT);
        let value_styled = style(value).with(color).bold();
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(key_styled));
        let _ = stdout().execute(Print(": "));
        let _ = stdout().execute(Print(value_styled));
        let _ = stdout().execute(Print("\n"));
    }

    pub fn print_result(status_icon: &str, status_color: Color, source: &str, msg: &str) {
        let icon_styled = style(status_icon).with(status_color).bold();
        let source_styled = style(source).italic();
        let msg_styled = style(msg).with(CliTheme::HINT);

        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(icon_styled));
        let _ = stdout().execute(Print(" "));
        let _ = stdout().execute(Print(source_styled));
        let _ = stdout().execute(Print(" "));
        let _ = stdout().execute(Print(msg_styled));
        let _ = stdout().execute(Print("\n"));
    }

    pub fn print_blank() {
        let _ = stdout().execute(Print("\n"));
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = get_log_path()?;
    let _guard = setup_logging(&cli, &log_path)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Photo Organizer starting"
    );
    info!(log_file = %log_path.display(), "Log file location");

    let (destination, unprocessed) = prepare_directories(&cli)?;

    let mut organizer = Organizer::new(destination, unprocessed);
    match organizer.run(&cli.source) {
        Ok(reports) => {
            use cli_output::*;

            print_separator();

            let stats = organizer.stats();
            print_blank();
            print_stat("Relocated", &stats.relocated.to_string(), CliTheme::SUCCESS);
            print_stat("Duplicates", &stats.duplicates.to_string(), CliTheme::ACCENT);
            print_stat(
                "Quarantined",
                &stats.quarantined.to_string(),
                CliTheme::WARNING,
            );
            print_stat("Failed", &stats.failed.to_string(), CliTheme::ERROR);
            print_blank();

            if cli.verbose {
                for report in &reports {
                    let source = report.source.display().to_string();
                    match &report.outcome {
                        FileOutcome::Relocated { destination } => {
                            print_result(
                                "✓",
                                CliTheme::SUCCESS,
                                &source,
                                &format!("→ {}", destination.display()),
                            );
                        }
                        FileOutcome::DuplicateDiscarded { existing } => {
                            print_result(
                                "≡",
                                CliTheme::ACCENT,
                                &source,
                                &format!("duplicate of {}", existing.display()),
                            );
                        }
                        FileOutcome::Quarantined {
                            destination,
                            reason,
                        } => {
                            print_result(
                                "⊘",
                                CliTheme::WARNING,
                                &source,
                                &format!("{} → {}", reason, destination.display()),
                            );
                        }
                        FileOutcome::Failed { error } => {
                            print_result("✗", CliTheme::ERROR, &source, error);
                        }
                    }
                }
                print_blank();
            }

            // Failures always get listed, verbose or not
            let failures: Vec<_> = reports
                .iter()
                .filter(|r| matches!(r.outcome, FileOutcome::Failed { .. }))
                .collect();
            if !failures.is_empty() && !cli.verbose {
                print_separator();
                for report in failures {
                    if let FileOutcome::Failed { error } = &report.outcome {
                        print_result(
                            "✗",
                            CliTheme::ERROR,
                            &report.source.display().to_string(),
                            error,
                        );
                    }
                }
                print_blank();
            }

            print_separator();
            info!(log_file = %log_path.display(), "Processing complete");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Processing failed");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Create destination and quarantine roots if absent; source must already
/// exist
fn prepare_directories(cli: &Cli) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(&cli.destination)?;
    fs::create_dir_all(&cli.unprocessed)?;

    let destination = fs::canonicalize(&cli.destination)?;
    let unprocessed = fs::canonicalize(&cli.unprocessed)?;

    if !cli.source.is_dir() {
        anyhow::bail!("Source directory {} does not exist", cli.source.display());
    }

    Ok((destination, unprocessed))
}

/// Determine the timestamped log file path under Log/ next to the
/// executable
fn get_log_path() -> Result<PathBuf> {
    let exe_path = std::env::current_exe()?;
    let exe_dir = exe_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    Ok(exe_dir.join("Log").join(format!("Run_{}.log", timestamp)))
}

/// Setup logging (file + console)
fn setup_logging(cli: &Cli, log_path: &Path) -> Result<Option<WorkerGuard>> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if cli.json_log {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(Some(guard))
}

//! CLI for the Unfuddle to GitHub migrator.
//!
//! This tool reads an Unfuddle backup and recreates its milestones, tickets,
//! comments and attachments in a GitHub repository.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use unfuddle_migrator::{RunSummary, Runner, RunnerConfig, RunnerError};

/// Unfuddle Migrator - Import an Unfuddle backup into GitHub issues.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the Unfuddle backup directory that contains backup.xml.
    #[arg(long)]
    backup: PathBuf,

    /// Path to the migrator config file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// GitHub Personal Access Token (overrides the config file).
    #[arg(long, env = "GITHUB_TOKEN")]
    token: Option<String>,

    /// Operate in debug mode: compose everything but make no remote requests.
    #[arg(short = 'd', long)]
    dry_run: bool,

    /// Maximum concurrent uploads per ticket or comment.
    #[arg(long, default_value_t = 5)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    // octocrab and reqwest both pull in rustls; pick one provider process-wide.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    // Initialize tracing
    init_tracing();

    // Parse arguments
    let args = Args::parse();

    // Run the main logic
    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::from(0)
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let config = RunnerConfig::new(args.backup, args.dry_run)
        .with_config_path(args.config)
        .with_token(args.token)
        .with_concurrency(args.concurrency);
    let runner = Runner::new(config)?;
    runner.run().await
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!("  Milestones deleted: {}", summary.milestones_deleted);
    println!("  Milestones created: {}", summary.milestones_created);
    println!("  Issues created: {}", summary.issues_created);
    println!("  Issues closed: {}", summary.issues_closed);
    println!("  Comments created: {}", summary.comments_created);
    println!("  Attachments uploaded: {}", summary.attachments_uploaded);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_falls_back_to_github_token_env() {
        temp_env::with_var("GITHUB_TOKEN", Some("from-env"), || {
            let args = Args::try_parse_from(["unfuddle-migrator", "--backup", "dump"]).unwrap();
            assert_eq!(args.token.as_deref(), Some("from-env"));
        });
    }

    #[test]
    fn token_flag_overrides_env() {
        temp_env::with_var("GITHUB_TOKEN", Some("from-env"), || {
            let args = Args::try_parse_from([
                "unfuddle-migrator",
                "--backup",
                "dump",
                "--token",
                "from-flag",
            ])
            .unwrap();
            assert_eq!(args.token.as_deref(), Some("from-flag"));
        });
    }

    #[test]
    fn defaults_without_token() {
        temp_env::with_var_unset("GITHUB_TOKEN", || {
            let args = Args::try_parse_from(["unfuddle-migrator", "--backup", "dump", "-d"]).unwrap();
            assert_eq!(args.token, None);
            assert!(args.dry_run);
            assert_eq!(args.concurrency, 5);
            assert_eq!(args.config, PathBuf::from("config.toml"));
        });
    }
}

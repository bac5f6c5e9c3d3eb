//! railsbp CLI tool.
//!
//! Usage:
//! ```bash
//! railsbp check [OPTIONS] [PATH]
//! railsbp list-checks
//! railsbp init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;
mod discover;
mod ripper;

/// Code reviewer for Rails applications
#[derive(Parser)]
#[command(name = "railsbp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Review a Rails application
    Check {
        /// Application root (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific checks (comma-separated)
        #[arg(long)]
        checks: Option<String>,

        /// Exclusion regexes (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Ruby interpreter used to parse sources
        #[arg(long, env = "RAILSBP_RUBY", default_value = "ruby")]
        ruby: PathBuf,
    },

    /// List available checks
    ListChecks,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for review results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One line per diagnostic.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            format,
            checks,
            exclude,
            ruby,
        } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            let options = commands::check::CheckOptions {
                format,
                checks,
                exclude,
                ruby,
            };
            commands::check::run(&path, &options, &source)
        }
        Commands::ListChecks => {
            commands::list_checks::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}

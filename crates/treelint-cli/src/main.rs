//! treelint CLI tool.
//!
//! Usage:
//! ```bash
//! treelint check [OPTIONS] [PATH]
//! treelint list-rules
//! treelint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Runs lint rules over ESTree syntax trees serialized as JSON
#[derive(Parser)]
#[command(name = "treelint")]
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
    /// Check every tree file under a directory
    Check {
        /// Directory to scan (default: `[runner] root`, else current directory)
        path: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated)
        #[arg(long)]
        rules: Option<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Suffix of tree files (default: .ast.json)
        #[arg(long)]
        suffix: Option<String>,

        /// Skip malformed tree files instead of failing
        #[arg(long)]
        keep_going: bool,
    },

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for batch results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output: `{"results": [...]}`.
    Json,
    /// One-line-per-finding compact format.
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
            rules,
            exclude,
            suffix,
            keep_going,
        } => {
            let scan_root = path.clone().unwrap_or_else(|| PathBuf::from("."));
            let config = config_resolver::load(&scan_root, cli.config.as_deref())?;

            let options = commands::check::CheckOptions {
                path,
                format,
                rules,
                exclude,
                suffix,
                keep_going,
            };

            if commands::check::run(options, config)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}

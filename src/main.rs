//! sbom-score: SBOM quality and compliance scoring tool
//!
//! Scores `CycloneDX` and SPDX documents against weighted quality categories
//! or regulatory profiles.

use anyhow::Result;
use clap::{Parser, Subcommand};
use sbom_score::cli::{self, exit_codes, GenerateKind, ListKind, OutputFormat, ScoreArgs};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with format support info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nSupported SBOM Formats:",
        "\n  CycloneDX: 1.0 - 1.6 (JSON)",
        "\n  SPDX:      2.1 - 2.3 (JSON, YAML, tag-value)",
        "\n\nProfiles:",
        "\n  ntia, bsi-v1.1, bsi-v2.0, oct, fsct"
    )
}

#[derive(Parser)]
#[command(name = "sbom-score")]
#[command(version, long_version = build_long_version())]
#[command(about = "SBOM quality and compliance scoring", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  A document scored below --min-score
    3  Error occurred

EXAMPLES:
    # Score one document against every category
    sbom-score score app.cdx.json

    # Only licensing and provenance, as JSON
    sbom-score score app.cdx.json --category licensing,provenance -o json

    # NTIA minimum elements for a whole directory
    sbom-score score ./sboms --profile ntia")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to scoring config file
    #[arg(long, global = true, env = "SBOM_SCORE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `score` subcommand
#[derive(Parser)]
struct ScoreCommand {
    /// SBOM files, directories or URLs
    #[arg(required = true)]
    paths: Vec<String>,

    /// Categories to score (names or aliases)
    #[arg(short, long = "category", value_delimiter = ',')]
    categories: Vec<String>,

    /// Features to score (keys or aliases)
    #[arg(short, long = "feature", value_delimiter = ',')]
    features: Vec<String>,

    /// Compliance profiles to score against
    #[arg(short, long = "profile", value_delimiter = ',')]
    profiles: Vec<String>,

    /// Detached signature of the SBOM
    #[arg(long = "sig", requires = "public_key")]
    sig_value: Option<PathBuf>,

    /// Public key for the signature
    #[arg(long = "pubkey", requires = "sig_value")]
    public_key: Option<PathBuf>,

    /// Timeout for remote fetches, in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Abort the whole run after this many seconds
    #[arg(long)]
    deadline: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Only print the overall score line per document
    #[arg(long)]
    basic: bool,

    /// Exit with code 1 if any document scores below this (0-10)
    #[arg(long)]
    min_score: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score SBOMs for quality or compliance
    Score(ScoreCommand),

    /// Generate a config file or its JSON schema
    Generate {
        /// What to generate
        #[arg(value_enum, default_value_t = GenerateKind::Features)]
        kind: GenerateKind,

        /// Write to file instead of stdout
        #[arg(short = 'O', long)]
        output_file: Option<PathBuf>,
    },

    /// List built-in categories, features or profiles
    List {
        /// What to list
        #[arg(value_enum, default_value_t = ListKind::Categories)]
        kind: ListKind,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Score(args) => {
            let exit_code = cli::run_score(ScoreArgs {
                paths: args.paths,
                categories: args.categories,
                features: args.features,
                profiles: args.profiles,
                config_file: cli.config,
                sig_value: args.sig_value,
                public_key: args.public_key,
                timeout: Some(Duration::from_secs(args.timeout)),
                deadline: args.deadline.map(Duration::from_secs),
                output: args.output,
                output_file: args.output_file,
                basic: args.basic,
                min_score: args.min_score,
            })
            .inspect_err(|e| tracing::error!("{e:#}"));
            match exit_code {
                Ok(exit_codes::SUCCESS) => Ok(()),
                Ok(code) => std::process::exit(code),
                Err(_) => std::process::exit(exit_codes::ERROR),
            }
        }

        Commands::Generate { kind, output_file } => cli::run_generate(kind, output_file),

        Commands::List { kind } => cli::run_list(kind),
    }
}

//! Score command handler.
//!
//! Implements the `score` subcommand: resolves the config, runs the engine
//! over every input and renders the results.

use super::{exit_codes, write_output, OutputFormat, OutputTarget};
use crate::config::{discover_config_file, Config};
use crate::engine::{Breakdown, CancelToken, Engine, ScoreResult};
use anyhow::{Context, Result};
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;

/// Score command configuration
#[derive(Debug, Clone, Default)]
pub struct ScoreArgs {
    pub paths: Vec<String>,
    pub categories: Vec<String>,
    pub features: Vec<String>,
    pub profiles: Vec<String>,
    pub config_file: Option<PathBuf>,
    pub sig_value: Option<PathBuf>,
    pub public_key: Option<PathBuf>,
    pub timeout: Option<Duration>,
    pub deadline: Option<Duration>,
    pub output: OutputFormat,
    pub output_file: Option<PathBuf>,
    pub basic: bool,
    pub min_score: Option<f64>,
}

/// Run the score command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
pub fn run_score(args: ScoreArgs) -> Result<i32> {
    let mut builder = Config::builder()
        .categories(args.categories)
        .features(args.features)
        .profiles(args.profiles)
        .config_file(discover_config_file(args.config_file.as_deref()));
    if let Some(timeout) = args.timeout {
        builder = builder.fetch_timeout(timeout);
    }
    match (args.sig_value, args.public_key) {
        (Some(sig), Some(key)) => builder = builder.signature_bundle(sig, key),
        (None, None) => {}
        _ => anyhow::bail!("--sig and --pubkey must be given together"),
    }
    let config = builder.build();

    if let Some(path) = &config.config_file {
        tracing::info!("Using config file {}", path.display());
    }

    let engine = Engine::standard().context("built-in catalog is invalid")?;
    let cancel = interruptible_token(args.deadline);
    let results = engine
        .score_paths(&config, &args.paths, &cancel)
        .context("scoring failed")?;

    let text = match args.output {
        OutputFormat::Json => format_json(&results)?,
        OutputFormat::Table => format_table(&results, args.basic),
    };
    write_output(&text, &OutputTarget::from_option(args.output_file))?;

    if let Some(threshold) = args.min_score {
        if let Some(low) = results.iter().find(|r| r.interlynk_score < threshold) {
            tracing::error!(
                "{} scored {:.1}, below the minimum of {:.1}",
                low.filename,
                low.interlynk_score,
                threshold
            );
            return Ok(exit_codes::BELOW_THRESHOLD);
        }
    }

    Ok(exit_codes::SUCCESS)
}

/// Render results as a JSON report
pub fn format_json(results: &[ScoreResult]) -> Result<String> {
    let output = json!({
        "tool": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "files": results,
    });
    serde_json::to_string_pretty(&output).context("failed to serialize results")
}

/// Render results as a compact text table
#[must_use]
pub fn format_table(results: &[ScoreResult], basic: bool) -> String {
    let mut lines = Vec::new();

    for result in results {
        lines.push(format!(
            "{:.1}\t{}\t{} {}\t{}\t{} components\t{}",
            result.interlynk_score,
            result.grade,
            result.spec,
            result.spec_version,
            result.file_format,
            result.num_components,
            result.filename
        ));
        if basic {
            continue;
        }

        match &result.breakdown {
            Breakdown::Categories(categories) => {
                for category in categories {
                    lines.push(format!(
                        "  {:<16}{:>5.1}  (weight {})",
                        category.name, category.score, category.weight
                    ));
                    for feature in &category.features {
                        let score = if feature.ignored {
                            "N/A".to_string()
                        } else {
                            format!("{:.1}", feature.score)
                        };
                        lines.push(format!(
                            "    {:<32}{:>5}  {}",
                            feature.key, score, feature.description
                        ));
                    }
                }
            }
            Breakdown::Profiles(profiles) => {
                for profile in profiles {
                    lines.push(format!(
                        "  {:<40}{:>5.1}  {}  required {}/{}  optional {}/{}",
                        profile.name,
                        profile.score,
                        profile.grade,
                        profile.required_compliant,
                        profile.required_total,
                        profile.optional_present,
                        profile.optional_total
                    ));
                    for item in &profile.items {
                        let mark = if item.is_compliant() { "ok" } else { "--" };
                        let tag = if item.required { "required" } else { "optional" };
                        lines.push(format!(
                            "    [{mark}] {:<28}{:>5.1}  {tag}  {}",
                            item.key, item.score, item.description
                        ));
                    }
                }
            }
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Cancellation token for a CLI run: fires on Ctrl-C and, when given, once
/// `deadline` has elapsed.
fn interruptible_token(deadline: Option<Duration>) -> CancelToken {
    let cancel = deadline.map_or_else(CancelToken::new, CancelToken::with_timeout);
    let handle = cancel.clone();
    // Only one handler per process; later runs keep the deadline alone
    if let Err(e) = ctrlc::set_handler(move || handle.cancel()) {
        tracing::debug!("Ctrl-C handler not installed: {e}");
    }
    cancel
}

//! Check command implementation.

use anyhow::{Context, Result};
use std::path::PathBuf;
use treelint_core::{BatchRunner, Config, RuleBox};
use treelint_rules::{rule_by_name, rules_from_config};

use crate::OutputFormat;

/// Options for the check command that override configuration.
#[derive(Debug, Default)]
pub struct CheckOptions {
    /// Directory to scan; falls back to `[runner] root`.
    pub path: Option<PathBuf>,
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule names replacing the configured set.
    pub rules: Option<String>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
    /// Tree-file suffix.
    pub suffix: Option<String>,
    /// Skip malformed tree files.
    pub keep_going: bool,
}

/// Runs the check command.
///
/// Returns `true` if any finding was produced.
pub fn run(options: CheckOptions, config: Config) -> Result<bool> {
    let rules = match options.rules.as_deref() {
        Some(filter) => {
            let names: Vec<&str> = filter
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            filter_rules(&names, &config)
        }
        None => rules_from_config(&config),
    };

    let mut builder = BatchRunner::builder()
        .config(config)
        .rules(rules)
        .excludes(options.exclude);

    if let Some(path) = options.path {
        builder = builder.root(path);
    }
    if let Some(suffix) = options.suffix {
        builder = builder.suffix(suffix);
    }
    if options.keep_going {
        builder = builder.keep_going(true);
    }

    let runner = builder.build().context("Failed to build batch runner")?;

    tracing::info!(
        "Checking {} with {} rules",
        runner.root().display(),
        runner.rule_count()
    );

    let report = runner.run().context("Batch run failed")?;

    super::output::print(&report, options.format)?;

    Ok(report.has_findings())
}

fn filter_rules(names: &[&str], config: &Config) -> Vec<RuleBox> {
    let mut rules = Vec::new();

    for name in names {
        match rule_by_name(name, config.rule(name)) {
            Some(rule) => rules.push(rule),
            None => tracing::warn!("Unknown rule: {}", name),
        }
    }

    rules
}

//! Check command implementation.

use anyhow::{Context, Result};
use railsbp_core::{Analyzer, Config};
use railsbp_rules::CheckSet;
use std::path::{Path, PathBuf};

use crate::config_resolver::ConfigSource;
use crate::discover::discover_files;
use crate::ripper::RipperParser;
use crate::OutputFormat;

/// Options of the check command.
#[derive(Debug)]
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated check names, or all enabled checks.
    pub checks: Option<String>,
    /// Extra exclusion regexes.
    pub exclude: Vec<String>,
    /// Ruby interpreter.
    pub ruby: PathBuf,
}

/// Builds the configured checks, keeping only `filter` when given.
pub fn select_checks(config: &Config, filter: Option<&str>) -> Result<CheckSet> {
    let checks = CheckSet::from_config(config).context("Invalid ignored_files pattern")?;
    let Some(filter) = filter else {
        return Ok(checks);
    };
    let names: Vec<String> = filter
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect();
    let checks = checks.only(&names);
    if checks.reporting_len() < names.len() {
        tracing::warn!("Some of the requested checks are unknown or disabled: {filter}");
    }
    Ok(checks)
}

/// Runs the check command.
pub fn run(path: &Path, options: &CheckOptions, source: &ConfigSource) -> Result<()> {
    let config = source.load()?;
    let checks = select_checks(&config, options.checks.as_deref())?;

    let builder = Analyzer::builder()
        .config(config)
        .excludes(options.exclude.iter().cloned());
    let analyzer = checks
        .install(builder)
        .build()
        .context("Failed to build analyzer")?;

    let files = discover_files(path)
        .with_context(|| format!("Failed to read application at {}", path.display()))?;

    tracing::info!(
        "Reviewing {} with {} checks",
        path.display(),
        analyzer.check_count()
    );

    let parser = RipperParser::new(options.ruby.clone());
    let result = analyzer.analyze(&files, &parser).context("Analysis failed")?;

    super::output::print(&result, options.format)?;

    if result.has_diagnostics() {
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_keeps_named_checks() {
        let checks = select_checks(&Config::default(), Some("LongLineCheck, LawOfDemeterCheck")).unwrap();
        assert_eq!(checks.reporting_len(), 2);

        let all = select_checks(&Config::default(), None).unwrap();
        assert_eq!(all.reporting_len(), 11);
    }
}

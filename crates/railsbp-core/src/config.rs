//! Configuration types for railsbp.

use crate::patterns::{FilePattern, PatternError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Directories skipped unless re-enabled through `include_dirs`.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["vendor", "spec", "test", "stories", "features", "tmp"];

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Per-check configurations, keyed by check name.
    #[serde(default)]
    pub checks: HashMap<String, CheckConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Looks up a check's configuration. `XCheck` and `XReview` share an entry.
    #[must_use]
    pub fn check(&self, name: &str) -> Option<&CheckConfig> {
        let wanted = crate::suppress::normalize_check_name(name);
        self.checks.get(name).or_else(|| {
            self.checks
                .iter()
                .find(|(key, _)| crate::suppress::normalize_check_name(key) == wanted)
                .map(|(_, config)| config)
        })
    }

    /// Checks if a check is enabled.
    #[must_use]
    pub fn is_check_enabled(&self, name: &str) -> bool {
        self.check(name).map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Options of a check, or defaults.
    #[must_use]
    pub fn check_options(&self, name: &str) -> CheckConfig {
        self.check(name).cloned().unwrap_or_default()
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Extra exclusion regexes.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// When non-empty, only files matching one of these regexes are analyzed.
    #[serde(default)]
    pub only: Vec<String>,

    /// Default-excluded directories to analyze anyway (e.g. `spec`).
    #[serde(default)]
    pub include_dirs: Vec<String>,

    /// Dispatch migrations twice during the prepare phase.
    #[serde(default)]
    pub revisit_migrations: bool,

    /// Abort instead of skipping files the parser rejects.
    #[serde(default)]
    pub fail_on_parse_error: bool,
}

impl AnalyzerConfig {
    /// Directories excluded after applying `include_dirs`.
    #[must_use]
    pub fn excluded_dirs(&self) -> Vec<&'static str> {
        DEFAULT_EXCLUDED_DIRS
            .iter()
            .copied()
            .filter(|dir| !self.include_dirs.iter().any(|d| d == dir))
            .collect()
    }
}

/// Per-check configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Whether this check is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Regexes of files this check skips.
    #[serde(default)]
    pub ignored_files: Vec<String>,

    /// Check-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl CheckConfig {
    /// Gets an option value as a specific type.
    #[must_use]
    pub fn get_option<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.options
            .get(key)
            .and_then(|v| v.clone().try_into().ok())
    }

    /// Gets a boolean option with a default value.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.options
            .get(key)
            .and_then(toml::Value::as_bool)
            .unwrap_or(default)
    }

    /// Gets an integer option with a default value.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.options
            .get(key)
            .and_then(toml::Value::as_integer)
            .unwrap_or(default)
    }

    /// Gets a count option; negative values fall back to the default.
    #[must_use]
    pub fn get_usize(&self, key: &str, default: usize) -> usize {
        self.options
            .get(key)
            .and_then(toml::Value::as_integer)
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(default)
    }

    /// Gets a string array option.
    #[must_use]
    pub fn get_str_array(&self, key: &str) -> Vec<String> {
        self.options
            .get(key)
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Compiles `ignored_files` into patterns.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid regex.
    pub fn ignored_patterns(&self) -> Result<Vec<FilePattern>, PatternError> {
        self.ignored_files
            .iter()
            .map(|p| FilePattern::regex(p))
            .collect()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.analyzer.revisit_migrations);
        assert!(config.checks.is_empty());
        assert_eq!(config.analyzer.excluded_dirs(), DEFAULT_EXCLUDED_DIRS);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[analyzer]
exclude = ["lib/legacy"]
include_dirs = ["spec"]

[checks.MoveModelLogicIntoModelCheck]
use_count = 6
ignored_files = ["admin/"]

[checks.LongLineCheck]
enabled = false
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.analyzer.exclude, vec!["lib/legacy"]);
        assert!(!config.analyzer.excluded_dirs().contains(&"spec"));
        assert!(!config.is_check_enabled("LongLineCheck"));
        assert!(config.is_check_enabled("RemoveTabCheck"));

        let check = config.check("MoveModelLogicIntoModelReview").unwrap();
        assert_eq!(check.get_int("use_count", 4), 6);
        assert_eq!(check.get_usize("use_count", 4), 6);
        assert_eq!(check.ignored_patterns().unwrap().len(), 1);
        assert!(!check.options.contains_key("ignored_files"));
    }

    #[test]
    fn test_option_defaults() {
        let check = CheckConfig::default();
        assert!(check.get_bool("missing", true));
        assert_eq!(check.get_usize("missing", 3), 3);
        assert!(check.get_str_array("except_methods").is_empty());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::parse("[analyzer"),
            Err(ConfigError::Parse { .. })
        ));
    }
}

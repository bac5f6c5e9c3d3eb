//! Locating and loading `railsbp.toml`.
//!
//! The first match wins:
//!
//! 1. `--config FILE`
//! 2. `railsbp.toml`, then `.railsbp.toml`, in the application root
//! 3. `config.toml` in the user directory (`$RAILSBP_CONFIG_DIR`, else `~/.railsbp/`)
//!
//! With none of them the built-in defaults apply.

use anyhow::{Context, Result};
use railsbp_core::Config;
use std::path::{Path, PathBuf};

/// File names looked up in the application root.
const APP_CONFIG_NAMES: &[&str] = &["railsbp.toml", ".railsbp.toml"];

/// File name inside the user directory.
const USER_CONFIG_NAME: &str = "config.toml";

/// Environment variable overriding the user directory.
const CONFIG_DIR_ENV: &str = "RAILSBP_CONFIG_DIR";

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given on the command line; not checked for existence.
    Explicit(PathBuf),
    /// Found in the application root.
    Application(PathBuf),
    /// Found in the user directory.
    User(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// The file to read, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Application(p) | Self::User(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Reads the configuration, or returns the defaults for [`ConfigSource::Default`].
    ///
    /// # Errors
    ///
    /// Returns an error naming the file when it cannot be read or parsed.
    pub fn load(&self) -> Result<Config> {
        let Some(path) = self.path() else {
            return Ok(Config::default());
        };
        if matches!(self, Self::User(_)) {
            tracing::info!("Using user config: {}", path.display());
        }
        Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
    }
}

/// Resolves the configuration for the application at `app_root`.
#[must_use]
pub fn resolve(app_root: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_with(app_root, explicit, user_config_dir().as_deref())
}

fn resolve_with(app_root: &Path, explicit: Option<&Path>, user_dir: Option<&Path>) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }

    if let Some(found) = APP_CONFIG_NAMES
        .iter()
        .map(|name| app_root.join(name))
        .find(|candidate| candidate.is_file())
    {
        tracing::debug!("Found application config: {}", found.display());
        return ConfigSource::Application(found);
    }

    match user_dir.map(|dir| dir.join(USER_CONFIG_NAME)) {
        Some(candidate) if candidate.is_file() => {
            tracing::debug!("Found user config: {}", candidate.display());
            ConfigSource::User(candidate)
        }
        _ => ConfigSource::Default,
    }
}

/// `$RAILSBP_CONFIG_DIR`, else `~/.railsbp`.
#[must_use]
pub fn user_config_dir() -> Option<PathBuf> {
    std::env::var_os(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|home| home.join(".railsbp")))
}

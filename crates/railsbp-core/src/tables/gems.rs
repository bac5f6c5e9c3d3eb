//! Resolved gems and application config values.

use serde::Serialize;
use std::collections::BTreeMap;

/// Gem name to locked version, read from `Gemfile.lock`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Gems {
    gems: BTreeMap<String, String>,
}

impl Gems {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a gem version. The first version seen wins.
    pub fn add_gem(&mut self, name: &str, version: &str) {
        self.gems
            .entry(name.to_string())
            .or_insert_with(|| version.to_string());
    }

    /// Returns true if the gem is in the bundle.
    #[must_use]
    pub fn has_gem(&self, name: &str) -> bool {
        self.gems.contains_key(name)
    }

    /// Locked version of a gem.
    #[must_use]
    pub fn gem_version(&self, name: &str) -> Option<&str> {
        self.gems.get(name).map(String::as_str)
    }

    /// Number of gems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.gems.len()
    }

    /// True when no lock file was read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gems.is_empty()
    }
}

/// `config.x = value` settings from application and environment files.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Configs {
    configs: BTreeMap<String, String>,
}

impl Configs {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a setting; later assignments override earlier ones.
    pub fn add_config(&mut self, key: &str, value: &str) {
        self.configs.insert(key.to_string(), value.to_string());
    }

    /// Value of a setting (`active_record.whitelist_attributes` → `true`).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.configs.get(key).map(String::as_str)
    }
}

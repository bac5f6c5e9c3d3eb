//! Per-run analysis state shared by prepare and review checks.

use crate::tables::{
    Configs, Gems, Klasses, Methods, ModelAssociations, ModelAttributes, Modules, Routes,
};
use serde::Serialize;

/// Symbol tables for one analysis run.
///
/// Prepare checks write to it, review checks read it (and mark methods used).
/// A fresh context is created for every run; nothing persists between runs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisContext {
    /// Routes from `config/routes.rb`.
    pub routes: Routes,
    /// Model classes.
    pub models: Klasses,
    /// Mailer classes.
    pub mailers: Klasses,
    /// Controller classes.
    pub controllers: Klasses,
    /// Helper modules.
    pub helpers: Modules,
    /// Methods declared in models.
    pub model_methods: Methods,
    /// Methods declared in controllers.
    pub controller_methods: Methods,
    /// Methods declared in helpers.
    pub helper_methods: Methods,
    /// Model associations.
    pub model_associations: ModelAssociations,
    /// Model attributes.
    pub model_attributes: ModelAttributes,
    /// Locked gems.
    pub gems: Gems,
    /// Application config values.
    pub configs: Configs,
}

impl AnalysisContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every table.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

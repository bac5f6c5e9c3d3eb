//! Model associations and attributes.

use crate::utils::inflect::classify;
use serde::Serialize;
use std::collections::BTreeMap;

/// Association macros that point at a single record.
pub const SINGULAR_ASSOCIATIONS: &[&str] = &["belongs_to", "has_one", "embeds_one", "embedded_in", "one"];

/// Association macros that point at a collection.
pub const COLLECTION_ASSOCIATIONS: &[&str] = &[
    "has_many",
    "has_and_belongs_to_many",
    "embeds_many",
    "references_many",
    "many",
];

/// One association declared on a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Association {
    /// Declaring macro (`belongs_to`, `has_many`, ...).
    pub kind: String,
    /// Target class.
    pub class_name: String,
}

/// Associations per model class.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModelAssociations {
    associations: BTreeMap<String, BTreeMap<String, Association>>,
}

impl ModelAssociations {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an association.
    ///
    /// Without an explicit class name the target is derived from the
    /// association name (`comments` → `Comment`).
    pub fn add_association(
        &mut self,
        model: &str,
        name: &str,
        kind: &str,
        class_name: Option<&str>,
    ) {
        let class_name = class_name
            .filter(|c| !c.is_empty())
            .map_or_else(|| classify(name), |c| c.trim_start_matches("::").to_string());
        self.associations.entry(model.to_string()).or_default().insert(
            name.to_string(),
            Association {
                kind: kind.to_string(),
                class_name,
            },
        );
    }

    /// Looks up an association, optionally requiring one of `kinds`.
    #[must_use]
    pub fn get_association(&self, model: &str, name: &str, kinds: &[&str]) -> Option<&Association> {
        self.associations
            .get(model)?
            .get(name)
            .filter(|a| kinds.is_empty() || kinds.contains(&a.kind.as_str()))
    }

    /// Returns true if `name` is an association of `model`.
    #[must_use]
    pub fn is_association(&self, model: &str, name: &str) -> bool {
        self.get_association(model, name, &[]).is_some()
    }

    /// Returns true for a single-record association (`belongs_to`, `has_one`).
    #[must_use]
    pub fn belongs_to(&self, model: &str, name: &str) -> bool {
        self.get_association(model, name, SINGULAR_ASSOCIATIONS).is_some()
    }

    /// Returns true for a collection association (`has_many`, ...).
    #[must_use]
    pub fn has_many(&self, model: &str, name: &str) -> bool {
        self.get_association(model, name, COLLECTION_ASSOCIATIONS).is_some()
    }

    /// Target class of an association.
    #[must_use]
    pub fn get_association_class_name(&self, model: &str, name: &str) -> Option<&str> {
        self.get_association(model, name, &[])
            .map(|a| a.class_name.as_str())
    }

    /// Associations of one model, keyed by name.
    #[must_use]
    pub fn of(&self, model: &str) -> Option<&BTreeMap<String, Association>> {
        self.associations.get(model)
    }
}

/// Attribute types per model class.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModelAttributes {
    attributes: BTreeMap<String, BTreeMap<String, String>>,
}

impl ModelAttributes {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an attribute with its declared type.
    pub fn add_attribute(&mut self, model: &str, name: &str, attribute_type: &str) {
        self.attributes
            .entry(model.to_string())
            .or_default()
            .insert(name.to_string(), attribute_type.to_string());
    }

    /// Declared type of an attribute.
    #[must_use]
    pub fn get_attribute_type(&self, model: &str, name: &str) -> Option<&str> {
        self.attributes
            .get(model)?
            .get(name)
            .map(String::as_str)
    }

    /// Returns true if the model has the attribute.
    #[must_use]
    pub fn is_attribute(&self, model: &str, name: &str) -> bool {
        self.get_attribute_type(model, name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn association_class_defaults_to_classified_name() {
        let mut table = ModelAssociations::new();
        table.add_association("Post", "comments", "has_many", None);
        table.add_association("Post", "author", "belongs_to", Some("User"));
        assert_eq!(table.get_association_class_name("Post", "comments"), Some("Comment"));
        assert_eq!(table.get_association_class_name("Post", "author"), Some("User"));
        assert!(table.has_many("Post", "comments"));
        assert!(!table.belongs_to("Post", "comments"));
        assert!(table.belongs_to("Post", "author"));
        assert!(!table.is_association("Post", "title"));
        assert!(!table.is_association("Comment", "author"));
    }

    #[test]
    fn attributes_by_model() {
        let mut table = ModelAttributes::new();
        table.add_attribute("User", "name", "string");
        assert_eq!(table.get_attribute_type("User", "name"), Some("string"));
        assert!(table.is_attribute("User", "name"));
        assert!(!table.is_attribute("Post", "name"));
    }
}

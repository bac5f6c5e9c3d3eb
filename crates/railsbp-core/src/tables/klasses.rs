//! Class and module registries.

use serde::Serialize;
use std::fmt;

/// A class declaration seen in the codebase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Klass {
    class_name: String,
    extend_class_name: String,
    modules: Vec<String>,
}

impl Klass {
    /// Creates a class nested inside `modules`.
    #[must_use]
    pub fn new(class_name: &str, extend_class_name: &str, modules: &[String]) -> Self {
        Self {
            class_name: class_name.to_string(),
            extend_class_name: extend_class_name.to_string(),
            modules: modules.to_vec(),
        }
    }

    /// Class name as written (`Post`, `Admin::Post`).
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Superclass name as written, without a leading `::`, or empty.
    ///
    /// Use [`Klasses::superclass_of`] for the name it resolves to.
    #[must_use]
    pub fn extend_class_name(&self) -> &str {
        self.extend_class_name
            .strip_prefix("::")
            .unwrap_or(&self.extend_class_name)
    }

    /// Names the superclass may refer to, innermost module first.
    ///
    /// `class PostsController < BaseController` inside `Admin` yields
    /// `Admin::BaseController` then `BaseController`. An absolute `::Base`
    /// yields only `Base`.
    #[must_use]
    pub fn superclass_candidates(&self) -> Vec<String> {
        let name = self.extend_class_name();
        if name.is_empty() {
            return Vec::new();
        }
        if self.extend_class_name.starts_with("::") {
            return vec![name.to_string()];
        }
        let mut candidates: Vec<String> = (1..=self.modules.len())
            .rev()
            .map(|depth| format!("{}::{name}", self.modules[..depth].join("::")))
            .collect();
        candidates.push(name.to_string());
        candidates
    }

    /// Enclosing modules, outermost first.
    #[must_use]
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    /// Fully qualified name (`Admin::PostsController`).
    #[must_use]
    pub fn to_s(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Klass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modules.is_empty() {
            f.write_str(&self.class_name)
        } else {
            write!(f, "{}::{}", self.modules.join("::"), self.class_name)
        }
    }
}

/// Registry of declared classes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Klasses {
    klasses: Vec<Klass>,
}

impl Klasses {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a class; re-declarations of the same name are ignored.
    pub fn add_klass(&mut self, klass: Klass) {
        if !self.include(&klass.to_s()) {
            self.klasses.push(klass);
        }
    }

    /// Finds a class by qualified name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Klass> {
        self.klasses.iter().find(|k| k.to_s() == name)
    }

    /// Returns true if the class was declared.
    #[must_use]
    pub fn include(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Qualified superclass of `klass`, resolved like a Ruby constant: the
    /// innermost declared candidate wins, otherwise the name as written.
    #[must_use]
    pub fn superclass_of(&self, klass: &Klass) -> String {
        let candidates = klass.superclass_candidates();
        candidates
            .iter()
            .find(|candidate| self.include(candidate))
            .or_else(|| candidates.last())
            .cloned()
            .unwrap_or_default()
    }

    /// Direct and transitive subclasses of `name`.
    #[must_use]
    pub fn subclasses_of(&self, name: &str) -> Vec<&Klass> {
        let mut found: Vec<&Klass> = Vec::new();
        let mut queue = vec![name.to_string()];
        while let Some(parent) = queue.pop() {
            for klass in &self.klasses {
                if self.superclass_of(klass) == parent && !found.contains(&klass) {
                    found.push(klass);
                    queue.push(klass.to_s());
                }
            }
        }
        found
    }

    /// All classes in declaration order.
    #[must_use]
    pub fn all(&self) -> &[Klass] {
        &self.klasses
    }

    /// Number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.klasses.len()
    }

    /// True when nothing was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.klasses.is_empty()
    }
}

/// Registry of declared modules, by qualified name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Modules {
    modules: Vec<String>,
}

impl Modules {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a module nested inside `outer`.
    pub fn add_module(&mut self, name: &str, outer: &[String]) {
        let qualified = if outer.is_empty() {
            name.to_string()
        } else {
            format!("{}::{name}", outer.join("::"))
        };
        if !self.include(&qualified) {
            self.modules.push(qualified);
        }
    }

    /// Returns true if the module was declared.
    #[must_use]
    pub fn include(&self, name: &str) -> bool {
        self.modules.iter().any(|m| m == name)
    }

    /// All module names.
    #[must_use]
    pub fn all(&self) -> &[String] {
        &self.modules
    }
}

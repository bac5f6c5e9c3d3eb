//! Method registry with access levels and usage marks.

use super::klasses::Klasses;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

/// Visibility of a method at its declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    /// Callable from anywhere.
    #[default]
    Public,
    /// Callable from the class and subclasses.
    Protected,
    /// Callable only without an explicit receiver.
    Private,
}

impl Access {
    /// Parses `public`, `protected` or `private`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "public" => Some(Self::Public),
            "protected" => Some(Self::Protected),
            "private" => Some(Self::Private),
            _ => None,
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Protected => write!(f, "protected"),
            Self::Private => write!(f, "private"),
        }
    }
}

/// A declared method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Method {
    /// Qualified owner class.
    pub class_name: String,
    /// Method name.
    pub method_name: String,
    /// Visibility at declaration.
    pub access: Access,
    /// Declaring file.
    pub file: PathBuf,
    /// Declaring line.
    pub line: usize,
    /// Set once some call site proves the method is used.
    pub used: bool,
}

/// Per-class method registry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Methods {
    methods: BTreeMap<String, Vec<Method>>,
    possible_methods: HashSet<String>,
}

impl Methods {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a method. Empty class names and repeated declarations are ignored.
    pub fn add_method(
        &mut self,
        class_name: &str,
        method_name: &str,
        file: &Path,
        line: usize,
        access: Access,
    ) {
        if class_name.is_empty() || method_name.is_empty() {
            return;
        }
        let methods = self.methods.entry(class_name.to_string()).or_default();
        if methods.iter().any(|m| m.method_name == method_name) {
            return;
        }
        methods.push(Method {
            class_name: class_name.to_string(),
            method_name: method_name.to_string(),
            access,
            file: file.to_path_buf(),
            line,
            used: false,
        });
    }

    /// Methods of a class, optionally restricted to one access level.
    #[must_use]
    pub fn get_methods(&self, class_name: &str, access: Option<Access>) -> Vec<&Method> {
        self.methods
            .get(class_name)
            .map(|methods| {
                methods
                    .iter()
                    .filter(|m| access.map_or(true, |a| m.access == a))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Finds one method, optionally restricted to one access level.
    #[must_use]
    pub fn get_method(
        &self,
        class_name: &str,
        method_name: &str,
        access: Option<Access>,
    ) -> Option<&Method> {
        self.get_methods(class_name, access)
            .into_iter()
            .find(|m| m.method_name == method_name)
    }

    /// Returns true if the class declares the method.
    #[must_use]
    pub fn has_method(&self, class_name: &str, method_name: &str, access: Option<Access>) -> bool {
        self.get_method(class_name, method_name, access).is_some()
    }

    fn method_mut(&mut self, class_name: &str, method_name: &str) -> Option<&mut Method> {
        self.methods
            .get_mut(class_name)?
            .iter_mut()
            .find(|m| m.method_name == method_name)
    }

    /// Marks a method used. Marking twice is a no-op; unknown methods are ignored.
    pub fn mark_used(&mut self, class_name: &str, method_name: &str) -> bool {
        match self.method_mut(class_name, method_name) {
            Some(method) => {
                method.used = true;
                true
            }
            None => false,
        }
    }

    /// Marks the method used in the nearest ancestor that declares it.
    pub fn mark_parent_class_method_used(
        &mut self,
        klasses: &Klasses,
        class_name: &str,
        method_name: &str,
    ) {
        let mut seen = HashSet::new();
        let mut current = klasses
            .find(class_name)
            .map(|k| klasses.superclass_of(k));
        while let Some(parent) = current {
            if parent.is_empty() || !seen.insert(parent.clone()) {
                break;
            }
            if self.mark_used(&parent, method_name) {
                break;
            }
            current = klasses
                .find(&parent)
                .map(|k| klasses.superclass_of(k));
        }
    }

    /// Marks the method used in every subclass that declares it.
    pub fn mark_subclasses_method_used(
        &mut self,
        klasses: &Klasses,
        class_name: &str,
        method_name: &str,
    ) {
        for subclass in klasses.subclasses_of(class_name) {
            self.mark_used(&subclass.to_s(), method_name);
        }
    }

    /// Makes an already declared method public (`public :name`).
    pub fn mark_publicize(&mut self, class_name: &str, method_name: &str) {
        if let Some(method) = self.method_mut(class_name, method_name) {
            method.access = Access::Public;
        }
    }

    /// Marks a method used only when it is public.
    pub fn mark_public_method_used(&mut self, class_name: &str, method_name: &str) {
        if let Some(method) = self.method_mut(class_name, method_name) {
            if method.access == Access::Public {
                method.used = true;
            }
        }
    }

    /// Records a call on an unknown receiver; public methods of this name are
    /// never reported unused.
    pub fn possible_public_used(&mut self, method_name: &str) {
        self.possible_methods.insert(method_name.to_string());
    }

    /// Every method not marked used, optionally restricted to one access level.
    #[must_use]
    pub fn get_all_unused_methods(&self, access: Option<Access>) -> Vec<&Method> {
        self.methods
            .values()
            .flatten()
            .filter(|m| !m.used)
            .filter(|m| access.map_or(true, |a| m.access == a))
            .filter(|m| {
                !(m.access == Access::Public && self.possible_methods.contains(&m.method_name))
            })
            .collect()
    }

    /// Every declared method.
    pub fn iter(&self) -> impl Iterator<Item = &Method> {
        self.methods.values().flatten()
    }
}

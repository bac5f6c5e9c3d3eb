//! Tracks the `module`/`class` nesting of the file being dispatched.

use railsbp_core::tables::Klass;
use railsbp_core::{CheckerBuilder, Kind, NodeRef};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Module(String),
    Class(Klass),
}

impl Entry {
    fn name(&self) -> &str {
        match self {
            Self::Module(name) => name,
            Self::Class(klass) => klass.class_name(),
        }
    }
}

/// Current class and module nesting.
#[derive(Debug, Clone, Default)]
pub struct ClassScope {
    entries: Vec<Entry>,
    last_closed: Option<Klass>,
}

impl ClassScope {
    /// Innermost open class.
    #[must_use]
    pub fn current_class(&self) -> Option<&Klass> {
        self.entries.iter().rev().find_map(|e| match e {
            Entry::Class(klass) => Some(klass),
            Entry::Module(_) => None,
        })
    }

    /// Qualified name of the innermost class, or empty outside classes.
    #[must_use]
    pub fn current_class_name(&self) -> String {
        self.current_class().map(Klass::to_s).unwrap_or_default()
    }

    /// Superclass of the innermost class, or empty.
    #[must_use]
    pub fn current_extend_class_name(&self) -> String {
        self.current_class()
            .map(|k| k.extend_class_name().to_string())
            .unwrap_or_default()
    }

    /// Qualified name of everything open (`Admin::PostsHelper`).
    #[must_use]
    pub fn current_module_name(&self) -> String {
        self.namespace().join("::")
    }

    /// Names of every open module and class, outermost first.
    #[must_use]
    pub fn namespace(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name().to_string()).collect()
    }

    /// The class closed most recently. Exit callbacks registered after
    /// [`classable`] see the class they are leaving here.
    #[must_use]
    pub fn last_closed_class(&self) -> Option<&Klass> {
        self.last_closed.as_ref()
    }

    fn enter_class(&mut self, node: NodeRef<'_>) {
        let name = node.class_name().render_text();
        let base = node.base_class().render_text();
        let klass = Klass::new(&name, &base, &self.namespace());
        self.entries.push(Entry::Class(klass));
    }

    fn enter_module(&mut self, node: NodeRef<'_>) {
        self.entries
            .push(Entry::Module(node.module_name().render_text()));
    }

    fn exit(&mut self) {
        if let Some(Entry::Class(klass)) = self.entries.pop() {
            self.last_closed = Some(klass);
        }
    }
}

/// State that carries a [`ClassScope`].
pub trait HasClassScope {
    /// The scope tracker.
    fn class_scope(&mut self) -> &mut ClassScope;
}

/// Installs class/module tracking. Install before the check's own callbacks.
#[must_use]
pub fn classable<S>(builder: CheckerBuilder<S>) -> CheckerBuilder<S>
where
    S: HasClassScope + Send + 'static,
{
    builder
        .interesting_kinds([Kind::Class, Kind::Module])
        .on_enter(Kind::Class, |state: &mut S, _, node| {
            state.class_scope().enter_class(node);
            Ok(())
        })
        .on_exit(Kind::Class, |state: &mut S, _, _| {
            state.class_scope().exit();
            Ok(())
        })
        .on_enter(Kind::Module, |state: &mut S, _, node| {
            state.class_scope().enter_module(node);
            Ok(())
        })
        .on_exit(Kind::Module, |state: &mut S, _, _| {
            state.class_scope().exit();
            Ok(())
        })
}

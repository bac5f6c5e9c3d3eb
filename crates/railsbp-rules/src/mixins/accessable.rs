//! Tracks `public`/`protected`/`private` sections.

use railsbp_core::tables::Access;
use railsbp_core::{CheckerBuilder, Kind, NodeRef};

/// Access level in effect at the current node.
#[derive(Debug, Clone, Default)]
pub struct AccessScope {
    stack: Vec<Access>,
    inline: Option<Access>,
}

impl AccessScope {
    /// Access level of a method defined here.
    #[must_use]
    pub fn current(&self) -> Access {
        self.inline
            .or_else(|| self.stack.last().copied())
            .unwrap_or_default()
    }

    fn switch(&mut self, access: Access) {
        match self.stack.last_mut() {
            Some(top) => *top = access,
            None => self.stack.push(access),
        }
    }
}

/// State that carries an [`AccessScope`].
pub trait HasAccessScope {
    /// The access tracker.
    fn access_scope(&mut self) -> &mut AccessScope;
}

/// `private` with a `def` argument: `private def helper ... end`.
fn inline_access(node: NodeRef<'_>) -> Option<Access> {
    let access = Access::parse(&node.message().render_text())?;
    node.call_arguments()
        .first()
        .is_some_and(|arg| arg.is_any(&[Kind::Def, Kind::Defs]))
        .then_some(access)
}

/// Installs access tracking. Every class, module and singleton class opens
/// a public section; a bare `private`, `protected` or `public` switches it.
#[must_use]
pub fn accessable<S>(builder: CheckerBuilder<S>) -> CheckerBuilder<S>
where
    S: HasAccessScope + Send + 'static,
{
    let mut builder = builder.interesting_kinds([
        Kind::Class,
        Kind::Module,
        Kind::Sclass,
        Kind::Vcall,
        Kind::VarRef,
        Kind::Command,
    ]);
    for kind in [Kind::Class, Kind::Module, Kind::Sclass] {
        builder = builder
            .on_enter(kind.clone(), |state: &mut S, _, _| {
                state.access_scope().stack.push(Access::Public);
                Ok(())
            })
            .on_exit(kind, |state: &mut S, _, _| {
                state.access_scope().stack.pop();
                Ok(())
            });
    }
    for kind in [Kind::Vcall, Kind::VarRef] {
        builder = builder.on_enter(kind, |state: &mut S, _, node| {
            if let Some(access) = Access::parse(&node.render_text()) {
                state.access_scope().switch(access);
            }
            Ok(())
        });
    }
    builder
        .on_enter(Kind::Command, |state: &mut S, _, node| {
            if let Some(access) = inline_access(node) {
                state.access_scope().inline = Some(access);
            }
            Ok(())
        })
        .on_exit(Kind::Command, |state: &mut S, _, node| {
            if inline_access(node).is_some() {
                state.access_scope().inline = None;
            }
            Ok(())
        })
}

//! Marks methods used when something calls them.

use super::classable::HasClassScope;
use railsbp_core::tables::{Klasses, Methods};
use railsbp_core::{AnalysisContext, CheckerBuilder, Cx, Kind, NodeRef};

/// Calls that invoke their first argument by name.
const DYNAMIC_SENDS: &[&str] = &["try", "try!", "send", "__send__", "public_send"];

/// Hash keys whose values name callback methods (`if: :admin?`).
const CONDITION_KEYS: &[&str] = &["if", "unless"];

/// Which method table a [`callable`] check marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodTable {
    /// `model_methods`, with `models` for the class hierarchy.
    Models,
    /// `controller_methods`, with `controllers` for the class hierarchy.
    Controllers,
    /// `helper_methods`; helpers have no hierarchy.
    Helpers,
}

impl MethodTable {
    fn split(self, tables: &mut AnalysisContext) -> (&mut Methods, Option<&Klasses>) {
        match self {
            Self::Models => (&mut tables.model_methods, Some(&tables.models)),
            Self::Controllers => (&mut tables.controller_methods, Some(&tables.controllers)),
            Self::Helpers => (&mut tables.helper_methods, None),
        }
    }
}

/// Marks `method_name` used on `class_name`, its ancestors and subclasses.
pub fn call_method(tables: &mut AnalysisContext, table: MethodTable, class_name: &str, method_name: &str) {
    if method_name.is_empty() {
        return;
    }
    let (methods, klasses) = table.split(tables);
    methods.mark_used(class_name, method_name);
    if let Some(klasses) = klasses {
        methods.mark_parent_class_method_used(klasses, class_name, method_name);
        methods.mark_subclasses_method_used(klasses, class_name, method_name);
    }
    methods.possible_public_used(method_name);
}

fn mark_used(cx: &mut Cx<'_>, table: MethodTable, class_name: &str, node: NodeRef<'_>) {
    match node.kind() {
        Some(Kind::BareAssocHash | Kind::Hash) => {
            for value in node.hash_values() {
                mark_used(cx, table, class_name, value);
            }
        }
        Some(Kind::Array) => {
            for value in node.array_values() {
                mark_used(cx, table, class_name, value);
            }
        }
        _ => call_method(cx.tables, table, class_name, &node.render_text()),
    }
}

/// Installs call tracking on `table`. Requires [`classable`](super::classable)
/// to be installed first.
#[must_use]
pub fn callable<S>(builder: CheckerBuilder<S>, table: MethodTable) -> CheckerBuilder<S>
where
    S: HasClassScope + Send + 'static,
{
    builder
        .interesting_kinds([
            Kind::Call,
            Kind::Fcall,
            Kind::Vcall,
            Kind::VarRef,
            Kind::Command,
            Kind::CommandCall,
            Kind::MethodAddArg,
            Kind::Alias,
            Kind::AssocNew,
        ])
        .on_enter(Kind::Call, move |state: &mut S, cx, node| {
            let class_name = state.class_scope().current_class_name();
            mark_used(cx, table, &class_name, node.message());
            Ok(())
        })
        .on_enter(Kind::Fcall, move |state: &mut S, cx, node| {
            let class_name = state.class_scope().current_class_name();
            mark_used(cx, table, &class_name, node.message());
            Ok(())
        })
        .on_enter(Kind::Vcall, move |state: &mut S, cx, node| {
            let class_name = state.class_scope().current_class_name();
            mark_used(cx, table, &class_name, node);
            Ok(())
        })
        .on_enter(Kind::VarRef, move |state: &mut S, cx, node| {
            let class_name = state.class_scope().current_class_name();
            mark_used(cx, table, &class_name, node);
            Ok(())
        })
        .on_enter(Kind::Command, move |state: &mut S, cx, node| {
            let class_name = state.class_scope().current_class_name();
            mark_used(cx, table, &class_name, node.message());
            for argument in node.call_arguments() {
                mark_used(cx, table, &class_name, argument);
            }
            Ok(())
        })
        .on_enter(Kind::CommandCall, move |state: &mut S, cx, node| {
            let class_name = state.class_scope().current_class_name();
            mark_used(cx, table, &class_name, node.message());
            Ok(())
        })
        .on_enter(Kind::MethodAddArg, move |state: &mut S, cx, node| {
            let class_name = state.class_scope().current_class_name();
            let arguments = node.call_arguments();
            if DYNAMIC_SENDS.contains(&node.message().render_text().as_str()) {
                if let Some(first) = arguments.first() {
                    mark_used(cx, table, &class_name, *first);
                }
            } else if node.slot(0).is(&Kind::Fcall) {
                for argument in arguments {
                    mark_used(cx, table, &class_name, argument);
                }
            }
            Ok(())
        })
        .on_enter(Kind::Alias, move |state: &mut S, cx, node| {
            let class_name = state.class_scope().current_class_name();
            mark_used(cx, table, &class_name, node.old_method());
            Ok(())
        })
        .on_enter(Kind::AssocNew, move |state: &mut S, cx, node| {
            if CONDITION_KEYS.contains(&node.slot(0).render_text().as_str()) {
                let class_name = state.class_scope().current_class_name();
                mark_used(cx, table, &class_name, node.slot(1));
            }
            Ok(())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixins::{classable, ClassScope};
    use crate::test_support::{dispatch_in, tree};
    use railsbp_core::tables::{Access, Klass};
    use railsbp_core::{Checker, FilePattern};
    use serde_json::json;
    use std::path::Path;

    #[derive(Default)]
    struct Calls {
        scope: ClassScope,
    }

    impl HasClassScope for Calls {
        fn class_scope(&mut self) -> &mut ClassScope {
            &mut self.scope
        }
    }

    fn symbol(name: &str, line: usize) -> serde_json::Value {
        json!(["symbol_literal", ["symbol", ["@ident", name, [line, 17]]]])
    }

    #[test]
    fn marks_callbacks_sends_and_hierarchy() {
        let file = Path::new("app/controllers/posts_controller.rb");
        let mut tables = AnalysisContext::new();
        tables.controllers.add_klass(Klass::new("ApplicationController", "ActionController::Base", &[]));
        tables.controllers.add_klass(Klass::new("PostsController", "ApplicationController", &[]));
        for (class, name) in [
            ("PostsController", "load_post"),
            ("PostsController", "admin?"),
            ("PostsController", "preview"),
            ("PostsController", "orphan"),
            ("ApplicationController", "current_user"),
        ] {
            tables.controller_methods.add_method(class, name, file, 1, Access::Private);
        }

        let source = tree(json!(["program", [
            ["class", ["const_ref", ["@const", "PostsController", [1, 6]]],
                ["var_ref", ["@const", "ApplicationController", [1, 24]]],
                ["bodystmt", [
                    ["command", ["@ident", "before_action", [2, 2]],
                        ["args_add_block", [
                            symbol("load_post", 2),
                            ["bare_assoc_hash", [["assoc_new", ["@label", "if:", [2, 30]], symbol("admin?", 2)]]]
                        ], false]],
                    ["method_add_arg",
                        ["call", ["var_ref", ["@kw", "self", [3, 2]]], ["@period", ".", [3, 6]], ["@ident", "send", [3, 7]]],
                        ["arg_paren", ["args_add_block", [symbol("preview", 3)], false]]],
                    ["vcall", ["@ident", "current_user", [4, 2]]]
                ], null, null, null]]
        ]]));
        let check = callable(classable(Checker::builder("Calls")), MethodTable::Controllers)
            .interesting_files([FilePattern::All])
            .build(Calls::default());
        dispatch_in(check, file.to_str().unwrap(), &source, &mut tables);

        let unused: Vec<String> = tables
            .controller_methods
            .get_all_unused_methods(None)
            .into_iter()
            .map(|m| format!("{}#{}", m.class_name, m.method_name))
            .collect();
        assert_eq!(unused, vec!["PostsController#orphan"]);
    }
}

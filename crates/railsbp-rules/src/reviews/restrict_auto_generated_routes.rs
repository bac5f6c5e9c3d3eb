//! Check for `resources` routes pointing at actions the controller lacks.
//!
//! # Rationale
//!
//! `resources :posts` generates seven routes. When the controller only
//! implements some of them, the others lead to errors; restrict the
//! declaration with `only:` or `except:`.
//!
//! # Detected Patterns
//!
//! - A `resources`/`resource` declaration whose generated actions are not
//!   all defined in its controller
//!
//! Controllers that were never seen by the controller scan are skipped.

use crate::mixins::routable::{
    is_resource_message, is_route_call, resource_actions, resource_controller, route_names,
    route_options, RESOURCES_ACTIONS, RESOURCE_ACTIONS, ROUTE_CALL_KINDS,
};
use crate::mixins::{routable, HasRouteScope, RouteScope};
use crate::presets::{BuiltinCheck, Stage};
use railsbp_core::patterns::{builtin, ROUTE_FILES};
use railsbp_core::tables::Route;
use railsbp_core::{CheckBox, CheckConfig, CheckError, Checker, Cx, FilePattern, Kind, NodeRef};

/// Check name.
pub const NAME: &str = "RestrictAutoGeneratedRoutesCheck";

/// Reference for the practice.
pub const URL: &str = "https://rails-bestpractices.com/posts/2011/08/19/restrict-auto-generated-routes/";

#[derive(Debug, Default)]
struct State {
    scope: RouteScope,
}

impl HasRouteScope for State {
    fn route_scope(&mut self) -> &mut RouteScope {
        &mut self.scope
    }
}

/// Reports resource routes broader than their controller.
#[derive(Debug, Clone, Default)]
pub struct RestrictAutoGeneratedRoutesReview;

impl RestrictAutoGeneratedRoutesReview {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn symbols<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    names
        .into_iter()
        .map(|n| format!(":{n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Suggests the shorter of `only:` and `except:`.
fn suggestion(defaults: &[&str], implemented: &[String]) -> String {
    let excluded: Vec<&str> = defaults
        .iter()
        .copied()
        .filter(|a| !implemented.iter().any(|i| i == a))
        .collect();
    if implemented.len() > excluded.len() {
        format!("except: [{}]", symbols(excluded))
    } else {
        format!("only: [{}]", symbols(implemented.iter().map(String::as_str)))
    }
}

fn review_resource(state: &mut State, cx: &mut Cx<'_>, node: NodeRef<'_>) -> Result<(), CheckError> {
    if !is_route_call(node) {
        return Ok(());
    }
    let message = node.message().render_text();
    if !is_resource_message(&message) {
        return Ok(());
    }
    let is_head = state.scope.visit_resource_command().is_none();
    let Some(name) = route_names(node).into_iter().next() else {
        return Ok(());
    };
    let options = route_options(node);
    let namespaces = state.scope.namespaces();
    let controller = Route::new(&namespaces, &resource_controller(&name, options), "")
        .controller_name_with_namespaces();
    if !cx.tables.controllers.include(&controller) {
        return Ok(());
    }

    let methods = &cx.tables.controller_methods;
    let actions = resource_actions(&message, options);
    if actions.iter().all(|a| methods.has_method(&controller, a, None)) {
        return Ok(());
    }
    let implemented: Vec<String> = actions
        .into_iter()
        .filter(|a| methods.has_method(&controller, a, None))
        .collect();
    let defaults = if message == "resource" {
        RESOURCE_ACTIONS
    } else {
        RESOURCES_ACTIONS
    };

    let mut path = namespaces;
    path.extend(state.scope.resource_names());
    if !is_head {
        path.push(name);
    }
    cx.add_error(format!(
        "restrict auto-generated routes {} ({})",
        path.join("/"),
        suggestion(defaults, &implemented)
    ));
    Ok(())
}

impl BuiltinCheck for RestrictAutoGeneratedRoutesReview {
    const NAME: &'static str = NAME;
    const STAGE: Stage = Stage::Review;

    fn configure(_config: &CheckConfig) -> Self {
        Self::new()
    }

    fn build(self, ignored: Vec<FilePattern>) -> CheckBox {
        routable(Checker::builder(NAME))
            .url(URL)
            .interesting_kinds(ROUTE_CALL_KINDS)
            .interesting_files([builtin(&ROUTE_FILES)])
            .ignored_files(ignored)
            .on_enter(Kind::Command, review_resource)
            .on_enter(Kind::MethodAddArg, review_resource)
            .boxed(State::default())
    }
}

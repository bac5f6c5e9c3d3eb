//! Builds the route table from `config/routes.rb`.
//!
//! Understands the Rails 3+ routing DSL:
//!
//! - `resources`/`resource` with `only:`, `except:`, `controller:`,
//!   `member:` and `collection:` options
//! - `namespace` and `scope module:` blocks
//! - verb helpers (`get`, `post`, `put`, `patch`, `delete`, `match`) with
//!   `to: "posts#show"`, `"path" => "posts#show"`, `controller:`/`action:`,
//!   or a bare action inside a `resources` block
//! - `root`
//!
//! Each call may be written with or without parentheses.

use crate::mixins::routable::{
    is_resource_message, is_route_call, resource_actions, resource_controller, route_names,
    route_options, ROUTE_CALL_KINDS, VERBS,
};
use crate::mixins::{routable, HasRouteScope, RouteScope};
use crate::presets::{BuiltinCheck, Stage};
use railsbp_core::patterns::{builtin, ROUTE_FILES};
use railsbp_core::{CheckBox, CheckConfig, CheckError, Checker, Cx, FilePattern, Kind, NodeRef};

/// Check name.
pub const NAME: &str = "RoutePrepare";

#[derive(Debug, Default)]
struct State {
    scope: RouteScope,
}

impl HasRouteScope for State {
    fn route_scope(&mut self) -> &mut RouteScope {
        &mut self.scope
    }
}

/// Records every route declared in route files.
#[derive(Debug, Clone, Default)]
pub struct RoutePrepare;

impl RoutePrepare {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

/// Resolves the `(controller, action)` a verb helper routes to.
fn verb_target(node: NodeRef<'_>, current: Option<&str>) -> Option<(String, String)> {
    let options = route_options(node);
    let first = route_names(node)
        .into_iter()
        .next()
        .map(|name| name.trim_start_matches('/').to_string());

    let target = non_empty(options.hash_value("to").render_text()).or_else(|| {
        options
            .hash_values()
            .into_iter()
            .map(NodeRef::render_text)
            .find(|value| value.contains('#'))
    });
    if let Some((controller, action)) = target.as_deref().and_then(|t| t.split_once('#')) {
        return Some((controller.to_string(), action.to_string()));
    }

    let controller = non_empty(options.hash_value("controller").render_text());
    let action = non_empty(options.hash_value("action").render_text());
    if controller.is_some() || action.is_some() {
        let controller = controller.or_else(|| current.map(ToString::to_string))?;
        return Some((controller, action.or(first)?));
    }

    if let Some(current) = current {
        return first.map(|action| (current.to_string(), action));
    }

    let path = first?;
    let (controller, action) = path.rsplit_once('/')?;
    if controller.contains(':') || action.contains(':') {
        return None;
    }
    Some((controller.to_string(), action.to_string()))
}

fn add_resources(cx: &mut Cx<'_>, namespaces: &[String], message: &str, node: NodeRef<'_>) {
    let options = route_options(node);
    for name in route_names(node) {
        let controller = resource_controller(&name, options);
        for action in resource_actions(message, options) {
            cx.tables.routes.add_route(namespaces, &controller, &action);
        }
        for key in ["member", "collection"] {
            for action in options.hash_value(key).hash_keys() {
                cx.tables.routes.add_route(namespaces, &controller, &action);
            }
        }
    }
}

fn record_route(state: &mut State, cx: &mut Cx<'_>, node: NodeRef<'_>) -> Result<(), CheckError> {
    if !is_route_call(node) {
        return Ok(());
    }
    let message = node.message().render_text();
    let namespaces = state.scope.namespaces();
    if is_resource_message(&message) {
        add_resources(cx, &namespaces, &message, node);
    } else if VERBS.contains(&message.as_str()) {
        if let Some((controller, action)) = verb_target(node, state.scope.current_controller()) {
            cx.tables.routes.add_route(&namespaces, &controller, &action);
        }
    } else if message == "root" {
        let options = route_options(node);
        let target = non_empty(options.hash_value("to").render_text())
            .or_else(|| route_names(node).into_iter().next())
            .unwrap_or_default();
        if let Some((controller, action)) = target.split_once('#') {
            cx.tables.routes.add_route(&namespaces, controller, action);
        }
    }
    Ok(())
}

impl BuiltinCheck for RoutePrepare {
    const NAME: &'static str = NAME;
    const STAGE: Stage = Stage::Prepare;

    fn configure(_config: &CheckConfig) -> Self {
        Self::new()
    }

    fn build(self, ignored: Vec<FilePattern>) -> CheckBox {
        routable(Checker::builder(NAME))
            .interesting_kinds(ROUTE_CALL_KINDS)
            .interesting_files([builtin(&ROUTE_FILES)])
            .ignored_files(ignored)
            .on_enter(Kind::Command, record_route)
            .on_enter(Kind::MethodAddArg, record_route)
            .boxed(State::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        array, bare_block, block, command, fcall, label, options, routes, string, sym, walk_box,
    };
    use railsbp_core::{AnalysisContext, Check, SyntaxNode};
    use serde_json::json;
    use std::path::Path;

    fn routes_of(source: &SyntaxNode) -> Vec<String> {
        let mut check = RoutePrepare::new().build(Vec::new());
        let mut tables = AnalysisContext::new();
        walk_box(check.as_mut(), source, "config/routes.rb", &mut tables);
        assert!(check.diagnostics().is_empty());
        tables.routes.all().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn only_limits_generated_actions() {
        let source = routes(vec![command("resources", vec![
            sym("posts", 2),
            options(vec![label("only", array(vec![sym("show", 2), sym("index", 2)]), 2)]),
        ], 2)]);
        assert_eq!(
            routes_of(&source),
            vec!["PostsController#show", "PostsController#index"]
        );
    }

    #[test]
    fn namespaces_members_and_verbs() {
        let source = routes(vec![
            block(command("namespace", vec![sym("admin", 2)], 2), vec![
                block(
                    command("resources", vec![
                        sym("comments", 3),
                        options(vec![label("except", sym("destroy", 3), 3)]),
                    ], 3),
                    vec![bare_block("member", vec![command("post", vec![sym("approve", 5)], 5)], 4)],
                ),
            ]),
            command("resource", vec![sym("account", 8), options(vec![label("only", sym("show", 8), 8)])], 8),
            command("get", vec![options(vec![json!(["assoc_new", string("about", 9), string("pages#about", 9)])])], 9),
            command("match", vec![
                string("search", 10),
                options(vec![
                    label("controller", string("search", 10), 10),
                    label("action", string("query", 10), 10),
                ]),
            ], 10),
            command("get", vec![string("photos/popular", 11)], 11),
            command("root", vec![options(vec![label("to", string("home#index", 12), 12)])], 12),
        ]);
        insta::assert_snapshot!(routes_of(&source).join("\n"), @r"
        Admin::CommentsController#index
        Admin::CommentsController#show
        Admin::CommentsController#new
        Admin::CommentsController#create
        Admin::CommentsController#edit
        Admin::CommentsController#update
        Admin::CommentsController#approve
        AccountsController#show
        PagesController#about
        SearchController#query
        PhotosController#popular
        HomeController#index
        ");
    }

    #[test]
    fn parenthesized_calls_add_routes() {
        let source = routes(vec![
            block(
                fcall("resources", vec![sym("posts", 2), options(vec![label("only", sym("index", 2), 2)])], 2),
                vec![fcall("get", vec![sym("archived", 3)], 3)],
            ),
            fcall("get", vec![string("photos/popular", 5)], 5),
        ]);
        assert_eq!(
            routes_of(&source),
            vec!["PostsController#index", "PostsController#archived", "PhotosController#popular"]
        );
    }

    #[test]
    fn only_route_files_are_read() {
        let check = RoutePrepare::new().build(Vec::new());
        assert!(!check.parse_file(Path::new("app/models/post.rb")));
        assert!(check.parse_file(Path::new("config/routes.rb")));
        assert!(check.parse_file(Path::new("config/routes/admin.rb")));
        let source = routes(vec![command("resources", vec![sym("posts", 2)], 2)]);
        assert_eq!(routes_of(&source).len(), 7);
    }
}

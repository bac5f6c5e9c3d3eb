//! Check for controller methods nothing calls or routes to.
//!
//! # Rationale
//!
//! Dead actions and filters make controllers harder to read and keep
//! untested code alive.
//!
//! # Detected Patterns
//!
//! - A controller method that is neither routed, called from a controller,
//!   helper or view, named by a filter, nor exposed via `helper_method`
//!
//! Routes with a `*` action keep every method of their controller. Methods
//! of `inherited_resources` controllers that the gem calls back into
//! (`resource`, `collection`, ...) count as used.
//!
//! # Configuration
//!
//! - `except_methods`: `Class#method` entries to keep; either side may be `*`.
//!   A class entry also matches methods declared in its direct subclasses.

use crate::mixins::{call_method, callable, classable, ClassScope, HasClassScope, MethodTable};
use crate::prepares::controller_prepare::INHERITED_RESOURCES_BASE;
use crate::presets::{BuiltinCheck, Stage};
use railsbp_core::patterns::{any_match, builtin, CONTROLLER_FILES, HELPER_FILES, VIEW_FILES};
use railsbp_core::tables::{Klasses, Method};
use railsbp_core::utils::classify;
use railsbp_core::{CheckBox, CheckConfig, Checker, Cx, FilePattern, Kind, NodeRef};

/// Check name.
pub const NAME: &str = "RemoveUnusedMethodsInControllersCheck";

/// Reference for the practice.
pub const URL: &str = "https://rails-bestpractices.com/posts/2010/12/04/remove-unused-methods-in-controllers/";

/// Methods `inherited_resources` invokes on the controller.
const INHERITED_RESOURCES_METHODS: &[&str] =
    &["resource", "collection", "begin_of_association_chain", "build_resource"];

/// Framework hooks that are never unused.
const INTERNAL_EXCEPT_METHODS: &[&str] = &["*#rescue_action", "*#default_url_options"];

#[derive(Debug, Default)]
struct State {
    classes: ClassScope,
    inherited_resources: Vec<bool>,
    except_methods: Vec<String>,
    ignored: Vec<FilePattern>,
}

impl HasClassScope for State {
    fn class_scope(&mut self) -> &mut ClassScope {
        &mut self.classes
    }
}

/// Reports controller methods that are never used.
#[derive(Debug, Clone, Default)]
pub struct RemoveUnusedMethodsInControllersReview {
    except_methods: Vec<String>,
}

impl RemoveUnusedMethodsInControllersReview {
    /// Creates the check with no extra exceptions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `Class#method` entries that are never reported.
    #[must_use]
    pub fn except_methods(mut self, methods: impl IntoIterator<Item = String>) -> Self {
        self.except_methods.extend(methods);
        self
    }
}

/// Tests `method` against one `Class#method` entry.
fn matches_exception(method: &Method, entry: &str, controllers: &Klasses) -> bool {
    let (class_name, method_name) = entry.split_once('#').unwrap_or((entry, "*"));
    if method_name != "*" && method_name != method.method_name {
        return false;
    }
    if class_name == "*" || class_name == method.class_name {
        return true;
    }
    controllers
        .find(&method.class_name)
        .is_some_and(|klass| controllers.superclass_of(klass) == class_name)
}

fn mark_inherited_resources(state: &mut State, cx: &mut Cx<'_>) {
    if !state.inherited_resources.pop().unwrap_or(false) {
        return;
    }
    let Some(class_name) = state.classes.last_closed_class().map(|k| k.to_s()) else {
        return;
    };
    for method in INHERITED_RESOURCES_METHODS {
        call_method(cx.tables, MethodTable::Controllers, &class_name, method);
    }
}

fn mark_inherit_resources(state: &mut State, message: &str) {
    if message == "inherit_resources" {
        if let Some(flag) = state.inherited_resources.last_mut() {
            *flag = true;
        }
    }
}

/// `render_cell :posts, :show` uses `PostsCell#show`.
fn mark_cell_action(cx: &mut Cx<'_>, arguments: &[NodeRef<'_>]) {
    if let [cell, action, ..] = arguments {
        let cell_class = classify(&format!("{}_cell", cell.render_text()));
        call_method(cx.tables, MethodTable::Controllers, &cell_class, &action.render_text());
    }
}

fn on_command(state: &mut State, cx: &mut Cx<'_>, node: NodeRef<'_>) {
    let message = node.message().render_text();
    let class_name = state.classes.current_class_name();
    let arguments = node.call_arguments();
    match message.as_str() {
        "render_cell" => mark_cell_action(cx, &arguments),
        "render" => {
            let state_name = arguments
                .first()
                .map(|first| first.hash_value("state").render_text())
                .unwrap_or_default();
            call_method(cx.tables, MethodTable::Controllers, &class_name, &state_name);
        }
        "helper_method" => {
            for argument in &arguments {
                cx.tables
                    .controller_methods
                    .mark_publicize(&class_name, &argument.render_text());
            }
        }
        "delegate" => {
            let Some((last, methods)) = arguments.split_last() else {
                return;
            };
            if last.is(&Kind::BareAssocHash) && last.hash_value("to").render_text() == "controller" {
                let controller = state
                    .classes
                    .current_module_name()
                    .replace("Helper", "Controller");
                for method in methods {
                    cx.tables
                        .controller_methods
                        .mark_publicize(&controller, &method.render_text());
                }
            }
        }
        other => mark_inherit_resources(state, other),
    }
}

fn report_unused(state: &State, cx: &mut Cx<'_>) {
    let routes = cx.tables.routes.all().to_vec();
    for route in routes {
        let controller = route.controller_name_with_namespaces();
        if route.action_name() == "*" {
            let actions: Vec<String> = cx
                .tables
                .controller_methods
                .get_methods(&controller, None)
                .into_iter()
                .map(|m| m.method_name.clone())
                .collect();
            for action in actions {
                call_method(cx.tables, MethodTable::Controllers, &controller, &action);
            }
        } else {
            call_method(cx.tables, MethodTable::Controllers, &controller, route.action_name());
        }
    }

    let unused: Vec<Method> = cx
        .tables
        .controller_methods
        .get_all_unused_methods(None)
        .into_iter()
        .filter(|method| !any_match(&state.ignored, &method.file))
        .filter(|method| {
            !state
                .except_methods
                .iter()
                .map(String::as_str)
                .chain(INTERNAL_EXCEPT_METHODS.iter().copied())
                .any(|entry| matches_exception(method, entry, &cx.tables.controllers))
        })
        .cloned()
        .collect();
    for method in unused {
        cx.add_error_at(
            format!(
                "remove unused methods ({}#{})",
                method.class_name, method.method_name
            ),
            method.file,
            method.line,
        );
    }
}

impl BuiltinCheck for RemoveUnusedMethodsInControllersReview {
    const NAME: &'static str = NAME;
    const STAGE: Stage = Stage::Review;

    fn configure(config: &CheckConfig) -> Self {
        Self::new().except_methods(config.get_str_array("except_methods"))
    }

    fn build(self, ignored: Vec<FilePattern>) -> CheckBox {
        let state = State {
            except_methods: self.except_methods,
            ignored: ignored.clone(),
            ..State::default()
        };
        callable(classable(Checker::builder(NAME)), MethodTable::Controllers)
            .url(URL)
            .interesting_kinds([Kind::Class, Kind::Command, Kind::Vcall, Kind::MethodAddArg, Kind::Assign])
            .interesting_files([
                builtin(&CONTROLLER_FILES),
                builtin(&VIEW_FILES),
                builtin(&HELPER_FILES),
            ])
            .ignored_files(ignored)
            .on_enter(Kind::Class, |state: &mut State, _, node| {
                let base = node.base_class().render_text();
                state
                    .inherited_resources
                    .push(base.trim_start_matches("::") == INHERITED_RESOURCES_BASE);
                Ok(())
            })
            .on_exit(Kind::Class, |state: &mut State, cx, _| {
                mark_inherited_resources(state, cx);
                Ok(())
            })
            .on_enter(Kind::Command, |state: &mut State, cx, node| {
                on_command(state, cx, node);
                Ok(())
            })
            .on_enter(Kind::Vcall, |state: &mut State, _, node| {
                mark_inherit_resources(state, &node.render_text());
                Ok(())
            })
            .on_enter(Kind::MethodAddArg, |state: &mut State, cx, node| {
                let arguments = node.call_arguments();
                match node.message().render_text().as_str() {
                    "render_cell" => mark_cell_action(cx, &arguments),
                    "render_state" => {
                        if let Some(action) = arguments.first() {
                            let class_name = state.classes.current_class_name();
                            call_method(cx.tables, MethodTable::Controllers, &class_name, &action.render_text());
                        }
                    }
                    _ => {}
                }
                Ok(())
            })
            .on_enter(Kind::Assign, |state: &mut State, cx, node| {
                let target = node.left_value();
                if target.is(&Kind::VarField) {
                    let class_name = state.classes.current_class_name();
                    let setter = format!("{}=", target.render_text());
                    call_method(cx.tables, MethodTable::Controllers, &class_name, &setter);
                }
                Ok(())
            })
            .after_check(|state: &mut State, cx| {
                report_unused(state, cx);
                Ok(())
            })
            .boxed(state)
    }
}

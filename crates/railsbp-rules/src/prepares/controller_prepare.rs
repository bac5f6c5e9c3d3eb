//! Collects controller classes and their methods.
//!
//! Controllers built on `inherited_resources` (subclasses of
//! `InheritedResources::Base`, or classes calling `inherit_resources`) get
//! the seven resource actions, narrowed by an `actions` declaration.

use crate::mixins::routable::RESOURCES_ACTIONS;
use crate::mixins::{accessable, classable, AccessScope, ClassScope, HasAccessScope, HasClassScope};
use crate::presets::{BuiltinCheck, Stage};
use railsbp_core::patterns::{builtin, CONTROLLER_FILES};
use railsbp_core::tables::Access;
use railsbp_core::{CheckBox, CheckConfig, Checker, FilePattern, Kind, NodeRef};

/// Check name.
pub const NAME: &str = "ControllerPrepare";

/// Superclass that makes a controller an inherited-resources controller.
pub const INHERITED_RESOURCES_BASE: &str = "InheritedResources::Base";

#[derive(Debug, Default)]
struct Frame {
    inherited_resources: bool,
    actions: Option<Vec<String>>,
}

#[derive(Debug, Default)]
struct State {
    classes: ClassScope,
    access: AccessScope,
    frames: Vec<Frame>,
}

impl HasClassScope for State {
    fn class_scope(&mut self) -> &mut ClassScope {
        &mut self.classes
    }
}

impl HasAccessScope for State {
    fn access_scope(&mut self) -> &mut AccessScope {
        &mut self.access
    }
}

/// Fills `controllers` and `controller_methods`.
#[derive(Debug, Clone, Default)]
pub struct ControllerPrepare;

impl ControllerPrepare {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Actions named by `actions :index, :show` or `actions :all, except: [...]`.
fn declared_actions(node: NodeRef<'_>) -> Vec<String> {
    let arguments = node.call_arguments();
    let names: Vec<String> = arguments
        .iter()
        .filter(|arg| !arg.is(&Kind::BareAssocHash))
        .map(|arg| arg.render_text())
        .collect();
    if names.iter().any(|n| n == "all") {
        let except = arguments
            .iter()
            .find(|arg| arg.is(&Kind::BareAssocHash))
            .map(|opts| opts.hash_value("except").string_list())
            .unwrap_or_default();
        RESOURCES_ACTIONS
            .iter()
            .map(ToString::to_string)
            .filter(|a| !except.contains(a))
            .collect()
    } else {
        names
    }
}

impl BuiltinCheck for ControllerPrepare {
    const NAME: &'static str = NAME;
    const STAGE: Stage = Stage::Prepare;

    fn configure(_config: &CheckConfig) -> Self {
        Self::new()
    }

    fn build(self, ignored: Vec<FilePattern>) -> CheckBox {
        accessable(classable(Checker::builder(NAME)))
            .interesting_kinds([Kind::Class, Kind::Def, Kind::Command, Kind::Vcall, Kind::VarRef])
            .interesting_files([builtin(&CONTROLLER_FILES)])
            .ignored_files(ignored)
            .on_enter(Kind::Class, |state: &mut State, cx, _| {
                let mut frame = Frame::default();
                if let Some(klass) = state.classes.current_class() {
                    frame.inherited_resources = klass.extend_class_name() == INHERITED_RESOURCES_BASE;
                    cx.tables.controllers.add_klass(klass.clone());
                }
                state.frames.push(frame);
                Ok(())
            })
            .on_enter(Kind::Def, |state: &mut State, cx, node| {
                let class_name = state.classes.current_class_name();
                let name = node.method_name();
                let file = cx.file().map(ToOwned::to_owned).unwrap_or_default();
                let line = name.line().unwrap_or(0);
                let access = state.access.current();
                cx.tables
                    .controller_methods
                    .add_method(&class_name, &name.render_text(), &file, line, access);
                Ok(())
            })
            .on_enter(Kind::Command, |state: &mut State, _, node| {
                if let Some(frame) = state.frames.last_mut() {
                    match node.message().render_text().as_str() {
                        "inherit_resources" => frame.inherited_resources = true,
                        "actions" => frame.actions = Some(declared_actions(node)),
                        _ => {}
                    }
                }
                Ok(())
            })
            .on_enter(Kind::Vcall, |state: &mut State, _, node| {
                if node.render_text() == "inherit_resources" {
                    if let Some(frame) = state.frames.last_mut() {
                        frame.inherited_resources = true;
                    }
                }
                Ok(())
            })
            .on_exit(Kind::Class, |state: &mut State, cx, _| {
                let frame = state.frames.pop().unwrap_or_default();
                if !frame.inherited_resources {
                    return Ok(());
                }
                let Some(klass) = state.classes.last_closed_class() else {
                    return Ok(());
                };
                let class_name = klass.to_s();
                let file = cx.file().map(ToOwned::to_owned).unwrap_or_default();
                let line = cx.line().unwrap_or(0);
                let actions = frame.actions.unwrap_or_else(|| {
                    RESOURCES_ACTIONS.iter().map(ToString::to_string).collect()
                });
                for action in actions {
                    cx.tables
                        .controller_methods
                        .add_method(&class_name, &action, &file, line, Access::Public);
                }
                Ok(())
            })
            .boxed(State::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        array, class, command, const_path, constant, def, label, module, options, program, sym,
        walk_box,
    };
    use railsbp_core::AnalysisContext;
    use serde_json::json;

    fn names(tables: &AnalysisContext, class: &str) -> Vec<String> {
        tables
            .controller_methods
            .get_methods(class, None)
            .into_iter()
            .map(|m| format!("{} {}", m.access, m.method_name))
            .collect()
    }

    #[test]
    fn records_namespaced_controller_methods() {
        let source = program(vec![module("Admin", vec![
            class("PostsController", Some(constant("ApplicationController", 2)), vec![
                def("index", vec![], 3),
                json!(["vcall", ["@ident", "private", [5, 4]]]),
                def("load_post", vec![], 6),
            ], 2),
        ], 1)]);
        let mut check = ControllerPrepare::new().build(Vec::new());
        let mut tables = AnalysisContext::new();
        walk_box(check.as_mut(), &source, "app/controllers/admin/posts_controller.rb", &mut tables);

        assert!(tables.controllers.include("Admin::PostsController"));
        assert_eq!(
            names(&tables, "Admin::PostsController"),
            vec!["public index", "private load_post"]
        );
    }

    #[test]
    fn inherited_resources_get_declared_actions() {
        let source = program(vec![
            class("PostsController", Some(const_path("InheritedResources", "Base", 1)), vec![
                command("actions", vec![
                    sym("all", 2),
                    options(vec![label("except", array(vec![sym("destroy", 2), sym("edit", 2)]), 2)]),
                ], 2),
            ], 1),
            class("CommentsController", Some(constant("ApplicationController", 5)), vec![
                json!(["vcall", ["@ident", "inherit_resources", [6, 2]]]),
                command("actions", vec![sym("index", 7), sym("show", 7)], 7),
            ], 5),
        ]);
        let mut check = ControllerPrepare::new().build(Vec::new());
        let mut tables = AnalysisContext::new();
        walk_box(check.as_mut(), &source, "app/controllers/posts_controller.rb", &mut tables);

        assert_eq!(
            names(&tables, "PostsController"),
            vec!["public index", "public show", "public new", "public create", "public update"]
        );
        assert_eq!(names(&tables, "CommentsController"), vec!["public index", "public show"]);
        assert_eq!(tables.controller_methods.get_method("PostsController", "index", None).unwrap().line, 1);
    }
}

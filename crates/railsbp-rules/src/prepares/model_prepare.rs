//! Collects model classes, methods, associations and attributes.
//!
//! Reads every class under `app/models`:
//!
//! - the class itself goes into `models`
//! - `def`, `scope`, `named_scope`, `alias` and `alias_method` into `model_methods`
//! - association macros (`belongs_to`, `has_many`, Mongoid `embeds_*`, ...)
//!   into `model_associations`, honoring `class_name:`
//! - Mongoid `field :name, type: String` and MongoMapper `key :name, String`
//!   into `model_attributes`

use crate::mixins::{accessable, classable, AccessScope, ClassScope, HasAccessScope, HasClassScope};
use crate::presets::{BuiltinCheck, Stage};
use railsbp_core::patterns::{builtin, MODEL_FILES};
use railsbp_core::tables::models::{COLLECTION_ASSOCIATIONS, SINGULAR_ASSOCIATIONS};
use railsbp_core::tables::Access;
use railsbp_core::{CheckBox, CheckConfig, Checker, Cx, FilePattern, Kind, NodeRef};

/// Check name.
pub const NAME: &str = "ModelPrepare";

const SCOPE_MACROS: &[&str] = &["scope", "named_scope"];

#[derive(Debug, Default)]
struct State {
    classes: ClassScope,
    access: AccessScope,
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

/// Fills the model tables.
#[derive(Debug, Clone, Default)]
pub struct ModelPrepare;

impl ModelPrepare {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn add_method(cx: &mut Cx<'_>, class_name: &str, name: NodeRef<'_>, access: Access) {
    let file = cx.file().map(ToOwned::to_owned).unwrap_or_default();
    let line = name.line().or_else(|| cx.line()).unwrap_or(0);
    cx.tables
        .model_methods
        .add_method(class_name, &name.render_text(), &file, line, access);
}

fn on_command(state: &mut State, cx: &mut Cx<'_>, node: NodeRef<'_>) {
    let class_name = state.classes.current_class_name();
    if class_name.is_empty() {
        return;
    }
    let message = node.message().render_text();
    let arguments = node.call_arguments();
    let first = arguments.first().copied().unwrap_or_default();
    let options = arguments
        .iter()
        .copied()
        .find(|arg| arg.is(&Kind::BareAssocHash))
        .unwrap_or_default();

    if SCOPE_MACROS.contains(&message.as_str()) || message == "alias_method" {
        add_method(cx, &class_name, first, state.access.current());
    } else if SINGULAR_ASSOCIATIONS.contains(&message.as_str())
        || COLLECTION_ASSOCIATIONS.contains(&message.as_str())
    {
        let class_option = options.hash_value("class_name").render_text();
        cx.tables.model_associations.add_association(
            &class_name,
            &first.render_text(),
            &message,
            Some(class_option.as_str()),
        );
    } else if message == "field" {
        let kind = options.hash_value("type").render_text();
        let kind = if kind.is_empty() { "String".to_string() } else { kind };
        cx.tables
            .model_attributes
            .add_attribute(&class_name, &first.render_text(), &kind);
    } else if message == "key" {
        let kind = arguments.get(1).copied().unwrap_or_default().render_text();
        cx.tables
            .model_attributes
            .add_attribute(&class_name, &first.render_text(), &kind);
    }
}

impl BuiltinCheck for ModelPrepare {
    const NAME: &'static str = NAME;
    const STAGE: Stage = Stage::Prepare;

    fn configure(_config: &CheckConfig) -> Self {
        Self::new()
    }

    fn build(self, ignored: Vec<FilePattern>) -> CheckBox {
        accessable(classable(Checker::builder(NAME)))
            .interesting_kinds([Kind::Class, Kind::Def, Kind::Defs, Kind::Command, Kind::Alias])
            .interesting_files([builtin(&MODEL_FILES)])
            .ignored_files(ignored)
            .on_enter(Kind::Class, |state: &mut State, cx, _| {
                if let Some(klass) = state.classes.current_class() {
                    cx.tables.models.add_klass(klass.clone());
                }
                Ok(())
            })
            .on_enter(Kind::Def, |state: &mut State, cx, node| {
                let class_name = state.classes.current_class_name();
                add_method(cx, &class_name, node.method_name(), state.access.current());
                Ok(())
            })
            .on_enter(Kind::Defs, |state: &mut State, cx, node| {
                let class_name = state.classes.current_class_name();
                add_method(cx, &class_name, node.method_name(), Access::Public);
                Ok(())
            })
            .on_enter(Kind::Alias, |state: &mut State, cx, node| {
                let class_name = state.classes.current_class_name();
                add_method(cx, &class_name, node.new_method(), state.access.current());
                Ok(())
            })
            .on_enter(Kind::Command, |state: &mut State, cx, node| {
                on_command(state, cx, node);
                Ok(())
            })
            .boxed(State::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        class, command, const_path, def, label, options, program, string, sym, walk_box,
    };
    use railsbp_core::AnalysisContext;
    use serde_json::json;

    #[test]
    fn records_models_methods_and_associations() {
        let source = program(vec![class("Post", Some(const_path("ActiveRecord", "Base", 1)), vec![
            command("belongs_to", vec![sym("user", 2)], 2),
            command("has_many", vec![sym("comments", 3)], 3),
            command("belongs_to", vec![
                sym("editor", 4),
                options(vec![label("class_name", string("User", 4), 4)]),
            ], 4),
            command("scope", vec![sym("published", 5), json!(["lambda", null, []])], 5),
            def("title", vec![], 6),
            json!(["vcall", ["@ident", "private", [8, 2]]]),
            def("slug", vec![], 9),
        ], 1)]);
        let mut check = ModelPrepare::new().build(Vec::new());
        let mut tables = AnalysisContext::new();
        walk_box(check.as_mut(), &source, "app/models/post.rb", &mut tables);

        assert!(tables.models.include("Post"));
        assert_eq!(tables.models.find("Post").unwrap().extend_class_name(), "ActiveRecord::Base");
        assert_eq!(tables.model_associations.get_association_class_name("Post", "user"), Some("User"));
        assert_eq!(tables.model_associations.get_association_class_name("Post", "editor"), Some("User"));
        assert!(tables.model_associations.has_many("Post", "comments"));
        assert!(tables.model_associations.belongs_to("Post", "editor"));

        let methods: Vec<(String, Access, usize)> = tables
            .model_methods
            .get_methods("Post", None)
            .into_iter()
            .map(|m| (m.method_name.clone(), m.access, m.line))
            .collect();
        assert_eq!(
            methods,
            vec![
                ("published".to_string(), Access::Public, 5),
                ("title".to_string(), Access::Public, 6),
                ("slug".to_string(), Access::Private, 9),
            ]
        );
    }

    #[test]
    fn records_mongoid_fields() {
        let source = program(vec![class("Post", None, vec![
            command("field", vec![sym("title", 2)], 2),
            command("field", vec![
                sym("views", 3),
                options(vec![label("type", json!(["var_ref", ["@const", "Integer", [3, 24]]]), 3)]),
            ], 3),
        ], 1)]);
        let mut check = ModelPrepare::new().build(Vec::new());
        let mut tables = AnalysisContext::new();
        walk_box(check.as_mut(), &source, "app/models/post.rb", &mut tables);
        assert_eq!(tables.model_attributes.get_attribute_type("Post", "title"), Some("String"));
        assert_eq!(tables.model_attributes.get_attribute_type("Post", "views"), Some("Integer"));
    }
}

//! Collects helper modules and their methods.

use crate::mixins::{accessable, classable, AccessScope, ClassScope, HasAccessScope, HasClassScope};
use crate::presets::{BuiltinCheck, Stage};
use railsbp_core::patterns::{builtin, HELPER_FILES};
use railsbp_core::{CheckBox, CheckConfig, Checker, FilePattern, Kind};

/// Check name.
pub const NAME: &str = "HelperPrepare";

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

/// Fills `helpers` and `helper_methods`.
#[derive(Debug, Clone, Default)]
pub struct HelperPrepare;

impl HelperPrepare {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl BuiltinCheck for HelperPrepare {
    const NAME: &'static str = NAME;
    const STAGE: Stage = Stage::Prepare;

    fn configure(_config: &CheckConfig) -> Self {
        Self::new()
    }

    fn build(self, ignored: Vec<FilePattern>) -> CheckBox {
        accessable(classable(Checker::builder(NAME)))
            .interesting_kinds([Kind::Module, Kind::Def])
            .interesting_files([builtin(&HELPER_FILES)])
            .ignored_files(ignored)
            .on_enter(Kind::Module, |state: &mut State, cx, _| {
                let mut namespace = state.classes.namespace();
                if let Some(name) = namespace.pop() {
                    cx.tables.helpers.add_module(&name, &namespace);
                }
                Ok(())
            })
            .on_enter(Kind::Def, |state: &mut State, cx, node| {
                let module_name = state.classes.current_module_name();
                let name = node.method_name();
                let file = cx.file().map(ToOwned::to_owned).unwrap_or_default();
                let line = name.line().unwrap_or(0);
                let access = state.access.current();
                cx.tables
                    .helper_methods
                    .add_method(&module_name, &name.render_text(), &file, line, access);
                Ok(())
            })
            .boxed(State::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{def, module, program, walk_box};
    use railsbp_core::AnalysisContext;

    #[test]
    fn records_nested_helper_modules() {
        let source = program(vec![module("Admin", vec![
            module("PostsHelper", vec![def("post_link", vec![], 3)], 2),
        ], 1)]);
        let mut check = HelperPrepare::new().build(Vec::new());
        let mut tables = AnalysisContext::new();
        walk_box(check.as_mut(), &source, "app/helpers/admin/posts_helper.rb", &mut tables);

        assert_eq!(tables.helpers.all(), &["Admin".to_string(), "Admin::PostsHelper".to_string()]);
        assert!(tables.helper_methods.has_method("Admin::PostsHelper", "post_link", None));
    }
}

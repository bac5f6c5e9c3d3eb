//! Records `config.x.y = value` assignments from application config.

use crate::presets::{BuiltinCheck, Stage};
use railsbp_core::patterns::{builtin, CONFIG_FILES};
use railsbp_core::{CheckBox, CheckConfig, Checker, FilePattern, Kind};

/// Check name.
pub const NAME: &str = "ConfigPrepare";

/// Fills `configs`, keyed without the leading `config.`.
#[derive(Debug, Clone, Default)]
pub struct ConfigPrepare;

impl ConfigPrepare {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl BuiltinCheck for ConfigPrepare {
    const NAME: &'static str = NAME;
    const STAGE: Stage = Stage::Prepare;

    fn configure(_config: &CheckConfig) -> Self {
        Self::new()
    }

    fn build(self, ignored: Vec<FilePattern>) -> CheckBox {
        Checker::builder(NAME)
            .interesting_kinds([Kind::Assign])
            .interesting_files([builtin(&CONFIG_FILES)])
            .ignored_files(ignored)
            .on_enter(Kind::Assign, |_: &mut (), cx, node| {
                let target = node.left_value();
                if !target.is(&Kind::Field) {
                    return Ok(());
                }
                let key = target.render_text();
                if let Some(key) = key.strip_prefix("config.") {
                    cx.tables
                        .configs
                        .add_config(key, &node.right_value().render_text());
                }
                Ok(())
            })
            .boxed(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{call, field_assign, ident, keyword, program, walk_box};
    use railsbp_core::AnalysisContext;
    use serde_json::json;

    #[test]
    fn records_nested_config_keys() {
        let config = json!(["var_ref", ident("config", 2)]);
        let source = program(vec![field_assign(
            call(config, "active_record", 2),
            "whitelist_attributes",
            keyword("true", 2),
            2,
        )]);
        let mut check = ConfigPrepare::new().build(Vec::new());
        let mut tables = AnalysisContext::new();
        walk_box(check.as_mut(), &source, "config/application.rb", &mut tables);
        assert_eq!(tables.configs.get("active_record.whitelist_attributes"), Some("true"));
    }
}

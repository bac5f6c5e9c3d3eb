//! Reads model attributes from `db/schema.rb`.
//!
//! Every `t.<type> "column"` inside `create_table "posts"` becomes an
//! attribute of `Post` with that type; `t.references :user` adds `user_id`
//! and `t.timestamps` adds `created_at`/`updated_at`.

use crate::presets::{BuiltinCheck, Stage};
use railsbp_core::patterns::{builtin, SCHEMA_FILE};
use railsbp_core::utils::classify;
use railsbp_core::{CheckBox, CheckConfig, Checker, FilePattern, Kind, NodeRef};

/// Check name.
pub const NAME: &str = "SchemaPrepare";

/// `t.` calls that are not column declarations.
const NON_COLUMNS: &[&str] = &["index", "timestamps", "references", "belongs_to"];

#[derive(Debug, Default)]
struct State {
    model: Option<String>,
}

/// Fills `model_attributes` from the schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaPrepare;

impl SchemaPrepare {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn is_create_table(node: NodeRef<'_>) -> bool {
    node.message().render_text() == "create_table"
}

/// Columns declared by one `t.<type>` call, with their types.
pub(crate) fn declared_columns(node: NodeRef<'_>) -> Vec<(String, String)> {
    let kind = node.message().render_text();
    let names: Vec<String> = node
        .call_arguments()
        .into_iter()
        .filter(|arg| !arg.is(&Kind::BareAssocHash))
        .map(NodeRef::render_text)
        .collect();
    match kind.as_str() {
        "timestamps" => vec![
            ("created_at".to_string(), "datetime".to_string()),
            ("updated_at".to_string(), "datetime".to_string()),
        ],
        "references" | "belongs_to" => names
            .into_iter()
            .map(|name| (format!("{name}_id"), "integer".to_string()))
            .collect(),
        k if NON_COLUMNS.contains(&k) => Vec::new(),
        _ => names.into_iter().map(|name| (name, kind.clone())).collect(),
    }
}

impl BuiltinCheck for SchemaPrepare {
    const NAME: &'static str = NAME;
    const STAGE: Stage = Stage::Prepare;

    fn configure(_config: &CheckConfig) -> Self {
        Self::new()
    }

    fn build(self, ignored: Vec<FilePattern>) -> CheckBox {
        Checker::builder(NAME)
            .interesting_kinds([Kind::MethodAddBlock, Kind::CommandCall])
            .interesting_files([builtin(&SCHEMA_FILE)])
            .ignored_files(ignored)
            .on_enter(Kind::MethodAddBlock, |state: &mut State, _, node| {
                if is_create_table(node) {
                    let table = node.call_arguments().first().copied().unwrap_or_default();
                    state.model = Some(classify(&table.render_text()));
                }
                Ok(())
            })
            .on_exit(Kind::MethodAddBlock, |state: &mut State, _, node| {
                if is_create_table(node) {
                    state.model = None;
                }
                Ok(())
            })
            .on_enter(Kind::CommandCall, |state: &mut State, cx, node| {
                if let Some(model) = &state.model {
                    for (column, kind) in declared_columns(node) {
                        cx.tables.model_attributes.add_attribute(model, &column, &kind);
                    }
                }
                Ok(())
            })
            .boxed(State::default())
    }
}

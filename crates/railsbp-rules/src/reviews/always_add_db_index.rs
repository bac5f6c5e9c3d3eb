//! Check for foreign key columns without an index.
//!
//! # Rationale
//!
//! Joins and association lookups filter on foreign keys. Without an index
//! every lookup scans the table.
//!
//! # Detected Patterns
//!
//! - An `*_id` column in `db/schema.rb` pointing at an existing table, with
//!   no index whose leading columns cover it
//! - A polymorphic `*_id`/`*_type` pair with no index covering both
//!
//! Indexes come from `add_index`, `t.index` and `t.references ..., index: true`.

use crate::prepares::schema_prepare::declared_columns;
use crate::presets::{BuiltinCheck, Stage};
use railsbp_core::patterns::{builtin, SCHEMA_FILE};
use railsbp_core::utils::{classify, pluralize, tableize};
use railsbp_core::{AnalysisContext, CheckBox, CheckConfig, Checker, FilePattern, Kind, NodeRef};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// Check name.
pub const NAME: &str = "AlwaysAddDbIndexCheck";

/// Reference for the practice.
pub const URL: &str = "https://rails-bestpractices.com/posts/2010/07/24/always-add-db-index/";

/// Column types a foreign key can have.
const KEY_TYPES: &[&str] = &["integer", "bigint", "string", "uuid"];

#[derive(Debug, Clone)]
struct Column {
    table: String,
    name: String,
    file: PathBuf,
    line: usize,
}

#[derive(Debug, Default)]
struct State {
    table: Option<String>,
    tables: HashSet<String>,
    columns: Vec<Column>,
    indexes: HashMap<String, Vec<Vec<String>>>,
}

impl State {
    fn add_index(&mut self, table: &str, columns: Vec<String>) {
        if !columns.is_empty() {
            self.indexes.entry(table.to_string()).or_default().push(columns);
        }
    }

    /// True if some index starts with exactly the columns of `key`, in any order.
    fn is_indexed(&self, table: &str, key: &[String]) -> bool {
        self.indexes.get(table).is_some_and(|indexes| {
            indexes.iter().any(|index| {
                index.len() >= key.len() && key.iter().all(|col| index[..key.len()].contains(col))
            })
        })
    }

    fn has_column(&self, table: &str, name: &str) -> bool {
        self.columns.iter().any(|c| c.table == table && c.name == name)
    }

    /// Table an `*_id` column points at, following declared associations.
    fn referenced_table(&self, tables: &AnalysisContext, table: &str, base: &str) -> String {
        tables
            .model_associations
            .get_association_class_name(&classify(table), base)
            .map_or_else(|| pluralize(base), |class| tableize(&class.replace("::", "")))
    }
}

/// Reports unindexed foreign keys.
#[derive(Debug, Clone, Default)]
pub struct AlwaysAddDbIndexReview;

impl AlwaysAddDbIndexReview {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn on_table_call(state: &mut State, file: PathBuf, node: NodeRef<'_>) {
    let Some(table) = state.table.clone() else {
        return;
    };
    let message = node.message().render_text();
    let arguments = node.call_arguments();
    if message == "index" {
        let columns = arguments.first().map(|a| a.string_list()).unwrap_or_default();
        state.add_index(&table, columns);
        return;
    }

    let options = arguments
        .iter()
        .copied()
        .find(|a| a.is(&Kind::BareAssocHash))
        .unwrap_or_default();
    let line = node.line().unwrap_or(0);
    let is_reference = message == "references" || message == "belongs_to";
    for (name, column_type) in declared_columns(node) {
        if !KEY_TYPES.contains(&column_type.as_str()) {
            continue;
        }
        if is_reference {
            let polymorphic = options.hash_value("polymorphic").render_text() == "true";
            let mut index = vec![name.clone()];
            if polymorphic {
                let type_column = format!("{}_type", name.trim_end_matches("_id"));
                index.push(type_column.clone());
                state.columns.push(Column {
                    table: table.clone(),
                    name: type_column,
                    file: file.clone(),
                    line,
                });
            }
            if options.hash_value("index").render_text() == "true" {
                state.add_index(&table, index);
            }
        }
        state.columns.push(Column {
            table: table.clone(),
            name,
            file: file.clone(),
            line,
        });
    }
}

fn report(state: &State, cx: &mut railsbp_core::Cx<'_>) {
    let mut findings = Vec::new();
    for column in &state.columns {
        let Some(base) = column.name.strip_suffix("_id") else {
            continue;
        };
        let type_column = format!("{base}_type");
        let key = if state.has_column(&column.table, &type_column) {
            vec![column.name.clone(), type_column]
        } else {
            let target = state.referenced_table(cx.tables, &column.table, base);
            if !state.tables.contains(&target) {
                continue;
            }
            vec![column.name.clone()]
        };
        if !state.is_indexed(&column.table, &key) {
            findings.push((
                format!("always add db index ({} => [{}])", column.table, key.join(", ")),
                column.file.clone(),
                column.line,
            ));
        }
    }
    for (message, file, line) in findings {
        cx.add_error_at(message, file, line);
    }
}

impl BuiltinCheck for AlwaysAddDbIndexReview {
    const NAME: &'static str = NAME;
    const STAGE: Stage = Stage::Review;

    fn configure(_config: &CheckConfig) -> Self {
        Self::new()
    }

    fn build(self, ignored: Vec<FilePattern>) -> CheckBox {
        Checker::builder(NAME)
            .url(URL)
            .interesting_kinds([Kind::Command, Kind::CommandCall])
            .interesting_files([builtin(&SCHEMA_FILE)])
            .ignored_files(ignored)
            .on_enter(Kind::Command, |state: &mut State, _, node| {
                let arguments = node.call_arguments();
                let table = arguments.first().map(|a| a.render_text()).unwrap_or_default();
                match node.message().render_text().as_str() {
                    "create_table" => {
                        state.tables.insert(table.clone());
                        state.table = Some(table);
                    }
                    "add_index" => {
                        let columns = arguments.get(1).map(|a| a.string_list()).unwrap_or_default();
                        state.add_index(&table, columns);
                    }
                    _ => {}
                }
                Ok(())
            })
            .on_enter(Kind::CommandCall, |state: &mut State, cx, node| {
                let file = cx.file().map(ToOwned::to_owned).unwrap_or_default();
                on_table_call(state, file, node);
                Ok(())
            })
            .after_check(|state: &mut State, cx| {
                report(state, cx);
                Ok(())
            })
            .boxed(State::default())
    }
}

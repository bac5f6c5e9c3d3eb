//! Tree and text dispatchers.

use crate::analyzer::AnalyzeError;
use crate::checker::{CheckBox, CheckError};
use crate::context::AnalysisContext;
use crate::kind::Kind;
use crate::node::SyntaxNode;
use crate::query::NodeRef;
use crate::types::Diagnostic;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

fn dispatch_error(file: &Path, line: Option<usize>, check: &str, source: CheckError) -> AnalyzeError {
    AnalyzeError::Dispatch {
        file: file.to_path_buf(),
        line: line.unwrap_or(0),
        check: check.to_string(),
        source,
    }
}

/// Walks trees depth-first and fires enter/exit callbacks of interested checks.
pub struct TreeDispatcher {
    checks: Vec<CheckBox>,
    index: HashMap<Kind, Vec<usize>>,
}

impl TreeDispatcher {
    /// Indexes `checks` by their interesting kinds.
    #[must_use]
    pub fn new(checks: Vec<CheckBox>) -> Self {
        let mut index: HashMap<Kind, Vec<usize>> = HashMap::new();
        for (i, check) in checks.iter().enumerate() {
            for kind in check.interesting_kinds() {
                index.entry(kind.clone()).or_default().push(i);
            }
        }
        Self { checks, index }
    }

    /// Number of checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// True when there is nothing to dispatch to.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Dispatches one file's tree.
    ///
    /// A file path stored on a node takes precedence over `file` for that
    /// node's subtree, and decides which checks see the subtree.
    ///
    /// # Errors
    ///
    /// Returns the first callback failure, tagged with the file and line of
    /// the node being visited.
    pub fn dispatch(
        &mut self,
        root: &SyntaxNode,
        file: &Path,
        tables: &mut AnalysisContext,
    ) -> Result<(), AnalyzeError> {
        let file = root.file().unwrap_or(file);
        let active = self.active_for(file);
        debug!(file = %file.display(), "dispatching");
        self.visit(NodeRef::from(root), file, &active, tables)
    }

    fn active_for(&self, file: &Path) -> Vec<bool> {
        self.checks.iter().map(|c| c.parse_file(file)).collect()
    }

    fn visit(
        &mut self,
        node: NodeRef<'_>,
        file: &Path,
        active: &[bool],
        tables: &mut AnalysisContext,
    ) -> Result<(), AnalyzeError> {
        let Some(inner) = node.get() else {
            return Ok(());
        };
        let own_file = inner.file().filter(|own| *own != file);
        let own_active = own_file.map(|own| self.active_for(own));
        let file = own_file.unwrap_or(file);
        let active = own_active.as_deref().unwrap_or(active);
        let interested: Vec<usize> = self
            .index
            .get(inner.kind())
            .map(|ids| ids.iter().copied().filter(|&i| active[i]).collect())
            .unwrap_or_default();

        for &i in &interested {
            let check = &mut self.checks[i];
            check
                .node_start(node, file, tables)
                .map_err(|e| dispatch_error(file, node.line(), check.name(), e))?;
        }
        for child in node.children() {
            self.visit(child, file, active, tables)?;
        }
        for &i in &interested {
            let check = &mut self.checks[i];
            check
                .node_end(node, file, tables)
                .map_err(|e| dispatch_error(file, node.line(), check.name(), e))?;
        }
        Ok(())
    }

    /// Runs every check's `after_check` hook.
    ///
    /// # Errors
    ///
    /// Returns the first hook failure.
    pub fn after_check(&mut self, tables: &mut AnalysisContext) -> Result<(), AnalyzeError> {
        after_check(&mut self.checks, tables)
    }

    /// Drains diagnostics from every check.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        take_diagnostics(&mut self.checks)
    }

    /// Gives the checks back.
    #[must_use]
    pub fn into_checks(self) -> Vec<CheckBox> {
        self.checks
    }
}

/// Hands raw file text to text checks.
pub struct TextDispatcher {
    checks: Vec<CheckBox>,
}

impl TextDispatcher {
    /// Wraps text checks.
    #[must_use]
    pub fn new(checks: Vec<CheckBox>) -> Self {
        Self { checks }
    }

    /// Runs every interested check on one file.
    ///
    /// # Errors
    ///
    /// Returns the first callback failure, tagged with the file.
    pub fn dispatch(
        &mut self,
        file: &Path,
        content: &str,
        tables: &mut AnalysisContext,
    ) -> Result<(), AnalyzeError> {
        for check in &mut self.checks {
            if !check.parse_file(file) {
                continue;
            }
            check
                .check_text(file, content, tables)
                .map_err(|e| dispatch_error(file, None, check.name(), e))?;
        }
        Ok(())
    }

    /// Runs every check's `after_check` hook.
    ///
    /// # Errors
    ///
    /// Returns the first hook failure.
    pub fn after_check(&mut self, tables: &mut AnalysisContext) -> Result<(), AnalyzeError> {
        after_check(&mut self.checks, tables)
    }

    /// Drains diagnostics from every check.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        take_diagnostics(&mut self.checks)
    }
}

fn after_check(checks: &mut [CheckBox], tables: &mut AnalysisContext) -> Result<(), AnalyzeError> {
    for check in checks {
        check
            .after_check(tables)
            .map_err(|source| AnalyzeError::AfterCheck {
                check: check.name().to_string(),
                source,
            })?;
    }
    Ok(())
}

fn take_diagnostics(checks: &mut [CheckBox]) -> Vec<Diagnostic> {
    checks
        .iter_mut()
        .flat_map(|check| check.take_diagnostics())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::Checker;
    use crate::node::Slot;
    use crate::patterns::FilePattern;
    use serde_json::json;

    fn tree() -> SyntaxNode {
        SyntaxNode::from_json(&json!([
            "program",
            [[
                "class",
                ["const_ref", ["@const", "Post", [1, 6]]],
                null,
                ["bodystmt", [
                    ["def", ["@ident", "title", [2, 6]], ["params", null, null, null, null, null, null, null],
                        ["bodystmt", [["void_stmt"]], null, null, null]]
                ], null, null, null]
            ]]
        ]))
        .unwrap()
    }

    type Log = Vec<String>;

    fn logging_check(name: &'static str) -> CheckBox {
        Checker::builder(name)
            .interesting_kinds([Kind::Class, Kind::Def])
            .interesting_files([FilePattern::All])
            .on_enter(Kind::Class, move |log: &mut Log, _, node| {
                log.push(format!("{name} enter {}", node.class_name().render_text()));
                Ok(())
            })
            .on_exit(Kind::Class, move |log: &mut Log, cx, _| {
                log.push(format!("{name} exit class"));
                cx.add_error(log.join(";"));
                Ok(())
            })
            .on_enter(Kind::Def, move |log: &mut Log, _, node| {
                log.push(format!("{name} enter {}", node.method_name().render_text()));
                Ok(())
            })
            .boxed(Vec::new())
    }

    #[test]
    fn enter_before_descendants_exit_after() {
        let mut dispatcher = TreeDispatcher::new(vec![logging_check("A")]);
        let mut tables = AnalysisContext::new();
        dispatcher
            .dispatch(&tree(), Path::new("app/models/post.rb"), &mut tables)
            .unwrap();
        let diagnostics = dispatcher.take_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "A enter Post;A enter title;A exit class");
        assert_eq!(diagnostics[0].first_line_number(), 1);
    }

    #[test]
    fn uninterested_files_are_skipped() {
        let check = Checker::builder("ModelOnly")
            .interesting_kinds([Kind::Def])
            .interesting_files([FilePattern::regex(r"app/models/").unwrap()])
            .on_enter(Kind::Def, |_: &mut (), cx, _| {
                cx.add_error("def");
                Ok(())
            })
            .boxed(());
        let mut dispatcher = TreeDispatcher::new(vec![check]);
        let mut tables = AnalysisContext::new();
        dispatcher
            .dispatch(&tree(), Path::new("lib/post.rb"), &mut tables)
            .unwrap();
        assert!(dispatcher.take_diagnostics().is_empty());
    }

    #[test]
    fn node_file_overrides_dispatch_path() {
        let check = Checker::builder("Where")
            .interesting_kinds([Kind::Def])
            .interesting_files([FilePattern::All])
            .on_enter(Kind::Def, |_: &mut (), cx, _| {
                cx.add_error("here");
                Ok(())
            })
            .boxed(());
        let mut dispatcher = TreeDispatcher::new(vec![check]);
        let mut tables = AnalysisContext::new();
        let root = tree().with_file("app/models/real.rb");
        dispatcher
            .dispatch(&root, Path::new("ignored.rb"), &mut tables)
            .unwrap();
        let diagnostics = dispatcher.take_diagnostics();
        assert_eq!(diagnostics[0].to_string(), "app/models/real.rb:2 - here");
    }

    #[test]
    fn nested_file_selects_checks_for_its_subtree() {
        let check = Checker::builder("ModelOnly")
            .interesting_kinds([Kind::Def])
            .interesting_files([FilePattern::regex(r"app/models/").unwrap()])
            .on_enter(Kind::Def, |_: &mut (), cx, _| {
                cx.add_error("def");
                Ok(())
            })
            .boxed(());
        let mut dispatcher = TreeDispatcher::new(vec![check]);
        let mut tables = AnalysisContext::new();
        let root = SyntaxNode::new(
            Kind::Program,
            vec![
                Slot::Node(tree()),
                Slot::Node(tree().with_file("app/models/post.rb")),
            ],
        );
        dispatcher
            .dispatch(&root, Path::new("lib/bundle.rb"), &mut tables)
            .unwrap();
        let diagnostics: Vec<String> = dispatcher
            .take_diagnostics()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(diagnostics, vec!["app/models/post.rb:2 - def"]);
    }

    #[test]
    fn after_check_failure_names_the_check() {
        let failing = Checker::builder("Summary")
            .interesting_kinds([Kind::Def])
            .interesting_files([FilePattern::All])
            .after_check(|_: &mut (), _| Err(CheckError::msg("no tables")))
            .boxed(());
        let mut dispatcher = TreeDispatcher::new(vec![failing]);
        let mut tables = AnalysisContext::new();
        let err = dispatcher.after_check(&mut tables).unwrap_err();
        assert!(matches!(err, AnalyzeError::AfterCheck { ref check, .. } if check == "Summary"));
        assert_eq!(err.to_string(), "Summary failed after the last file: no tables");
    }

    #[test]
    fn callback_failure_aborts_with_location() {
        let failing = Checker::builder("Boom")
            .interesting_kinds([Kind::Def])
            .interesting_files([FilePattern::All])
            .on_enter(Kind::Def, |_: &mut (), _, _| Err(CheckError::msg("bad def")))
            .boxed(());
        let mut dispatcher = TreeDispatcher::new(vec![failing, logging_check("B")]);
        let mut tables = AnalysisContext::new();
        let err = dispatcher
            .dispatch(&tree(), Path::new("app/models/post.rb"), &mut tables)
            .unwrap_err();
        match err {
            AnalyzeError::Dispatch { file, line, check, .. } => {
                assert_eq!(file, Path::new("app/models/post.rb"));
                assert_eq!(line, 2);
                assert_eq!(check, "Boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

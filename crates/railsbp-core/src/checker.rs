//! Check trait and the callback-based [`Checker`] used to build checks.
//!
//! A check declares the node kinds and file paths it is interested in and
//! registers callbacks for entering and leaving nodes of those kinds:
//!
//! ```ignore
//! let check = Checker::builder("CountDefsCheck")
//!     .interesting_kinds([Kind::Def])
//!     .interesting_files([FilePattern::All])
//!     .on_enter(Kind::Def, |count: &mut usize, _cx, _node| {
//!         *count += 1;
//!         Ok(())
//!     })
//!     .build(0);
//! ```
//!
//! Declarations accumulate: calling `interesting_kinds` twice appends. Several
//! callbacks may be registered for the same `(phase, kind)`; they run in
//! registration order.

use crate::context::AnalysisContext;
use crate::kind::Kind;
use crate::patterns::{any_match, FilePattern, PatternError};
use crate::query::NodeRef;
use crate::types::Diagnostic;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// When a node callback fires relative to the node's descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Before any descendant is visited.
    Enter,
    /// After every descendant was visited.
    Exit,
}

/// Callback table key.
pub type EventKey = (Phase, Kind);

/// Error raised by a check callback. Aborts the run.
#[derive(Debug, Error)]
pub enum CheckError {
    /// A check-specific failure.
    #[error("{0}")]
    Message(String),

    /// A pattern built at callback time was invalid.
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

impl CheckError {
    /// Creates a message error.
    #[must_use]
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// What a callback sees besides its own state.
pub struct Cx<'a> {
    /// Symbol tables of the current run.
    pub tables: &'a mut AnalysisContext,
    file: Option<&'a Path>,
    line: Option<usize>,
    check: &'a str,
    url: Option<&'a str>,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> Cx<'a> {
    /// File being dispatched, if any.
    #[must_use]
    pub fn file(&self) -> Option<&'a Path> {
        self.file
    }

    /// Line of the node being visited, if known.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Name of the running check.
    #[must_use]
    pub fn check_name(&self) -> &str {
        self.check
    }

    /// Reports a diagnostic at the current file and node line.
    pub fn add_error(&mut self, message: impl Into<String>) {
        let file = self.file.map(Path::to_path_buf).unwrap_or_default();
        let line = self.line.unwrap_or(0);
        self.add_error_at(message, file, line);
    }

    /// Reports a diagnostic at an explicit file and line.
    pub fn add_error_at(&mut self, message: impl Into<String>, file: impl Into<PathBuf>, line: usize) {
        self.diagnostics.push(
            Diagnostic::new(file, line, message, self.check).with_url(self.url),
        );
    }

    /// Reports a diagnostic covering several lines.
    pub fn add_error_lines(
        &mut self,
        message: impl Into<String>,
        file: impl Into<PathBuf>,
        lines: Vec<usize>,
    ) {
        self.diagnostics.push(
            Diagnostic::new(file, 0, message, self.check)
                .with_lines(lines)
                .with_url(self.url),
        );
    }
}

/// A check the dispatchers can drive.
///
/// Most checks are built with [`Checker::builder`]; implement this trait
/// directly only for checks that need full control.
pub trait Check: Send {
    /// Check name as used in configuration and suppression directives.
    fn name(&self) -> &str;

    /// Reference explaining the practice.
    fn url(&self) -> Option<&str> {
        None
    }

    /// Node kinds this check wants callbacks for.
    fn interesting_kinds(&self) -> &[Kind];

    /// Returns true if this check runs on `path`.
    fn parse_file(&self, path: &Path) -> bool;

    /// Returns true if this check reads raw file text.
    fn is_text_check(&self) -> bool {
        false
    }

    /// Called when entering a node of an interesting kind.
    ///
    /// # Errors
    ///
    /// Propagates callback failures.
    fn node_start(
        &mut self,
        node: NodeRef<'_>,
        file: &Path,
        tables: &mut AnalysisContext,
    ) -> Result<(), CheckError>;

    /// Called when leaving a node of an interesting kind.
    ///
    /// # Errors
    ///
    /// Propagates callback failures.
    fn node_end(
        &mut self,
        node: NodeRef<'_>,
        file: &Path,
        tables: &mut AnalysisContext,
    ) -> Result<(), CheckError>;

    /// Called with the raw content of each file (text checks only).
    ///
    /// # Errors
    ///
    /// Propagates callback failures.
    fn check_text(
        &mut self,
        _file: &Path,
        _content: &str,
        _tables: &mut AnalysisContext,
    ) -> Result<(), CheckError> {
        Ok(())
    }

    /// Called once after every file of the phase was dispatched.
    ///
    /// # Errors
    ///
    /// Propagates callback failures.
    fn after_check(&mut self, _tables: &mut AnalysisContext) -> Result<(), CheckError> {
        Ok(())
    }

    /// Diagnostics reported so far.
    fn diagnostics(&self) -> &[Diagnostic];

    /// Drains reported diagnostics.
    fn take_diagnostics(&mut self) -> Vec<Diagnostic>;
}

/// Boxed check.
pub type CheckBox = Box<dyn Check>;

type NodeCallback<S> =
    Box<dyn Fn(&mut S, &mut Cx<'_>, NodeRef<'_>) -> Result<(), CheckError> + Send + Sync>;
type TextCallback<S> = Box<dyn Fn(&mut S, &mut Cx<'_>, &str) -> Result<(), CheckError> + Send + Sync>;
type AfterCallback<S> = Box<dyn Fn(&mut S, &mut Cx<'_>) -> Result<(), CheckError> + Send + Sync>;

/// A check made of declarations, callbacks and state `S`.
pub struct Checker<S> {
    name: String,
    url: Option<String>,
    kinds: Vec<Kind>,
    files: Vec<FilePattern>,
    ignored: Vec<FilePattern>,
    callbacks: HashMap<EventKey, Vec<NodeCallback<S>>>,
    text_callbacks: Vec<TextCallback<S>>,
    after_callbacks: Vec<AfterCallback<S>>,
    state: S,
    diagnostics: Vec<Diagnostic>,
}

impl<S> std::fmt::Debug for Checker<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checker")
            .field("name", &self.name)
            .field("kinds", &self.kinds)
            .field("diagnostics", &self.diagnostics.len())
            .finish_non_exhaustive()
    }
}

impl<S: Send + 'static> Checker<S> {
    /// Starts building a check.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> CheckerBuilder<S> {
        CheckerBuilder::new(name)
    }

    /// The check's state.
    #[must_use]
    pub fn state(&self) -> &S {
        &self.state
    }

    fn fire(
        &mut self,
        phase: Phase,
        node: NodeRef<'_>,
        file: &Path,
        tables: &mut AnalysisContext,
    ) -> Result<(), CheckError> {
        let Some(kind) = node.kind() else {
            return Ok(());
        };
        let Some(callbacks) = self.callbacks.get(&(phase, kind.clone())) else {
            return Ok(());
        };
        let mut cx = Cx {
            tables,
            file: Some(file),
            line: node.line(),
            check: &self.name,
            url: self.url.as_deref(),
            diagnostics: &mut self.diagnostics,
        };
        for callback in callbacks {
            callback(&mut self.state, &mut cx, node)?;
        }
        Ok(())
    }
}

impl<S: Send + 'static> Check for Checker<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn interesting_kinds(&self) -> &[Kind] {
        &self.kinds
    }

    fn parse_file(&self, path: &Path) -> bool {
        any_match(&self.files, path) && !any_match(&self.ignored, path)
    }

    fn is_text_check(&self) -> bool {
        !self.text_callbacks.is_empty()
    }

    fn node_start(
        &mut self,
        node: NodeRef<'_>,
        file: &Path,
        tables: &mut AnalysisContext,
    ) -> Result<(), CheckError> {
        self.fire(Phase::Enter, node, file, tables)
    }

    fn node_end(
        &mut self,
        node: NodeRef<'_>,
        file: &Path,
        tables: &mut AnalysisContext,
    ) -> Result<(), CheckError> {
        self.fire(Phase::Exit, node, file, tables)
    }

    fn check_text(
        &mut self,
        file: &Path,
        content: &str,
        tables: &mut AnalysisContext,
    ) -> Result<(), CheckError> {
        let mut cx = Cx {
            tables,
            file: Some(file),
            line: None,
            check: &self.name,
            url: self.url.as_deref(),
            diagnostics: &mut self.diagnostics,
        };
        for callback in &self.text_callbacks {
            callback(&mut self.state, &mut cx, content)?;
        }
        Ok(())
    }

    fn after_check(&mut self, tables: &mut AnalysisContext) -> Result<(), CheckError> {
        let mut cx = Cx {
            tables,
            file: None,
            line: None,
            check: &self.name,
            url: self.url.as_deref(),
            diagnostics: &mut self.diagnostics,
        };
        for callback in &self.after_callbacks {
            callback(&mut self.state, &mut cx)?;
        }
        Ok(())
    }

    fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

/// Builder for [`Checker`].
pub struct CheckerBuilder<S> {
    name: String,
    url: Option<String>,
    kinds: Vec<Kind>,
    files: Vec<FilePattern>,
    ignored: Vec<FilePattern>,
    callbacks: HashMap<EventKey, Vec<NodeCallback<S>>>,
    text_callbacks: Vec<TextCallback<S>>,
    after_callbacks: Vec<AfterCallback<S>>,
}

impl<S: Send + 'static> CheckerBuilder<S> {
    /// Creates a builder for a check called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
            kinds: Vec::new(),
            files: Vec::new(),
            ignored: Vec::new(),
            callbacks: HashMap::new(),
            text_callbacks: Vec::new(),
            after_callbacks: Vec::new(),
        }
    }

    /// Sets the reference URL.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Adds interesting node kinds.
    #[must_use]
    pub fn interesting_kinds(mut self, kinds: impl IntoIterator<Item = Kind>) -> Self {
        for kind in kinds {
            if !self.kinds.contains(&kind) {
                self.kinds.push(kind);
            }
        }
        self
    }

    /// Adds interesting file patterns.
    #[must_use]
    pub fn interesting_files(mut self, patterns: impl IntoIterator<Item = FilePattern>) -> Self {
        self.files.extend(patterns);
        self
    }

    /// Adds patterns of files this check must skip.
    #[must_use]
    pub fn ignored_files(mut self, patterns: impl IntoIterator<Item = FilePattern>) -> Self {
        self.ignored.extend(patterns);
        self
    }

    /// Registers a callback fired when entering nodes of `kind`.
    #[must_use]
    pub fn on_enter<F>(self, kind: Kind, callback: F) -> Self
    where
        F: Fn(&mut S, &mut Cx<'_>, NodeRef<'_>) -> Result<(), CheckError> + Send + Sync + 'static,
    {
        self.on(Phase::Enter, kind, callback)
    }

    /// Registers a callback fired when leaving nodes of `kind`.
    #[must_use]
    pub fn on_exit<F>(self, kind: Kind, callback: F) -> Self
    where
        F: Fn(&mut S, &mut Cx<'_>, NodeRef<'_>) -> Result<(), CheckError> + Send + Sync + 'static,
    {
        self.on(Phase::Exit, kind, callback)
    }

    /// Registers a node callback for an explicit phase.
    #[must_use]
    pub fn on<F>(mut self, phase: Phase, kind: Kind, callback: F) -> Self
    where
        F: Fn(&mut S, &mut Cx<'_>, NodeRef<'_>) -> Result<(), CheckError> + Send + Sync + 'static,
    {
        self.callbacks
            .entry((phase, kind))
            .or_default()
            .push(Box::new(callback));
        self
    }

    /// Registers a raw-text callback, making this a text check.
    #[must_use]
    pub fn on_text<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut S, &mut Cx<'_>, &str) -> Result<(), CheckError> + Send + Sync + 'static,
    {
        self.text_callbacks.push(Box::new(callback));
        self
    }

    /// Registers a callback run once after all files of the phase.
    #[must_use]
    pub fn after_check<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut S, &mut Cx<'_>) -> Result<(), CheckError> + Send + Sync + 'static,
    {
        self.after_callbacks.push(Box::new(callback));
        self
    }

    /// Finishes the check with its initial state.
    #[must_use]
    pub fn build(self, state: S) -> Checker<S> {
        Checker {
            name: self.name,
            url: self.url,
            kinds: self.kinds,
            files: self.files,
            ignored: self.ignored,
            callbacks: self.callbacks,
            text_callbacks: self.text_callbacks,
            after_callbacks: self.after_callbacks,
            state,
            diagnostics: Vec::new(),
        }
    }

    /// Finishes the check and boxes it.
    #[must_use]
    pub fn boxed(self, state: S) -> CheckBox {
        Box::new(self.build(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::SyntaxNode;
    use serde_json::json;

    fn def_node() -> SyntaxNode {
        SyntaxNode::from_json(&json!([
            "def",
            ["@ident", "index", [4, 6]],
            ["params", null, null, null, null, null, null, null],
            ["bodystmt", [["void_stmt"]], null, null, null]
        ]))
        .unwrap()
    }

    #[test]
    fn declarations_accumulate() {
        let check = Checker::<()>::builder("X")
            .interesting_kinds([Kind::Def])
            .interesting_kinds([Kind::Class, Kind::Def])
            .interesting_files([crate::patterns::builtin(&crate::patterns::MODEL_FILES)])
            .interesting_files([crate::patterns::builtin(&crate::patterns::CONTROLLER_FILES)])
            .build(());
        assert_eq!(check.interesting_kinds(), &[Kind::Def, Kind::Class]);
        assert!(check.parse_file(Path::new("app/models/post.rb")));
        assert!(check.parse_file(Path::new("app/controllers/posts_controller.rb")));
        assert!(!check.parse_file(Path::new("config/routes.rb")));
    }

    #[test]
    fn empty_declarations_match_nothing() {
        let check = Checker::<()>::builder("X").build(());
        assert!(check.interesting_kinds().is_empty());
        assert!(!check.parse_file(Path::new("app/models/post.rb")));
    }

    #[test]
    fn ignored_files_win() {
        let check = Checker::<()>::builder("X")
            .interesting_files([FilePattern::All])
            .ignored_files([FilePattern::regex("legacy").unwrap()])
            .build(());
        assert!(check.parse_file(Path::new("app/models/post.rb")));
        assert!(!check.parse_file(Path::new("app/models/legacy/post.rb")));
    }

    #[test]
    fn callbacks_run_in_registration_order() {
        let mut check = Checker::builder("OrderCheck")
            .interesting_kinds([Kind::Def])
            .on_enter(Kind::Def, |log: &mut Vec<&'static str>, _, _| {
                log.push("enter-1");
                Ok(())
            })
            .on_enter(Kind::Def, |log: &mut Vec<&'static str>, _, _| {
                log.push("enter-2");
                Ok(())
            })
            .on_exit(Kind::Def, |log: &mut Vec<&'static str>, _, _| {
                log.push("exit");
                Ok(())
            })
            .build(Vec::new());
        let node = def_node();
        let mut tables = AnalysisContext::new();
        let file = Path::new("app/models/post.rb");
        check.node_start(NodeRef::from(&node), file, &mut tables).unwrap();
        check.node_end(NodeRef::from(&node), file, &mut tables).unwrap();
        assert_eq!(check.state(), &vec!["enter-1", "enter-2", "exit"]);
    }

    #[test]
    fn add_error_defaults_to_current_node() {
        let mut check = Checker::builder("DefCheck")
            .url("https://example.org/def")
            .interesting_kinds([Kind::Def])
            .on_enter(Kind::Def, |_: &mut (), cx, node| {
                cx.add_error(format!("found {}", node.method_name().render_text()));
                cx.add_error_at("elsewhere", "config/routes.rb", 1);
                Ok(())
            })
            .build(());
        let node = def_node();
        let mut tables = AnalysisContext::new();
        check
            .node_start(NodeRef::from(&node), Path::new("app/models/post.rb"), &mut tables)
            .unwrap();
        let diagnostics = check.take_diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].to_string(), "app/models/post.rb:4 - found index");
        assert_eq!(diagnostics[0].check, "DefCheck");
        assert_eq!(diagnostics[0].url.as_deref(), Some("https://example.org/def"));
        assert_eq!(diagnostics[1].to_string(), "config/routes.rb:1 - elsewhere");
        assert!(check.diagnostics().is_empty());
    }

    #[test]
    fn callback_errors_propagate() {
        let mut check = Checker::builder("FailCheck")
            .interesting_kinds([Kind::Def])
            .on_enter(Kind::Def, |_: &mut (), _, _| Err(CheckError::msg("boom")))
            .build(());
        let node = def_node();
        let mut tables = AnalysisContext::new();
        let err = check
            .node_start(NodeRef::from(&node), Path::new("a.rb"), &mut tables)
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn text_callbacks_make_text_checks() {
        let mut check = Checker::builder("LinesCheck")
            .interesting_files([FilePattern::All])
            .on_text(|_: &mut (), cx, content| {
                cx.add_error_at(format!("{} lines", content.lines().count()), "a.rb", 1);
                Ok(())
            })
            .build(());
        assert!(check.is_text_check());
        let mut tables = AnalysisContext::new();
        check
            .check_text(Path::new("a.rb"), "a\nb\n", &mut tables)
            .unwrap();
        assert_eq!(check.diagnostics()[0].message, "2 lines");
    }
}

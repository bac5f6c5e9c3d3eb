//! Core analyzer orchestrating the lexical, prepare and review phases.

use crate::checker::{Check, CheckBox, CheckError};
use crate::config::{Config, ConfigError};
use crate::context::AnalysisContext;
use crate::dispatch::{TextDispatcher, TreeDispatcher};
use crate::patterns::{
    normalized, PatternError, HELPER_FILES, MAILER_FILES, MIGRATION_FILES, MODEL_FILES,
    PROJECT_FILES,
};
use crate::source::{ParsedSource, Parser, SourceFile};
use crate::suppress::InlineDisables;
use crate::types::{Diagnostic, LintResult};

use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The parser rejected a file.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// A check callback failed; the run is aborted.
    #[error("{check} failed at {}:{line}: {source}", file.display())]
    Dispatch {
        /// File being dispatched.
        file: PathBuf,
        /// Line of the node being visited (0 when unknown).
        line: usize,
        /// Failing check.
        check: String,
        /// Callback error.
        source: CheckError,
    },

    /// An `after_check` hook failed; the run is aborted.
    #[error("{check} failed after the last file: {source}")]
    AfterCheck {
        /// Failing check.
        check: String,
        /// Hook error.
        source: CheckError,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid exclusion or interest pattern.
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] PatternError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    lexicals: Vec<CheckBox>,
    prepares: Vec<CheckBox>,
    reviews: Vec<CheckBox>,
    exclude_patterns: Vec<String>,
    only_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: Option<bool>,
    revisit_migrations: Option<bool>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a lexical (raw text) check.
    #[must_use]
    pub fn lexical<C: Check + 'static>(mut self, check: C) -> Self {
        self.lexicals.push(Box::new(check));
        self
    }

    /// Adds a boxed lexical check.
    #[must_use]
    pub fn lexical_box(mut self, check: CheckBox) -> Self {
        self.lexicals.push(check);
        self
    }

    /// Adds a prepare check (symbol-table builder).
    #[must_use]
    pub fn prepare<C: Check + 'static>(mut self, check: C) -> Self {
        self.prepares.push(Box::new(check));
        self
    }

    /// Adds a boxed prepare check.
    #[must_use]
    pub fn prepare_box(mut self, check: CheckBox) -> Self {
        self.prepares.push(check);
        self
    }

    /// Adds a review check.
    #[must_use]
    pub fn review<C: Check + 'static>(mut self, check: C) -> Self {
        self.reviews.push(Box::new(check));
        self
    }

    /// Adds a boxed review check.
    #[must_use]
    pub fn review_box(mut self, check: CheckBox) -> Self {
        self.reviews.push(check);
        self
    }

    /// Adds an exclusion regex.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclusion regexes.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Restricts analysis to files matching this regex.
    #[must_use]
    pub fn only(mut self, pattern: impl Into<String>) -> Self {
        self.only_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether to fail on parse errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = Some(fail);
        self
    }

    /// Sets whether migrations are dispatched twice during prepare.
    #[must_use]
    pub fn revisit_migrations(mut self, revisit: bool) -> Self {
        self.revisit_migrations = Some(revisit);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if an exclusion pattern is not a valid regex.
    pub fn build(self) -> Result<Analyzer, AnalyzeError> {
        let config = self.config.unwrap_or_default();

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());
        let mut only_patterns = self.only_patterns;
        only_patterns.extend(config.analyzer.only.iter().cloned());

        let excluded_dirs = config
            .analyzer
            .excluded_dirs()
            .into_iter()
            .map(|dir| compile(&format!(r"(^|/){}/", regex::escape(dir))))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Analyzer {
            lexicals: self.lexicals,
            prepares: self.prepares,
            reviews: self.reviews,
            exclude: exclude_patterns
                .iter()
                .map(|p| compile(p))
                .collect::<Result<_, _>>()?,
            only: only_patterns
                .iter()
                .map(|p| compile(p))
                .collect::<Result<_, _>>()?,
            excluded_dirs,
            fail_on_parse_error: self
                .fail_on_parse_error
                .unwrap_or(config.analyzer.fail_on_parse_error),
            revisit_migrations: self
                .revisit_migrations
                .unwrap_or(config.analyzer.revisit_migrations),
        })
    }
}

fn compile(pattern: &str) -> Result<Regex, PatternError> {
    Regex::new(pattern).map_err(|source| PatternError::Regex {
        pattern: pattern.to_string(),
        source,
    })
}

/// Runs checks over a set of source files.
///
/// Use [`Analyzer::builder()`] to construct an instance. An analyzer owns the
/// check instances of one run and is consumed by [`Analyzer::analyze`].
pub struct Analyzer {
    lexicals: Vec<CheckBox>,
    prepares: Vec<CheckBox>,
    reviews: Vec<CheckBox>,
    exclude: Vec<Regex>,
    only: Vec<Regex>,
    excluded_dirs: Vec<Regex>,
    fail_on_parse_error: bool,
    revisit_migrations: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the number of registered checks.
    #[must_use]
    pub fn check_count(&self) -> usize {
        self.lexicals.len() + self.prepares.len() + self.reviews.len()
    }

    /// Checks if a path is excluded from every phase.
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        let text = normalized(path);
        if self.excluded_dirs.iter().any(|re| re.is_match(&text)) {
            return true;
        }
        if self.exclude.iter().any(|re| re.is_match(&text)) {
            return true;
        }
        !self.only.is_empty() && !self.only.iter().any(|re| re.is_match(&text))
    }

    /// Analyzes `files` and returns the surviving diagnostics.
    ///
    /// # Errors
    ///
    /// Returns an error if a check callback fails, or if the parser rejects a
    /// file while `fail_on_parse_error` is set.
    pub fn analyze(self, files: &[SourceFile], parser: &dyn Parser) -> Result<LintResult, AnalyzeError> {
        self.analyze_with_context(files, parser).map(|(result, _)| result)
    }

    /// Like [`Analyzer::analyze`], also returning the symbol tables built
    /// during the prepare phase.
    ///
    /// # Errors
    ///
    /// See [`Analyzer::analyze`].
    pub fn analyze_with_context(
        self,
        files: &[SourceFile],
        parser: &dyn Parser,
    ) -> Result<(LintResult, AnalysisContext), AnalyzeError> {
        let files: Vec<&SourceFile> = files
            .iter()
            .filter(|f| {
                let excluded = self.is_excluded(&f.path);
                if excluded {
                    debug!("Excluding: {}", f.path.display());
                }
                !excluded
            })
            .collect();
        let files = sort_files(files);
        info!("Analyzing {} files", files.len());

        let mut tables = AnalysisContext::new();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        info!("Lexical phase: {} checks", self.lexicals.len());
        let mut lexical = TextDispatcher::new(self.lexicals);
        for file in &files {
            lexical.dispatch(&file.path, &file.content, &mut tables)?;
        }
        lexical.after_check(&mut tables)?;
        diagnostics.extend(lexical.take_diagnostics());

        let parsed = parse_all(&files, parser, self.fail_on_parse_error)?;
        let mut disables = InlineDisables::new();
        for (file, source) in &parsed {
            disables.add_comments(&file.path, &source.comments);
        }

        info!("Prepare phase: {} checks", self.prepares.len());
        let prepare_order = with_migrations_last(&parsed, self.revisit_migrations);
        let prepare_diagnostics = run_tree_phase(self.prepares, &files, &prepare_order, &mut tables)?;
        debug!(count = prepare_diagnostics.len(), "discarding prepare diagnostics");

        info!("Review phase: {} checks", self.reviews.len());
        let review_order: Vec<&(&SourceFile, ParsedSource)> = parsed.iter().collect();
        diagnostics.extend(run_tree_phase(self.reviews, &files, &review_order, &mut tables)?);

        let mut result = LintResult::new();
        result.diagnostics = disables.filter(diagnostics);
        result.files_checked = files.len();
        result.sort();

        info!(
            "Analysis complete: {} warnings in {} files",
            result.diagnostics.len(),
            result.files_checked
        );

        Ok((result, tables))
    }
}

/// Parses every Ruby file once.
fn parse_all<'f>(
    files: &[&'f SourceFile],
    parser: &dyn Parser,
    fail_on_parse_error: bool,
) -> Result<Vec<(&'f SourceFile, ParsedSource)>, AnalyzeError> {
    let mut parsed = Vec::new();
    for file in files.iter().copied().filter(|f| f.is_ruby()) {
        match parser.parse(&file.path, &file.content) {
            Ok(source) => parsed.push((file, source)),
            Err(err) => {
                warn!("Failed to parse {}: {}", file.path.display(), err);
                if fail_on_parse_error {
                    return Err(AnalyzeError::Parse {
                        path: file.path.clone(),
                        message: err.message,
                    });
                }
            }
        }
    }
    Ok(parsed)
}

/// Runs text and tree checks of one phase, then their `after_check` hooks.
fn run_tree_phase(
    checks: Vec<CheckBox>,
    files: &[&SourceFile],
    order: &[&(&SourceFile, ParsedSource)],
    tables: &mut AnalysisContext,
) -> Result<Vec<Diagnostic>, AnalyzeError> {
    let (text_checks, tree_checks): (Vec<CheckBox>, Vec<CheckBox>) =
        checks.into_iter().partition(|c| c.is_text_check());

    let mut text = TextDispatcher::new(text_checks);
    for file in files {
        text.dispatch(&file.path, &file.content, tables)?;
    }

    let mut tree = TreeDispatcher::new(tree_checks);
    if !tree.is_empty() {
        for (file, source) in order {
            tree.dispatch(&source.tree, &file.path, tables)?;
        }
    }

    text.after_check(tables)?;
    tree.after_check(tables)?;

    let mut diagnostics = text.take_diagnostics();
    diagnostics.extend(tree.take_diagnostics());
    Ok(diagnostics)
}

/// Orders files: project files, models, mailers, helpers, then the rest.
fn sort_files(files: Vec<&SourceFile>) -> Vec<&SourceFile> {
    let group = |file: &SourceFile| {
        let path = normalized(&file.path);
        if PROJECT_FILES.is_match(&path) {
            0
        } else if MAILER_FILES.is_match(&path) {
            2
        } else if MODEL_FILES.is_match(&path) {
            1
        } else if HELPER_FILES.is_match(&path) {
            3
        } else {
            4
        }
    };
    let mut files = files;
    files.sort_by_key(|f| group(f));
    files
}

/// Prepare order: migrations move to the end, or are repeated there.
fn with_migrations_last<'p, 'f>(
    parsed: &'p [(&'f SourceFile, ParsedSource)],
    revisit: bool,
) -> Vec<&'p (&'f SourceFile, ParsedSource)> {
    let is_migration = |entry: &&(&SourceFile, ParsedSource)| {
        MIGRATION_FILES.is_match(&normalized(&entry.0.path))
    };
    let migrations: Vec<_> = parsed.iter().filter(is_migration).collect();
    let mut order: Vec<_> = if revisit {
        parsed.iter().collect()
    } else {
        parsed.iter().filter(|e| !is_migration(e)).collect()
    };
    order.extend(migrations);
    order
}

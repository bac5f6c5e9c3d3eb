//! Core types for diagnostics and results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A finding reported by a check.
///
/// `lines` holds every line the finding covers; most checks report one,
/// some report all occurrences of a repeated construct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// File the finding belongs to.
    pub filename: PathBuf,
    /// Lines covered, in report order.
    pub lines: Vec<usize>,
    /// Human-readable message.
    pub message: String,
    /// Name of the check that reported it (e.g. `MoveModelLogicIntoModelCheck`).
    pub check: String,
    /// Reference explaining the practice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Diagnostic {
    /// Creates a diagnostic covering a single line.
    #[must_use]
    pub fn new(
        filename: impl Into<PathBuf>,
        line: usize,
        message: impl Into<String>,
        check: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            lines: vec![line],
            message: message.into(),
            check: check.into(),
            url: None,
        }
    }

    /// Replaces the covered lines.
    #[must_use]
    pub fn with_lines(mut self, lines: Vec<usize>) -> Self {
        self.lines = lines;
        self
    }

    /// Attaches a reference URL.
    #[must_use]
    pub fn with_url(mut self, url: Option<impl Into<String>>) -> Self {
        self.url = url.map(Into::into);
        self
    }

    /// Lines joined by commas, as printed in reports (`"3,7,12"`).
    #[must_use]
    pub fn line_number(&self) -> String {
        self.lines
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// The first covered line; 0 when none was recorded.
    #[must_use]
    pub fn first_line_number(&self) -> usize {
        self.lines.first().copied().unwrap_or(0)
    }

    /// Formats the diagnostic for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{}:{} - {}\n",
            self.filename.display(),
            self.line_number(),
            self.message
        );
        let _ = writeln!(output, "  = check: {}", self.check);
        if let Some(url) = &self.url {
            let _ = writeln!(output, "  = see: {url}");
        }
        output
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{} - {}",
            self.filename.display(),
            self.line_number(),
            self.message
        )
    }
}

/// Result of running an analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All diagnostics that survived suppression.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of files checked.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if any diagnostic was reported.
    #[must_use]
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Diagnostics reported by the named check.
    #[must_use]
    pub fn by_check(&self, check: &str) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.check == check)
            .collect()
    }

    /// Sorts diagnostics by file, then first line, then check name.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            a.filename
                .cmp(&b.filename)
                .then(a.first_line_number().cmp(&b.first_line_number()))
                .then_with(|| a.check.cmp(&b.check))
        });
    }

    /// Prints a summary report to stdout.
    pub fn print_report(&self) {
        for diagnostic in &self.diagnostics {
            println!("{}", diagnostic.format());
        }

        println!(
            "\nFound {} warning(s) in {} file(s)",
            self.diagnostics.len(),
            self.files_checked
        );
    }

    /// Adds diagnostics from another result.
    pub fn extend(&mut self, other: Self) {
        self.diagnostics.extend(other.diagnostics);
        self.files_checked += other.files_checked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_diagnostic(file: &str, line: usize, check: &str) -> Diagnostic {
        Diagnostic::new(file, line, "use scope access", check)
    }

    #[test]
    fn line_number_joins_all_lines() {
        let d = make_diagnostic("app/models/post.rb", 3, "X").with_lines(vec![3, 7, 12]);
        assert_eq!(d.line_number(), "3,7,12");
        assert_eq!(d.first_line_number(), 3);
    }

    #[test]
    fn first_line_number_of_empty_lines_is_zero() {
        let d = make_diagnostic("a.rb", 1, "X").with_lines(Vec::new());
        assert_eq!(d.first_line_number(), 0);
        assert_eq!(d.line_number(), "");
    }

    #[test]
    fn display_uses_compact_form() {
        let d = make_diagnostic("app/controllers/posts_controller.rb", 5, "X");
        assert_eq!(
            d.to_string(),
            "app/controllers/posts_controller.rb:5 - use scope access"
        );
    }

    #[test]
    fn format_includes_url_when_present() {
        let d = make_diagnostic("a.rb", 1, "X").with_url(Some("https://example.org/x"));
        assert!(d.format().contains("= see: https://example.org/x"));
        let d = make_diagnostic("a.rb", 1, "X");
        assert!(!d.format().contains("see:"));
    }

    #[test]
    fn sort_orders_by_file_then_line() {
        let mut result = LintResult::new();
        result.diagnostics.push(make_diagnostic("b.rb", 1, "A"));
        result.diagnostics.push(make_diagnostic("a.rb", 9, "A"));
        result.diagnostics.push(make_diagnostic("a.rb", 2, "B"));
        result.sort();
        let order: Vec<String> = result.diagnostics.iter().map(ToString::to_string).collect();
        assert_eq!(
            order,
            vec![
                "a.rb:2 - use scope access",
                "a.rb:9 - use scope access",
                "b.rb:1 - use scope access"
            ]
        );
    }

    #[test]
    fn by_check_filters() {
        let mut result = LintResult::new();
        result.diagnostics.push(make_diagnostic("a.rb", 1, "A"));
        result.diagnostics.push(make_diagnostic("a.rb", 2, "B"));
        assert_eq!(result.by_check("B").len(), 1);
        assert!(result.has_diagnostics());
    }
}

//! Inline disable directives.
//!
//! A comment such as
//!
//! ```text
//! def show # rails_best_practices:disable MoveModelLogicIntoModelCheck, LongLineCheck
//! ```
//!
//! drops diagnostics of the named checks reported on that exact line of that
//! file. Names compare after dropping a trailing `Check` or `Review`.

use crate::source::Comment;
use crate::types::Diagnostic;
use crate::utils::inflect::static_regex;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

static DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| static_regex(r"rails_?b(?:est_)?p(?:ractices)?:\s*disable\s+(.*)"));

/// Drops a trailing `Check` or `Review` from a check name.
#[must_use]
pub fn normalize_check_name(name: &str) -> &str {
    name.strip_suffix("Check")
        .or_else(|| name.strip_suffix("Review"))
        .unwrap_or(name)
}

/// Check names listed by a disable directive, or `None` if the comment has none.
#[must_use]
pub fn parse_directive(comment: &str) -> Option<Vec<String>> {
    let captures = DIRECTIVE.captures(comment)?;
    let names: Vec<String> = captures
        .get(1)?
        .as_str()
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(names)
    }
}

/// Disabled `(file, line, check)` keys collected from comments.
#[derive(Debug, Clone, Default)]
pub struct InlineDisables {
    disabled: HashSet<(PathBuf, usize, String)>,
}

impl InlineDisables {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans a file's comments for directives.
    pub fn add_comments(&mut self, file: &Path, comments: &[Comment]) {
        for comment in comments {
            let Some(names) = parse_directive(&comment.text) else {
                continue;
            };
            for name in names {
                self.disabled.insert((
                    file.to_path_buf(),
                    comment.line,
                    normalize_check_name(&name).to_string(),
                ));
            }
        }
    }

    /// Returns true if a directive covers the diagnostic's first line.
    #[must_use]
    pub fn is_disabled(&self, diagnostic: &Diagnostic) -> bool {
        self.disabled.contains(&(
            diagnostic.filename.clone(),
            diagnostic.first_line_number(),
            normalize_check_name(&diagnostic.check).to_string(),
        ))
    }

    /// Keeps the diagnostics no directive covers.
    #[must_use]
    pub fn filter(&self, diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
        if self.disabled.is_empty() {
            return diagnostics;
        }
        let before = diagnostics.len();
        let kept: Vec<Diagnostic> = diagnostics
            .into_iter()
            .filter(|d| !self.is_disabled(d))
            .collect();
        debug!(suppressed = before - kept.len(), "applied inline disables");
        kept
    }

    /// Number of disabled keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.disabled.len()
    }

    /// True when no directive was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.disabled.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(line: usize, text: &str) -> Comment {
        Comment {
            line,
            text: text.to_string(),
        }
    }

    #[test]
    fn parses_directive_lists() {
        assert_eq!(
            parse_directive("# rails_best_practices:disable LongLineCheck, RemoveTabCheck"),
            Some(vec!["LongLineCheck".to_string(), "RemoveTabCheck".to_string()])
        );
        assert_eq!(
            parse_directive("# railsbp:disable LongLineCheck"),
            Some(vec!["LongLineCheck".to_string()])
        );
        assert_eq!(parse_directive("# just a comment"), None);
        assert_eq!(parse_directive("# rails_best_practices:disable"), None);
    }

    #[test]
    fn normalizes_suffixes() {
        assert_eq!(normalize_check_name("MoveModelLogicIntoModelCheck"), "MoveModelLogicIntoModel");
        assert_eq!(normalize_check_name("MoveModelLogicIntoModelReview"), "MoveModelLogicIntoModel");
        assert_eq!(normalize_check_name("MoveModelLogicIntoModel"), "MoveModelLogicIntoModel");
    }

    #[test]
    fn suppresses_only_exact_file_line_and_check() {
        let file = Path::new("app/controllers/posts_controller.rb");
        let mut disables = InlineDisables::new();
        disables.add_comments(
            file,
            &[comment(4, "# rails_best_practices:disable MoveModelLogicIntoModelCheck")],
        );

        let hit = Diagnostic::new(file, 4, "m", "MoveModelLogicIntoModelReview");
        let other_line = Diagnostic::new(file, 5, "m", "MoveModelLogicIntoModelCheck");
        let other_check = Diagnostic::new(file, 4, "m", "LongLineCheck");
        let other_file = Diagnostic::new("app/models/post.rb", 4, "m", "MoveModelLogicIntoModelCheck");

        assert!(disables.is_disabled(&hit));
        let kept = disables.filter(vec![hit, other_line, other_check, other_file]);
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let file = Path::new("a.rb");
        let mut disables = InlineDisables::new();
        disables.add_comments(file, &[comment(1, "# rails_best_practices:disable longlinecheck")]);
        assert!(!disables.is_disabled(&Diagnostic::new(file, 1, "m", "LongLineCheck")));
    }

    #[test]
    fn malformed_directives_are_ignored() {
        let mut disables = InlineDisables::new();
        disables.add_comments(Path::new("a.rb"), &[comment(1, "# rails_best_practices:enable X")]);
        assert!(disables.is_empty());
    }
}

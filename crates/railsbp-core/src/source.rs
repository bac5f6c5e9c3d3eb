//! Source files and the parser seam.

use crate::node::{SyntaxNode, TreeError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File names parsed although they have no `.rb` extension.
const RUBY_FILE_NAMES: &[&str] = &["Gemfile", "Capfile", "Rakefile"];

/// Extensions of files holding Ruby code.
const RUBY_EXTENSIONS: &[&str] = &["rb", "rake", "builder", "rxml", "jbuilder"];

/// A file handed to the analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path, usually relative to the project root.
    pub path: PathBuf,
    /// Raw file text.
    pub content: String,
}

impl SourceFile {
    /// Creates a source file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Returns true if the file holds Ruby code and should be parsed.
    #[must_use]
    pub fn is_ruby(&self) -> bool {
        is_ruby_path(&self.path)
    }
}

/// Returns true for paths the parser should see.
#[must_use]
pub fn is_ruby_path(path: &Path) -> bool {
    let by_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| RUBY_FILE_NAMES.contains(&n));
    let by_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| RUBY_EXTENSIONS.contains(&e));
    by_name || by_extension
}

/// A source comment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(usize, String)")]
pub struct Comment {
    /// Line of the comment.
    pub line: usize,
    /// Comment text including the leading `#`.
    pub text: String,
}

impl From<(usize, String)> for Comment {
    fn from((line, text): (usize, String)) -> Self {
        Self { line, text }
    }
}

/// Parser output: the tree plus the comments the tree drops.
#[derive(Debug, Clone)]
pub struct ParsedSource {
    /// Syntax tree.
    pub tree: SyntaxNode,
    /// Comments in source order.
    pub comments: Vec<Comment>,
}

#[derive(Deserialize)]
struct RawParsedSource {
    tree: serde_json::Value,
    #[serde(default)]
    comments: Vec<Comment>,
}

impl ParsedSource {
    /// Reads `{"tree": <sexp>, "comments": [[line, text], ...]}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON or the tree is malformed.
    pub fn from_json_str(json: &str) -> Result<Self, TreeError> {
        let raw: RawParsedSource = serde_json::from_str(json)?;
        if raw.tree.is_null() {
            return Err(TreeError::Shape("parser produced no tree".to_string()));
        }
        Ok(Self {
            tree: SyntaxNode::from_json(&raw.tree)?,
            comments: raw.comments,
        })
    }
}

/// The parser could not produce a tree.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ParseError {
    /// What went wrong.
    pub message: String,
}

impl ParseError {
    /// Creates a parse error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<TreeError> for ParseError {
    fn from(err: TreeError) -> Self {
        Self::new(err.to_string())
    }
}

/// Turns source text into a [`ParsedSource`].
pub trait Parser {
    /// Parses one file.
    ///
    /// # Errors
    ///
    /// Returns an error when the source is not valid Ruby or the parser failed.
    fn parse(&self, path: &Path, content: &str) -> Result<ParsedSource, ParseError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::Kind;

    #[test]
    fn ruby_paths() {
        assert!(is_ruby_path(Path::new("app/models/post.rb")));
        assert!(is_ruby_path(Path::new("lib/tasks/db.rake")));
        assert!(is_ruby_path(Path::new("app/views/posts/index.json.jbuilder")));
        assert!(is_ruby_path(Path::new("app/views/posts/feed.rxml")));
        assert!(is_ruby_path(Path::new("app/views/posts/feed.atom.builder")));
        assert!(is_ruby_path(Path::new("Gemfile")));
        assert!(!is_ruby_path(Path::new("Gemfile.lock")));
        assert!(!is_ruby_path(Path::new("app/views/posts/index.html.erb")));
    }

    #[test]
    fn parsed_source_from_json() {
        let parsed = ParsedSource::from_json_str(
            r##"{"tree": ["program", [["void_stmt"]]], "comments": [[3, "# rails_best_practices:disable LongLineCheck"]]}"##,
        )
        .unwrap();
        assert_eq!(parsed.tree.kind(), &Kind::Program);
        assert_eq!(parsed.comments[0].line, 3);
    }

    #[test]
    fn missing_tree_is_an_error() {
        assert!(ParsedSource::from_json_str(r#"{"tree": null}"#).is_err());
        assert!(ParsedSource::from_json_str("[1]").is_err());
    }
}

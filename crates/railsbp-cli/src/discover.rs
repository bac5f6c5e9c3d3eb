//! Collecting the files of a Rails application.

use anyhow::{Context, Result};
use railsbp_core::{is_ruby_path, SourceFile};
use std::path::Path;

/// Template and builder extensions read by lexical checks.
const TEMPLATE_EXTENSIONS: &[&str] = &["erb", "rhtml", "haml", "slim", "rabl"];

/// Files read as text although the parser never sees them.
const PROJECT_FILE_NAMES: &[&str] = &["Gemfile.lock"];

fn is_reviewed(path: &Path) -> bool {
    if is_ruby_path(path) {
        return true;
    }
    let by_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| PROJECT_FILE_NAMES.contains(&n));
    let by_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| TEMPLATE_EXTENSIONS.contains(&e));
    by_name || by_extension
}

/// Walks `root` honouring `.gitignore` and reads every reviewed file.
///
/// Paths are relative to `root` and sorted.
pub fn discover_files(root: &Path) -> Result<Vec<SourceFile>> {
    let mut builder = ignore::WalkBuilder::new(root);
    builder
        .hidden(false)
        .git_ignore(true)
        .filter_entry(|entry| entry.file_name() != ".git");

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() || !is_reviewed(path) {
            continue;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                tracing::warn!("Skipping non-UTF-8 file {}", path.display());
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        let rel = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        files.push(SourceFile::new(rel, content));
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

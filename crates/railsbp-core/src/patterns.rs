//! File-path interest patterns.
//!
//! Checks declare which files they care about with regexes or globs. The
//! builtin sets mirror the Rails directory layout.

use crate::utils::inflect::static_regex;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use thiserror::Error;

/// Invalid pattern in an interest or exclusion list.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The regex does not compile.
    #[error("invalid regex `{pattern}`: {source}")]
    Regex {
        /// The offending pattern.
        pattern: String,
        /// Compile error.
        source: regex::Error,
    },

    /// The glob does not compile.
    #[error("invalid glob `{pattern}`: {source}")]
    Glob {
        /// The offending pattern.
        pattern: String,
        /// Compile error.
        source: glob::PatternError,
    },
}

/// A pattern matched against a source file path.
#[derive(Debug, Clone)]
pub enum FilePattern {
    /// Every file except generated ones (`db/schema.rb`).
    All,
    /// Unanchored regex search over the path.
    Regex(Regex),
    /// Glob over the whole path.
    Glob(glob::Pattern),
}

impl FilePattern {
    /// Compiles a regex pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the regex is invalid.
    pub fn regex(pattern: &str) -> Result<Self, PatternError> {
        Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|source| PatternError::Regex {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// Compiles a glob pattern such as `app/**/*.rb`.
    ///
    /// # Errors
    ///
    /// Returns an error if the glob is invalid.
    pub fn glob(pattern: &str) -> Result<Self, PatternError> {
        glob::Pattern::new(pattern)
            .map(Self::Glob)
            .map_err(|source| PatternError::Glob {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// Returns true if `path` matches.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        let text = normalized(path);
        match self {
            Self::All => !SCHEMA_FILE.is_match(&text),
            Self::Regex(regex) => regex.is_match(&text),
            Self::Glob(glob) => glob.matches(&text) || glob.matches(&format!("/{text}")),
        }
    }
}

/// Path as a forward-slash string.
#[must_use]
pub fn normalized(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Returns true if any pattern matches `path`.
#[must_use]
pub fn any_match(patterns: &[FilePattern], path: &Path) -> bool {
    patterns.iter().any(|p| p.matches(path))
}

macro_rules! builtin_regex {
    ($($(#[$doc:meta])* $name:ident = $pattern:literal;)*) => {
        $(
            $(#[$doc])*
            pub static $name: Lazy<Regex> = Lazy::new(|| static_regex($pattern));
        )*
    };
}

builtin_regex! {
    /// Controllers and cells.
    CONTROLLER_FILES = r"app/(controllers|cells)/.*\.rb$";
    /// Models.
    MODEL_FILES = r"app/models/.*\.rb$";
    /// Mailers.
    MAILER_FILES = r"app/models/.*mailer\.rb$|app/mailers/.*\.rb$";
    /// Helpers.
    HELPER_FILES = r"app/helpers/.*\.rb$";
    /// Views.
    VIEW_FILES = r"app/(views|cells)/.*\.(erb|haml|slim|builder|rxml)$";
    /// Deploy recipes.
    DEPLOY_FILES = r"config/deploy.*\.rb";
    /// Migrations.
    MIGRATION_FILES = r"db/migrate/.*\.rb$";
    /// The generated schema.
    SCHEMA_FILE = r"db/schema\.rb$";
    /// Route definitions.
    ROUTE_FILES = r"config/routes.*\.rb$";
    /// Application and environment configuration.
    CONFIG_FILES = r"config/(application|environment|environments/.*)\.rb$";
    /// Resolved gem versions.
    GEMFILE_LOCK = r"Gemfile\.lock$";
    /// Project-level build files, processed before anything else.
    PROJECT_FILES = r"(^|/)(Capfile|Gemfile|Gemfile\.lock)$";
}

/// Wraps a builtin regex as a [`FilePattern`].
#[must_use]
pub fn builtin(regex: &Lazy<Regex>) -> FilePattern {
    FilePattern::Regex(Regex::clone(regex))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_files_skips_schema() {
        assert!(FilePattern::All.matches(Path::new("app/models/post.rb")));
        assert!(!FilePattern::All.matches(Path::new("db/schema.rb")));
    }

    #[test]
    fn builtin_sets() {
        assert!(builtin(&CONTROLLER_FILES).matches(Path::new("app/controllers/posts_controller.rb")));
        assert!(builtin(&CONTROLLER_FILES).matches(Path::new("/abs/app/cells/nav_cell.rb")));
        assert!(!builtin(&CONTROLLER_FILES).matches(Path::new("app/models/post.rb")));
        assert!(builtin(&MAILER_FILES).matches(Path::new("app/mailers/user_mailer.rb")));
        assert!(builtin(&ROUTE_FILES).matches(Path::new("config/routes.rb")));
        assert!(builtin(&CONFIG_FILES).matches(Path::new("config/environments/production.rb")));
        assert!(builtin(&PROJECT_FILES).matches(Path::new("Gemfile.lock")));
        assert!(!builtin(&PROJECT_FILES).matches(Path::new("app/models/gemfile.rb")));
    }

    #[test]
    fn glob_patterns_match_relative_and_nested_paths() {
        let pattern = FilePattern::glob("app/**/*.rb").unwrap();
        assert!(pattern.matches(Path::new("app/models/post.rb")));
        assert!(!pattern.matches(Path::new("lib/post.rb")));
    }

    #[test]
    fn invalid_patterns_are_reported() {
        assert!(matches!(
            FilePattern::regex("("),
            Err(PatternError::Regex { .. })
        ));
        assert!(matches!(
            FilePattern::glob("a[b"),
            Err(PatternError::Glob { .. })
        ));
    }
}

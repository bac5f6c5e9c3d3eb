//! Check for whitespace at the end of lines.
//!
//! # Rationale
//!
//! Trailing whitespace is invisible in editors but shows up in every diff.
//!
//! # Detected Patterns
//!
//! - Any line ending in spaces or tabs (one report per line)

use crate::presets::{BuiltinCheck, Stage};
use once_cell::sync::Lazy;
use railsbp_core::{CheckBox, CheckConfig, Checker, FilePattern};
use regex::Regex;

/// Check name.
pub const NAME: &str = "RemoveTrailingWhitespaceCheck";

/// Reference for the practice.
pub const URL: &str = "https://rails-bestpractices.com/posts/2010/12/02/remove-trailing-whitespace/";

#[allow(clippy::expect_used)]
static TRAILING: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+\r?$").expect("valid regex"));

/// Reports lines with trailing whitespace.
#[derive(Debug, Clone, Default)]
pub struct RemoveTrailingWhitespaceCheck;

impl RemoveTrailingWhitespaceCheck {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl BuiltinCheck for RemoveTrailingWhitespaceCheck {
    const NAME: &'static str = NAME;
    const STAGE: Stage = Stage::Lexical;

    fn configure(_config: &CheckConfig) -> Self {
        Self::new()
    }

    fn build(self, ignored: Vec<FilePattern>) -> CheckBox {
        Checker::builder(NAME)
            .url(URL)
            .interesting_files([FilePattern::All])
            .ignored_files(ignored)
            .on_text(|_: &mut (), cx, content| {
                let file = cx.file().map(ToOwned::to_owned).unwrap_or_default();
                for (index, line) in content.split('\n').enumerate() {
                    if TRAILING.is_match(line) {
                        cx.add_error_at("remove trailing whitespace", file.clone(), index + 1);
                    }
                }
                Ok(())
            })
            .boxed(())
    }
}

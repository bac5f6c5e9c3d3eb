//! Check for tab characters in source files.
//!
//! # Rationale
//!
//! Ruby style indents with two spaces. Tabs render differently in every
//! editor and make diffs noisy.
//!
//! # Detected Patterns
//!
//! - The first tab character of a file (one report per file)
//!
//! # Configuration
//!
//! - `ignored_files`: regexes of files to skip

use crate::presets::{BuiltinCheck, Stage};
use railsbp_core::{CheckBox, CheckConfig, Checker, FilePattern};

/// Check name.
pub const NAME: &str = "RemoveTabCheck";

/// Reference for the practice.
pub const URL: &str = "https://rails-bestpractices.com/posts/2011/07/04/remove-tab/";

/// Reports files indented with tabs.
#[derive(Debug, Clone, Default)]
pub struct RemoveTabCheck;

impl RemoveTabCheck {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl BuiltinCheck for RemoveTabCheck {
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
                if let Some(offset) = content.find('\t') {
                    let line = content[..offset].matches('\n').count() + 1;
                    let file = cx.file().map(ToOwned::to_owned).unwrap_or_default();
                    cx.add_error_at("remove tab, use spaces instead", file, line);
                }
                Ok(())
            })
            .boxed(())
    }
}

//! Check for overly long lines.
//!
//! # Configuration
//!
//! - `max_line_length`: longest accepted line in characters (default: 80)

use crate::presets::{BuiltinCheck, Stage};
use railsbp_core::{CheckBox, CheckConfig, Checker, FilePattern};

/// Check name.
pub const NAME: &str = "LongLineCheck";

/// Default for `max_line_length`.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 80;

/// Reports lines longer than a limit.
#[derive(Debug, Clone)]
pub struct LongLineCheck {
    max_line_length: usize,
}

impl Default for LongLineCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl LongLineCheck {
    /// Creates the check with the default limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }

    /// Sets the longest accepted line.
    #[must_use]
    pub fn max_line_length(mut self, max: usize) -> Self {
        self.max_line_length = max;
        self
    }
}

impl BuiltinCheck for LongLineCheck {
    const NAME: &'static str = NAME;
    const STAGE: Stage = Stage::Lexical;

    fn configure(config: &CheckConfig) -> Self {
        Self::new().max_line_length(config.get_usize("max_line_length", DEFAULT_MAX_LINE_LENGTH))
    }

    fn build(self, ignored: Vec<FilePattern>) -> CheckBox {
        let max = self.max_line_length;
        Checker::builder(NAME)
            .interesting_files([FilePattern::All])
            .ignored_files(ignored)
            .on_text(move |_: &mut (), cx, content| {
                let file = cx.file().map(ToOwned::to_owned).unwrap_or_default();
                for (index, line) in content.lines().enumerate() {
                    let length = line.chars().count();
                    if length > max {
                        cx.add_error_at(
                            format!("line is longer than {max} characters ({length} characters)"),
                            file.clone(),
                            index + 1,
                        );
                    }
                }
                Ok(())
            })
            .boxed(())
    }
}

//! Check for controller actions that manipulate one model heavily.
//!
//! # Rationale
//!
//! An action that calls or assigns many attributes on the same object is
//! doing the model's job. Move that logic into a model method.
//!
//! # Detected Patterns
//!
//! - A `def` in a controller whose body calls methods on (or assigns
//!   attributes of) the same receiver more than `use_count` times
//!
//! # Configuration
//!
//! - `use_count`: highest accepted number of uses per receiver (default: 4)

use crate::presets::{BuiltinCheck, Stage};
use crate::reviews::receiver_variable;
use railsbp_core::patterns::{builtin, CONTROLLER_FILES};
use railsbp_core::{CheckBox, CheckConfig, Checker, FilePattern, Kind, Pattern};

/// Check name.
pub const NAME: &str = "MoveModelLogicIntoModelCheck";

/// Reference for the practice.
pub const URL: &str = "https://rails-bestpractices.com/posts/2010/07/21/move-model-logic-into-the-model/";

/// Default for `use_count`.
pub const DEFAULT_USE_COUNT: usize = 4;

/// Receivers that never count.
const IGNORED_RECEIVERS: &[&str] = &["self", "@_response"];

/// Reports actions that use one receiver more than `use_count` times.
#[derive(Debug, Clone)]
pub struct MoveModelLogicIntoModelReview {
    use_count: usize,
}

impl Default for MoveModelLogicIntoModelReview {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveModelLogicIntoModelReview {
    /// Creates the check with the default threshold.
    #[must_use]
    pub fn new() -> Self {
        Self {
            use_count: DEFAULT_USE_COUNT,
        }
    }

    /// Sets the highest accepted number of uses.
    #[must_use]
    pub fn use_count(mut self, count: usize) -> Self {
        self.use_count = count;
        self
    }
}

impl BuiltinCheck for MoveModelLogicIntoModelReview {
    const NAME: &'static str = NAME;
    const STAGE: Stage = Stage::Review;

    fn configure(config: &CheckConfig) -> Self {
        Self::new().use_count(config.get_usize("use_count", DEFAULT_USE_COUNT))
    }

    fn build(self, ignored: Vec<FilePattern>) -> CheckBox {
        let threshold = self.use_count;
        let uses = Pattern::new().kinds([Kind::Call, Kind::Field]);
        Checker::builder(NAME)
            .url(URL)
            .interesting_kinds([Kind::Def])
            .interesting_files([builtin(&CONTROLLER_FILES)])
            .ignored_files(ignored)
            .on_enter(Kind::Def, move |_: &mut (), cx, node| {
                let mut counts: Vec<(String, usize)> = Vec::new();
                for use_site in node.body().find_all(&uses) {
                    let variable = receiver_variable(use_site).render_text();
                    if variable.is_empty() || IGNORED_RECEIVERS.contains(&variable.as_str()) {
                        continue;
                    }
                    match counts.iter_mut().find(|(name, _)| *name == variable) {
                        Some((_, count)) => *count += 1,
                        None => counts.push((variable, 1)),
                    }
                }
                for (variable, count) in counts {
                    if count > threshold {
                        cx.add_error(format!(
                            "move model logic into model ({variable} use_count > {threshold})"
                        ));
                    }
                }
                Ok(())
            })
            .boxed(())
    }
}

//! Check for `resources` blocks with too many custom routes.
//!
//! # Rationale
//!
//! Many `member`/`collection` routes on one resource usually hide another
//! resource. Extract it into its own controller.
//!
//! # Detected Patterns
//!
//! - A `resources ... do` block whose `member:`/`collection:` options plus
//!   verb routes (outside nested resources) exceed `customize_count`
//!
//! # Configuration
//!
//! - `customize_count`: highest accepted number of custom routes (default: 3)

use crate::mixins::routable::{is_resource_message, route_options, VERBS};
use crate::presets::{BuiltinCheck, Stage};
use railsbp_core::patterns::{builtin, ROUTE_FILES};
use railsbp_core::{CheckBox, CheckConfig, Checker, FilePattern, Kind, NodeRef};

/// Check name.
pub const NAME: &str = "OveruseRouteCustomizationsCheck";

/// Reference for the practice.
pub const URL: &str = "https://rails-bestpractices.com/posts/2010/07/22/overuse-route-customizations/";

/// Default for `customize_count`.
pub const DEFAULT_CUSTOMIZE_COUNT: usize = 3;

/// Reports over-customized resource blocks.
#[derive(Debug, Clone)]
pub struct OveruseRouteCustomizationsReview {
    customize_count: usize,
}

impl Default for OveruseRouteCustomizationsReview {
    fn default() -> Self {
        Self::new()
    }
}

impl OveruseRouteCustomizationsReview {
    /// Creates the check with the default threshold.
    #[must_use]
    pub fn new() -> Self {
        Self {
            customize_count: DEFAULT_CUSTOMIZE_COUNT,
        }
    }

    /// Sets the highest accepted number of custom routes.
    #[must_use]
    pub fn customize_count(mut self, count: usize) -> Self {
        self.customize_count = count;
        self
    }
}

fn is_resources_block(node: NodeRef<'_>) -> bool {
    node.is(&Kind::MethodAddBlock) && node.message().render_text() == "resources"
}

/// Verb routes under `node`, not descending into nested resources.
fn count_verbs(node: NodeRef<'_>) -> usize {
    node.children()
        .into_iter()
        .map(|child| {
            if child.is(&Kind::MethodAddBlock) && is_resource_message(&child.message().render_text()) {
                0
            } else if child.is(&Kind::Command)
                && VERBS.contains(&child.message().render_text().as_str())
            {
                1 + count_verbs(child)
            } else {
                count_verbs(child)
            }
        })
        .sum()
}

fn customize_count(node: NodeRef<'_>) -> usize {
    let options = route_options(node.slot(0));
    let declared = ["member", "collection"]
        .into_iter()
        .map(|key| options.hash_value(key).hash_size())
        .sum::<usize>();
    declared + count_verbs(node.block())
}

impl BuiltinCheck for OveruseRouteCustomizationsReview {
    const NAME: &'static str = NAME;
    const STAGE: Stage = Stage::Review;

    fn configure(config: &CheckConfig) -> Self {
        Self::new().customize_count(config.get_usize("customize_count", DEFAULT_CUSTOMIZE_COUNT))
    }

    fn build(self, ignored: Vec<FilePattern>) -> CheckBox {
        let threshold = self.customize_count;
        Checker::builder(NAME)
            .url(URL)
            .interesting_kinds([Kind::MethodAddBlock])
            .interesting_files([builtin(&ROUTE_FILES)])
            .ignored_files(ignored)
            .on_enter(Kind::MethodAddBlock, move |_: &mut (), cx, node| {
                if is_resources_block(node) && customize_count(node) > threshold {
                    cx.add_error(format!(
                        "overuse route customizations (customize_count > {threshold})"
                    ));
                }
                Ok(())
            })
            .boxed(())
    }
}

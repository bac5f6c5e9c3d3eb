//! Check for reaching through an association to read its attributes.
//!
//! # Rationale
//!
//! `@invoice.user.name` couples the caller to `Invoice`'s associations.
//! Declare `delegate :name, to: :user, prefix: true` and call
//! `@invoice.user_name` instead.
//!
//! # Detected Patterns
//!
//! - `variable.association.attribute` where `association` is a
//!   `belongs_to`/`has_one` of the variable's model and `attribute` is a
//!   column of the associated model

use crate::presets::{BuiltinCheck, Stage};
use crate::reviews::receiver_variable;
use railsbp_core::utils::classify;
use railsbp_core::{AnalysisContext, CheckBox, CheckConfig, Checker, FilePattern, Kind, NodeRef};

/// Check name.
pub const NAME: &str = "LawOfDemeterCheck";

/// Reference for the practice.
pub const URL: &str = "https://rails-bestpractices.com/posts/2010/07/24/the-law-of-demeter/";

/// Associations that return a single record.
const DELEGATABLE: &[&str] = &["belongs_to", "has_one"];

/// Reports attribute reads through a singular association.
#[derive(Debug, Clone, Default)]
pub struct LawOfDemeterReview;

impl LawOfDemeterReview {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn needs_delegate(node: NodeRef<'_>, tables: &AnalysisContext) -> bool {
    let variable = receiver_variable(node).render_text();
    if variable.is_empty() {
        return false;
    }
    let model = classify(variable.trim_start_matches('@'));
    let association_name = node.subject().message().render_text();
    let Some(association) =
        tables
            .model_associations
            .get_association(&model, &association_name, DELEGATABLE)
    else {
        return false;
    };
    let attribute = node.message().render_text();
    tables
        .model_attributes
        .is_attribute(&association.class_name, &attribute)
}

impl BuiltinCheck for LawOfDemeterReview {
    const NAME: &'static str = NAME;
    const STAGE: Stage = Stage::Review;

    fn configure(_config: &CheckConfig) -> Self {
        Self::new()
    }

    fn build(self, ignored: Vec<FilePattern>) -> CheckBox {
        Checker::builder(NAME)
            .url(URL)
            .interesting_kinds([Kind::Call])
            .interesting_files([FilePattern::All])
            .ignored_files(ignored)
            .on_enter(Kind::Call, |_: &mut (), cx, node| {
                if node.subject().is(&Kind::Call) && needs_delegate(node, cx.tables) {
                    cx.add_error("law of demeter");
                }
                Ok(())
            })
            .boxed(())
    }
}

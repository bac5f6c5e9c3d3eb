//! Check for ActiveRecord models open to mass assignment.
//!
//! # Rationale
//!
//! Without `attr_accessible` (or strong parameters) any request parameter
//! can overwrite any column, including `admin` flags and foreign keys.
//!
//! # Detected Patterns
//!
//! - A subclass of `ActiveRecord::Base` or `ApplicationRecord` that declares
//!   neither `attr_accessible` nor `attr_protected`
//!
//! The check stays silent when protection comes from elsewhere: the
//! `strong_parameters` gem, Rails 4+ without `protected_attributes`,
//! `config.active_record.whitelist_attributes = true`, including
//! `ActiveModel::ForbiddenAttributesProtection`, or a `devise` /
//! `acts_as_authentic` model.

use crate::presets::{BuiltinCheck, Stage};
use railsbp_core::patterns::{builtin, MODEL_FILES};
use railsbp_core::{AnalysisContext, CheckBox, CheckConfig, Checker, FilePattern, Kind};

/// Check name.
pub const NAME: &str = "ProtectMassAssignmentCheck";

/// Reference for the practice.
pub const URL: &str = "https://rails-bestpractices.com/posts/2012/03/06/protect-mass-assignment/";

const ACTIVE_RECORD_BASES: &[&str] = &["ActiveRecord::Base", "ApplicationRecord"];

/// Declarations that protect the model themselves.
const PROTECTING_CALLS: &[&str] = &["attr_accessible", "attr_protected", "devise", "acts_as_authentic"];

const FORBIDDEN_ATTRIBUTES_PROTECTION: &str = "ActiveModel::ForbiddenAttributesProtection";

#[derive(Debug)]
struct Frame {
    active_record: bool,
    protected: bool,
}

#[derive(Debug, Default)]
struct State {
    frames: Vec<Frame>,
}

impl State {
    fn protect(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.protected = true;
        }
    }
}

/// Reports unprotected ActiveRecord models.
#[derive(Debug, Clone, Default)]
pub struct ProtectMassAssignmentReview;

impl ProtectMassAssignmentReview {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn major_version(version: &str) -> Option<u32> {
    version.split('.').next()?.parse().ok()
}

/// True when the whole application is protected by gems or configuration.
fn protected_by_application(tables: &AnalysisContext) -> bool {
    let gems = &tables.gems;
    if gems.has_gem("strong_parameters") {
        return true;
    }
    let rails_major = ["activerecord", "rails"]
        .into_iter()
        .find_map(|gem| gems.gem_version(gem).and_then(major_version));
    if rails_major.is_some_and(|major| major >= 4) && !gems.has_gem("protected_attributes") {
        return true;
    }
    tables.configs.get("active_record.whitelist_attributes") == Some("true")
}

impl BuiltinCheck for ProtectMassAssignmentReview {
    const NAME: &'static str = NAME;
    const STAGE: Stage = Stage::Review;

    fn configure(_config: &CheckConfig) -> Self {
        Self::new()
    }

    fn build(self, ignored: Vec<FilePattern>) -> CheckBox {
        Checker::builder(NAME)
            .url(URL)
            .interesting_kinds([Kind::Class, Kind::Command, Kind::Vcall, Kind::VarRef])
            .interesting_files([builtin(&MODEL_FILES)])
            .ignored_files(ignored)
            .on_enter(Kind::Class, |state: &mut State, cx, node| {
                let base = node.base_class().render_text();
                state.frames.push(Frame {
                    active_record: ACTIVE_RECORD_BASES.contains(&base.trim_start_matches("::")),
                    protected: protected_by_application(cx.tables),
                });
                Ok(())
            })
            .on_enter(Kind::Command, |state: &mut State, _, node| {
                let message = node.message().render_text();
                let includes_protection = message == "include"
                    && node
                        .call_arguments()
                        .iter()
                        .any(|arg| arg.render_text() == FORBIDDEN_ATTRIBUTES_PROTECTION);
                if includes_protection || PROTECTING_CALLS.contains(&message.as_str()) {
                    state.protect();
                }
                Ok(())
            })
            .on_enter(Kind::Vcall, |state: &mut State, _, node| {
                if PROTECTING_CALLS.contains(&node.render_text().as_str()) {
                    state.protect();
                }
                Ok(())
            })
            .on_enter(Kind::VarRef, |state: &mut State, _, node| {
                if PROTECTING_CALLS.contains(&node.render_text().as_str()) {
                    state.protect();
                }
                Ok(())
            })
            .on_exit(Kind::Class, |state: &mut State, cx, _| {
                if let Some(frame) = state.frames.pop() {
                    if frame.active_record && !frame.protected {
                        cx.add_error("protect mass assignment");
                    }
                }
                Ok(())
            })
            .boxed(State::default())
    }
}

//! Check for deeply nested resource routes.
//!
//! # Rationale
//!
//! `/posts/1/comments/2/likes` needs every parent id to build a URL.
//! Nest at most `nested_count` levels, or declare the parent `shallow: true`.
//!
//! # Detected Patterns
//!
//! - A `resources`/`resource` declaration nested inside `nested_count` or
//!   more resource blocks, none of them shallow
//!
//! # Configuration
//!
//! - `nested_count`: deepest accepted nesting (default: 2)

use crate::mixins::routable::{is_resource_message, is_route_call, ROUTE_CALL_KINDS};
use crate::mixins::{routable, HasRouteScope, RouteScope};
use crate::presets::{BuiltinCheck, Stage};
use railsbp_core::patterns::{builtin, ROUTE_FILES};
use railsbp_core::{CheckBox, CheckConfig, CheckError, Checker, Cx, FilePattern, Kind, NodeRef};

/// Check name.
pub const NAME: &str = "NeedlessDeepNestingCheck";

/// Reference for the practice.
pub const URL: &str = "https://rails-bestpractices.com/posts/2010/07/22/needless-deep-nesting/";

/// Default for `nested_count`.
pub const DEFAULT_NESTED_COUNT: usize = 2;

#[derive(Debug, Default)]
struct State {
    scope: RouteScope,
}

impl HasRouteScope for State {
    fn route_scope(&mut self) -> &mut RouteScope {
        &mut self.scope
    }
}

/// Reports resources nested too deeply.
#[derive(Debug, Clone)]
pub struct NeedlessDeepNestingReview {
    nested_count: usize,
}

impl Default for NeedlessDeepNestingReview {
    fn default() -> Self {
        Self::new()
    }
}

impl NeedlessDeepNestingReview {
    /// Creates the check with the default depth.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nested_count: DEFAULT_NESTED_COUNT,
        }
    }

    /// Sets the deepest accepted nesting.
    #[must_use]
    pub fn nested_count(mut self, count: usize) -> Self {
        self.nested_count = count;
        self
    }
}

fn review_nesting(
    nested_count: usize,
) -> impl Fn(&mut State, &mut Cx<'_>, NodeRef<'_>) -> Result<(), CheckError> + Send + Sync + 'static {
    move |state, cx, node| {
        if !is_route_call(node) || !is_resource_message(&node.message().render_text()) {
            return Ok(());
        }
        let Some(depth) = state.scope.visit_resource_command() else {
            return Ok(());
        };
        if depth >= nested_count && !state.scope.in_shallow() {
            cx.add_error(format!("needless deep nesting (nested_count > {nested_count})"));
        }
        Ok(())
    }
}

impl BuiltinCheck for NeedlessDeepNestingReview {
    const NAME: &'static str = NAME;
    const STAGE: Stage = Stage::Review;

    fn configure(config: &CheckConfig) -> Self {
        Self::new().nested_count(config.get_usize("nested_count", DEFAULT_NESTED_COUNT))
    }

    fn build(self, ignored: Vec<FilePattern>) -> CheckBox {
        let nested_count = self.nested_count;
        routable(Checker::builder(NAME))
            .url(URL)
            .interesting_kinds(ROUTE_CALL_KINDS)
            .interesting_files([builtin(&ROUTE_FILES)])
            .ignored_files(ignored)
            .on_enter(Kind::Command, review_nesting(nested_count))
            .on_enter(Kind::MethodAddArg, review_nesting(nested_count))
            .boxed(State::default())
    }
}

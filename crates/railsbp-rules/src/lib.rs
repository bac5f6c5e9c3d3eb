//! # railsbp-rules
//!
//! Built-in checks for railsbp.
//!
//! Checks run in three phases: lexical checks read raw text, prepare checks
//! fill the symbol tables, review checks report using those tables.
//!
//! ## Available Checks
//!
//! | Name | Phase | Reports |
//! |------|-------|---------|
//! | `RemoveTabCheck` | lexical | first line containing a tab |
//! | `RemoveTrailingWhitespaceCheck` | lexical | lines ending in spaces or tabs |
//! | `LongLineCheck` | lexical | lines longer than `max_line_length` |
//! | `MoveModelLogicIntoModelCheck` | review | actions using one receiver more than `use_count` times |
//! | `LawOfDemeterCheck` | review | attribute reads through a singular association |
//! | `RemoveUnusedMethodsInControllersCheck` | review | controller methods nothing uses |
//! | `RestrictAutoGeneratedRoutesCheck` | review | `resources` broader than the controller |
//! | `OveruseRouteCustomizationsCheck` | review | resources with more than `customize_count` custom routes |
//! | `NeedlessDeepNestingCheck` | review | resources nested `nested_count` levels deep |
//! | `AlwaysAddDbIndexCheck` | review | foreign keys without an index |
//! | `ProtectMassAssignmentCheck` | review | models open to mass assignment |
//!
//! Prepare checks (`RoutePrepare`, `ModelPrepare`, `SchemaPrepare`,
//! `ControllerPrepare`, `HelperPrepare`, `ConfigPrepare`, `GemfilePrepare`)
//! are always on.
//!
//! ## Usage
//!
//! ```ignore
//! use railsbp_core::{Analyzer, Config};
//! use railsbp_rules::CheckSet;
//!
//! let config = Config::from_file(Path::new("railsbp.toml"))?;
//! let checks = CheckSet::from_config(&config)?;
//! let analyzer = checks.install(Analyzer::builder().config(config)).build()?;
//! let result = analyzer.analyze(&files, &parser)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod lexicals;
pub mod mixins;
pub mod prepares;
mod presets;
pub mod reviews;

#[cfg(test)]
mod test_support;

pub use lexicals::{LongLineCheck, RemoveTabCheck, RemoveTrailingWhitespaceCheck};
pub use prepares::{
    ConfigPrepare, ControllerPrepare, GemfilePrepare, HelperPrepare, ModelPrepare, RoutePrepare,
    SchemaPrepare,
};
pub use presets::{builtin_checks, BuiltinCheck, CheckInfo, CheckSet, Stage};
pub use reviews::{
    AlwaysAddDbIndexReview, LawOfDemeterReview, MoveModelLogicIntoModelReview,
    NeedlessDeepNestingReview, OveruseRouteCustomizationsReview, ProtectMassAssignmentReview,
    RemoveUnusedMethodsInControllersReview, RestrictAutoGeneratedRoutesReview,
};

/// Re-export core types for convenience.
pub use railsbp_core::{Check, CheckBox, Diagnostic};

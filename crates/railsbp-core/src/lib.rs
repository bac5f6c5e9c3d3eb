//! # railsbp-core
//!
//! Core engine for reviewing Rails code against best practices.
//!
//! This crate provides the foundations checks are built on:
//!
//! - [`SyntaxNode`] and [`NodeRef`], a query layer over Ripper syntax trees
//!   whose projections never fail (see [`query`])
//! - [`Checker`] and the [`Check`] trait for declaring interest and callbacks
//! - [`AnalysisContext`], the symbol tables prepare checks fill in
//! - [`Analyzer`] for running the lexical, prepare and review phases
//! - [`InlineDisables`] for `rails_best_practices:disable` comments
//!
//! ## Example
//!
//! ```ignore
//! use railsbp_core::{Analyzer, SourceFile};
//!
//! let analyzer = Analyzer::builder()
//!     .prepare_box(route_prepare())
//!     .review_box(restrict_auto_generated_routes(&config))
//!     .build()?;
//!
//! let result = analyzer.analyze(&files, &parser)?;
//! result.print_report();
//! ```
//!
//! ## Tree shape
//!
//! Trees follow Ripper's s-expression output. Slot positions used by the
//! projections:
//!
//! | projection | kinds → slot |
//! |------------|--------------|
//! | `subject` | `assign`, `field`, `call`, `binary`, `command_call` → 0 |
//! | `message` | `command`, `fcall` → 0; `call`, `command_call`, `field` → 2 |
//! | `arguments` | `command` → 1; `command_call` → 3; `method_add_arg` → 1 |
//! | `class_name` / `base_class` | `class` → 0 / 1 |
//! | `method_name` | `def` → 0; `defs` → 2 |
//! | `body` | `class`, `def` → 2; `module`, `if`, blocks → 1; `defs` → 4 |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod checker;
mod config;
mod context;
mod dispatch;
mod kind;
mod node;
pub mod patterns;
pub mod query;
mod source;
mod suppress;
pub mod tables;
mod types;

/// Utility modules for check implementations.
pub mod utils;

pub use analyzer::{AnalyzeError, Analyzer, AnalyzerBuilder};
pub use checker::{Check, CheckBox, CheckError, Checker, CheckerBuilder, Cx, EventKey, Phase};
pub use config::{AnalyzerConfig, CheckConfig, Config, ConfigError, DEFAULT_EXCLUDED_DIRS};
pub use context::AnalysisContext;
pub use dispatch::{TextDispatcher, TreeDispatcher};
pub use kind::Kind;
pub use node::{Literal, Slot, SyntaxNode, TreeError};
pub use patterns::{FilePattern, PatternError};
pub use query::{NodeRef, Pattern};
pub use source::{is_ruby_path, Comment, ParseError, ParsedSource, Parser, SourceFile};
pub use suppress::{normalize_check_name, parse_directive, InlineDisables};
pub use types::{Diagnostic, LintResult};

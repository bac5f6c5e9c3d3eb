//! Checks that fill the symbol tables before any review runs.
//!
//! Prepare checks never report; their diagnostics are discarded.

pub mod config_prepare;
pub mod controller_prepare;
pub mod gemfile_prepare;
pub mod helper_prepare;
pub mod model_prepare;
pub mod route_prepare;
pub mod schema_prepare;

pub use config_prepare::ConfigPrepare;
pub use controller_prepare::ControllerPrepare;
pub use gemfile_prepare::GemfilePrepare;
pub use helper_prepare::HelperPrepare;
pub use model_prepare::ModelPrepare;
pub use route_prepare::RoutePrepare;
pub use schema_prepare::SchemaPrepare;

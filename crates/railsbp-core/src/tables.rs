//! Symbol tables built by prepare checks and read by review checks.

pub mod gems;
pub mod klasses;
pub mod methods;
pub mod models;
pub mod routes;

pub use gems::{Configs, Gems};
pub use klasses::{Klass, Klasses, Modules};
pub use methods::{Access, Method, Methods};
pub use models::{Association, ModelAssociations, ModelAttributes};
pub use routes::{Route, Routes};

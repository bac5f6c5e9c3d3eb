//! Reusable callback sets installed into a [`CheckerBuilder`](railsbp_core::CheckerBuilder).
//!
//! Each mixin keeps its state in a tracker the check's state exposes through
//! a `Has*` trait, and registers its callbacks ahead of the check's own so
//! the check reads an up-to-date tracker.

pub mod accessable;
pub mod callable;
pub mod classable;
pub mod routable;

pub use accessable::{accessable, AccessScope, HasAccessScope};
pub use callable::{call_method, callable, MethodTable};
pub use classable::{classable, ClassScope, HasClassScope};
pub use routable::{routable, HasRouteScope, RouteScope};

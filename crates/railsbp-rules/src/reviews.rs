//! Checks that report, reading the tables prepare checks filled.

pub mod always_add_db_index;
pub mod law_of_demeter;
pub mod move_model_logic_into_model;
pub mod needless_deep_nesting;
pub mod overuse_route_customizations;
pub mod protect_mass_assignment;
pub mod remove_unused_methods_in_controllers;
pub mod restrict_auto_generated_routes;

pub use always_add_db_index::AlwaysAddDbIndexReview;
pub use law_of_demeter::LawOfDemeterReview;
pub use move_model_logic_into_model::MoveModelLogicIntoModelReview;
pub use needless_deep_nesting::NeedlessDeepNestingReview;
pub use overuse_route_customizations::OveruseRouteCustomizationsReview;
pub use protect_mass_assignment::ProtectMassAssignmentReview;
pub use remove_unused_methods_in_controllers::RemoveUnusedMethodsInControllersReview;
pub use restrict_auto_generated_routes::RestrictAutoGeneratedRoutesReview;

use railsbp_core::{Kind, NodeRef};

/// Innermost receiver of a call chain (`@post` in `@post.user.name`).
///
/// Absent when the chain starts with a receiverless call or a hash.
pub(crate) fn receiver_variable(node: NodeRef<'_>) -> NodeRef<'_> {
    let mut current = node.subject();
    while current.is_any(&[Kind::Call, Kind::Field, Kind::MethodAddArg, Kind::MethodAddBlock]) {
        current = current.subject();
    }
    if current.is_any(&[Kind::Fcall, Kind::Hash, Kind::BareAssocHash]) {
        NodeRef::Absent
    } else {
        current
    }
}

//! Ownership filters.
//!
//! The same filter guards the precondition read and the conditional write of
//! a transition, so an actor can never move an order it could not see.

use common::{OrderId, PrincipalId, Role};
use order_store::{AgentMatch, OrderFilter};

use super::Transition;
use crate::identity::IdentityContext;

/// Returns the filter restricting orders to those owned by `actor` in `role`.
pub fn ownership_filter(role: Role, actor: PrincipalId) -> OrderFilter {
    match role {
        Role::Customer => OrderFilter::new().user_id(actor),
        Role::Merchant => OrderFilter::new().store_id(actor),
        Role::DeliveryAgent => OrderFilter::new().delivery_agent(AgentMatch::Is(actor)),
    }
}

/// Returns the filter selecting `order_id` for `transition` by `identity`.
///
/// Accepting an order is the one case where the agent is not yet bound, so
/// the order must either be unassigned or already bound to the caller.
pub fn transition_filter(
    transition: Transition,
    identity: &IdentityContext,
    order_id: OrderId,
) -> OrderFilter {
    let actor = identity.actor_id();
    let filter = if transition.binds_agent() {
        OrderFilter::new().delivery_agent(AgentMatch::UnassignedOr(actor))
    } else {
        ownership_filter(identity.role(), actor)
    };
    filter.order_id(order_id)
}

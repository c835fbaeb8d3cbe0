//! Domain error types.

use common::Role;
use order_store::StoreError;
use thiserror::Error;

use crate::order::OrderError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The caller has no usable identity, or the wrong role.
    #[error("Unauthorized: {0}")]
    Unauthorized(&'static str),

    /// No order matches the id together with the caller's ownership field.
    ///
    /// Deliberately the same whether the order is missing or owned by
    /// someone else.
    #[error("Order not found or does not belong to the {}", owner_noun(.role))]
    OrderNotFound { role: Role },

    /// The customer has no saved cart.
    #[error("Cart not found")]
    CartNotFound,

    /// The order or cart itself was rejected.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// An error occurred in the store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

fn owner_noun(role: &Role) -> &'static str {
    match role {
        Role::Customer => "user",
        Role::Merchant => "merchant",
        Role::DeliveryAgent => "delivery agent",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_owner_kind() {
        let err = DomainError::OrderNotFound {
            role: Role::DeliveryAgent,
        };
        assert_eq!(
            err.to_string(),
            "Order not found or does not belong to the delivery agent"
        );
    }
}

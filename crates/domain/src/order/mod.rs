//! Order state machine and related rules.

mod ownership;
mod service;
mod transition;
mod validation;

pub use ownership::{ownership_filter, transition_filter};
pub use service::OrderService;
pub use transition::Transition;
pub use validation::{validate_cart_draft, validate_items, validate_order_draft};

use common::{ItemId, Money, OrderStatus};
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// The order is not in a status the transition accepts.
    #[error("{}", .transition.rejection(.current))]
    InvalidState {
        transition: Transition,
        current: OrderStatus,
    },

    /// Another request moved the order between the read and the write, and
    /// the transition would still be legal from the new status.
    #[error("Order changed during {transition}, status is now {current}. Retry the request")]
    ConcurrencyConflict {
        transition: Transition,
        current: OrderStatus,
    },

    /// The merchant the order is placed with is missing.
    #[error("storeID is required")]
    StoreIdRequired,

    /// Order has no items.
    #[error("Order has no items")]
    NoItems,

    /// Invalid quantity.
    #[error("Invalid quantity for item {item_id}: {quantity} (must be greater than 0)")]
    InvalidQuantity { item_id: ItemId, quantity: i64 },

    /// Invalid price.
    #[error("Invalid price for item {item_id}: {price} (must not be negative)")]
    InvalidPrice { item_id: ItemId, price: Money },

    /// Invalid total.
    #[error("Invalid total amount: {0} (must not be negative)")]
    InvalidTotal(Money),
}

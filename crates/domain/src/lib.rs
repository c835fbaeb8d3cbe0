//! Domain layer for the order service.
//!
//! This crate provides the core rules of the order lifecycle:
//! - the transition table and the status each transition requires
//! - ownership filters shared by precondition reads and conditional writes
//! - identity resolution from session records
//! - order and cart services on top of the `order-store` traits

pub mod cart;
pub mod error;
pub mod identity;
pub mod order;

pub use cart::CartService;
pub use error::DomainError;
pub use identity::IdentityContext;
pub use order::{
    OrderError, OrderService, Transition, ownership_filter, transition_filter,
    validate_cart_draft, validate_order_draft,
};

//! Shared identifiers and record types for the order service.
//!
//! Everything here is plain data: the rules that govern how these records
//! change live in the `domain` crate, and persistence lives in `order-store`.

mod record;
mod status;
mod types;

pub use record::{
    CartSnapshot, DeliveryAddress, DeliveryInfo, ItemId, Money, Order, OrderDraft, OrderItem,
};
pub use status::OrderStatus;
pub use types::{OrderId, PrincipalId, Role};

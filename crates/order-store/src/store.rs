use std::sync::Arc;

use async_trait::async_trait;
use common::{CartSnapshot, Order, OrderStatus, PrincipalId};

use crate::{OrderFilter, Result, SessionRecord};

/// The mutation applied by [`OrderStore::update_one`].
///
/// A patch sets the status and can bind the delivery agent. Nothing else on
/// a stored order is ever rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderPatch {
    /// Status to set.
    pub status: OrderStatus,

    /// Agent to bind, only if no agent is bound yet.
    pub delivery_agent_id: Option<PrincipalId>,
}

impl OrderPatch {
    /// Creates a patch that sets the status.
    pub fn set_status(status: OrderStatus) -> Self {
        Self {
            status,
            delivery_agent_id: None,
        }
    }

    /// Also binds the delivery agent.
    pub fn bind_delivery_agent(mut self, agent: PrincipalId) -> Self {
        self.delivery_agent_id = Some(agent);
        self
    }

    /// Applies the patch to an in-memory order.
    pub fn apply_to(&self, order: &mut Order) {
        order.status = self.status;
        if order.delivery_info.delivery_agent_id.is_none() {
            order.delivery_info.delivery_agent_id = self.delivery_agent_id;
        }
    }
}

/// Outcome of a conditional update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateResult {
    /// Number of orders the filter selected (0 or 1).
    pub matched: u64,
}

impl UpdateResult {
    /// Returns true if an order was selected and updated.
    pub fn is_matched(&self) -> bool {
        self.matched > 0
    }
}

/// Core trait for order store implementations.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts a new order.
    ///
    /// Fails with `DuplicateOrder` if the identifier is already taken.
    async fn insert_one(&self, order: Order) -> Result<()>;

    /// Returns the first order matching the filter.
    async fn find_one(&self, filter: &OrderFilter) -> Result<Option<Order>>;

    /// Returns every order matching the filter, oldest first.
    async fn find(&self, filter: &OrderFilter) -> Result<Vec<Order>>;

    /// Atomically applies `patch` to one order matching `filter`.
    ///
    /// The filter is evaluated and the patch applied as a single step, so a
    /// filter that re-asserts the current status acts as a compare-and-set.
    /// A result with `matched == 0` means nothing was written.
    async fn update_one(&self, filter: &OrderFilter, patch: &OrderPatch) -> Result<UpdateResult>;
}

/// Storage for the one saved cart of each customer.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Inserts or wholesale replaces the cart of `cart.user_id`.
    async fn replace_cart(&self, cart: CartSnapshot) -> Result<()>;

    /// Returns the saved cart of a customer.
    async fn find_cart(&self, user_id: PrincipalId) -> Result<Option<CartSnapshot>>;
}

/// Read access to sessions written by the authentication service.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Looks up a session by its token.
    async fn find_session(&self, token: &str) -> Result<Option<SessionRecord>>;
}

#[async_trait]
impl<T: OrderStore + ?Sized> OrderStore for Arc<T> {
    async fn insert_one(&self, order: Order) -> Result<()> {
        (**self).insert_one(order).await
    }

    async fn find_one(&self, filter: &OrderFilter) -> Result<Option<Order>> {
        (**self).find_one(filter).await
    }

    async fn find(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        (**self).find(filter).await
    }

    async fn update_one(&self, filter: &OrderFilter, patch: &OrderPatch) -> Result<UpdateResult> {
        (**self).update_one(filter, patch).await
    }
}

#[async_trait]
impl<T: CartStore + ?Sized> CartStore for Arc<T> {
    async fn replace_cart(&self, cart: CartSnapshot) -> Result<()> {
        (**self).replace_cart(cart).await
    }

    async fn find_cart(&self, user_id: PrincipalId) -> Result<Option<CartSnapshot>> {
        (**self).find_cart(user_id).await
    }
}

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn find_session(&self, token: &str) -> Result<Option<SessionRecord>> {
        (**self).find_session(token).await
    }
}

#[cfg(test)]
mod tests {
    use common::{DeliveryInfo, Money, OrderId, OrderItem};

    use super::*;

    fn pid(raw: u64) -> PrincipalId {
        PrincipalId::new(raw).unwrap()
    }

    fn ready_order() -> Order {
        Order {
            order_id: OrderId::new(),
            store_id: pid(1),
            user_id: pid(2),
            items: vec![OrderItem::new("sku", "Item", 1, Money::from_cents(100))],
            total_amount: Money::from_cents(100),
            status: OrderStatus::Ready,
            delivery_info: DeliveryInfo::default(),
        }
    }

    #[test]
    fn patch_sets_only_status() {
        let mut order = ready_order();
        let before = order.clone();

        OrderPatch::set_status(OrderStatus::Cancelled).apply_to(&mut order);

        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(order.items, before.items);
        assert_eq!(order.delivery_info, before.delivery_info);
    }

    #[test]
    fn patch_binds_agent_once() {
        let mut order = ready_order();

        OrderPatch::set_status(OrderStatus::Assigned)
            .bind_delivery_agent(pid(5))
            .apply_to(&mut order);
        assert_eq!(order.delivery_agent(), Some(pid(5)));

        OrderPatch::set_status(OrderStatus::InTransit)
            .bind_delivery_agent(pid(6))
            .apply_to(&mut order);
        assert_eq!(order.delivery_agent(), Some(pid(5)));
        assert_eq!(order.status, OrderStatus::InTransit);
    }
}

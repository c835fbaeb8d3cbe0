use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{CartSnapshot, Order, PrincipalId};
use tokio::sync::RwLock;

use crate::{
    OrderFilter, Result, SessionRecord, StoreError,
    store::{CartStore, OrderPatch, OrderStore, SessionStore, UpdateResult},
};

/// In-memory order store.
///
/// Provides the same interface as the PostgreSQL implementation. Conditional
/// updates run under a single write lock, which makes them atomic.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<Vec<Order>>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of orders stored.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert_one(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        if orders.iter().any(|o| o.order_id == order.order_id) {
            return Err(StoreError::DuplicateOrder(order.order_id));
        }
        orders.push(order);
        Ok(())
    }

    async fn find_one(&self, filter: &OrderFilter) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.iter().find(|o| filter.matches(o)).cloned())
    }

    async fn find(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.iter().filter(|o| filter.matches(o)).cloned().collect())
    }

    async fn update_one(&self, filter: &OrderFilter, patch: &OrderPatch) -> Result<UpdateResult> {
        let mut orders = self.orders.write().await;
        match orders.iter_mut().find(|o| filter.matches(o)) {
            Some(order) => {
                patch.apply_to(order);
                Ok(UpdateResult { matched: 1 })
            }
            None => Ok(UpdateResult { matched: 0 }),
        }
    }
}

/// In-memory cart store keyed by customer.
#[derive(Clone, Default)]
pub struct InMemoryCartStore {
    carts: Arc<RwLock<HashMap<PrincipalId, CartSnapshot>>>,
}

impl InMemoryCartStore {
    /// Creates a new empty in-memory cart store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn replace_cart(&self, cart: CartSnapshot) -> Result<()> {
        self.carts.write().await.insert(cart.user_id, cart);
        Ok(())
    }

    async fn find_cart(&self, user_id: PrincipalId) -> Result<Option<CartSnapshot>> {
        Ok(self.carts.read().await.get(&user_id).cloned())
    }
}

/// In-memory session table, filled by whoever authenticates users.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionRecord>>>,
}

impl InMemorySessionStore {
    /// Creates a new empty in-memory session store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a session under `token`.
    pub async fn insert(&self, token: impl Into<String>, session: SessionRecord) {
        self.sessions.write().await.insert(token.into(), session);
    }

    /// Removes a session.
    pub async fn remove(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    /// Registers every session in a JSON object keyed by token, e.g.
    /// `{"tok": {"user_id": 1, "user_type": "customer"}}`.
    ///
    /// Returns how many sessions were registered.
    pub async fn load_json(&self, json: &str) -> Result<usize> {
        let seeded: HashMap<String, SessionRecord> = serde_json::from_str(json)?;
        let count = seeded.len();
        self.sessions.write().await.extend(seeded);
        Ok(count)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn find_session(&self, token: &str) -> Result<Option<SessionRecord>> {
        Ok(self.sessions.read().await.get(token).cloned())
    }
}

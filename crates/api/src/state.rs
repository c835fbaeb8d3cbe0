//! Shared application state.

use std::sync::Arc;

use domain::{CartService, OrderService};
use order_store::{
    CartStore, InMemoryCartStore, InMemoryOrderStore, InMemorySessionStore, OrderStore,
    PostgresStore, SessionStore,
};

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub orders: OrderService<Arc<dyn OrderStore>>,
    pub carts: CartService<Arc<dyn CartStore>>,
    pub sessions: Arc<dyn SessionStore>,
    pub session_cookie: String,
}

impl AppState {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        carts: Arc<dyn CartStore>,
        sessions: Arc<dyn SessionStore>,
        session_cookie: impl Into<String>,
    ) -> Self {
        Self {
            orders: OrderService::new(orders),
            carts: CartService::new(carts),
            sessions,
            session_cookie: session_cookie.into(),
        }
    }

    /// State backed by fresh in-memory stores. The session store is returned
    /// so the caller can register sessions.
    pub fn in_memory(session_cookie: impl Into<String>) -> (Self, InMemorySessionStore) {
        let sessions = InMemorySessionStore::new();
        let state = Self::new(
            Arc::new(InMemoryOrderStore::new()),
            Arc::new(InMemoryCartStore::new()),
            Arc::new(sessions.clone()),
            session_cookie,
        );
        (state, sessions)
    }

    /// State where orders, carts and sessions all live in PostgreSQL.
    pub fn postgres(store: PostgresStore, session_cookie: impl Into<String>) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store.clone(), store, session_cookie)
    }
}

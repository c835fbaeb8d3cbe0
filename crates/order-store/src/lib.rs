pub mod error;
pub mod filter;
pub mod memory;
pub mod postgres;
pub mod session;
pub mod store;

pub use common::{CartSnapshot, Order, OrderId, OrderStatus, PrincipalId};
pub use error::{Result, StoreError};
pub use filter::{AgentMatch, OrderFilter};
pub use memory::{InMemoryCartStore, InMemoryOrderStore, InMemorySessionStore};
pub use postgres::{ConnectOptions, PostgresStore};
pub use session::SessionRecord;
pub use store::{CartStore, OrderPatch, OrderStore, SessionStore, UpdateResult};

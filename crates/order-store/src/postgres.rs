use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{CartSnapshot, DeliveryInfo, Money, Order, OrderId, OrderStatus, PrincipalId};
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};
use uuid::Uuid;

use crate::{
    AgentMatch, OrderFilter, Result, SessionRecord, StoreError,
    store::{CartStore, OrderPatch, OrderStore, SessionStore, UpdateResult},
};

const ORDER_COLUMNS: &str = "id, store_id, user_id, items, total_amount_cents, status, delivery_agent_id, current_location";

/// Pool settings for the initial connection.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub max_connections: u32,

    /// Bound on establishing the pool at startup.
    pub connect_timeout: Duration,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            max_connections: 5,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// PostgreSQL-backed order, cart and session store.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database, failing with `ConnectTimeout` if the pool
    /// cannot be established within `options.connect_timeout`.
    pub async fn connect(url: &str, options: &ConnectOptions) -> Result<Self> {
        let connect = PgPoolOptions::new()
            .max_connections(options.max_connections)
            .acquire_timeout(options.connect_timeout)
            .connect(url);

        let pool = tokio::time::timeout(options.connect_timeout, connect)
            .await
            .map_err(|_| StoreError::ConnectTimeout(options.connect_timeout))??;

        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let items: serde_json::Value = row.try_get("items")?;
        let status: String = row.try_get("status")?;
        let agent: Option<i64> = row.try_get("delivery_agent_id")?;

        Ok(Order {
            order_id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            store_id: from_db_id(row.try_get("store_id")?)?,
            user_id: from_db_id(row.try_get("user_id")?)?,
            items: serde_json::from_value(items)?,
            total_amount: Money::from_cents(row.try_get("total_amount_cents")?),
            status: OrderStatus::parse(&status).ok_or_else(|| {
                StoreError::CorruptRecord(format!("unknown order status {status:?}"))
            })?,
            delivery_info: DeliveryInfo {
                delivery_agent_id: agent.map(from_db_id).transpose()?,
                current_location: row.try_get("current_location")?,
            },
        })
    }

    fn row_to_cart(row: PgRow) -> Result<CartSnapshot> {
        let items: serde_json::Value = row.try_get("items")?;
        let store: Option<i64> = row.try_get("store_id")?;

        Ok(CartSnapshot {
            user_id: from_db_id(row.try_get("user_id")?)?,
            store_id: store.map(from_db_id).transpose()?,
            items: serde_json::from_value(items)?,
            total_amount: Money::from_cents(row.try_get("total_amount_cents")?),
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        })
    }
}

fn db_id(id: PrincipalId) -> i64 {
    // PrincipalId never exceeds i64::MAX
    id.get() as i64
}

fn from_db_id(raw: i64) -> Result<PrincipalId> {
    u64::try_from(raw)
        .ok()
        .and_then(PrincipalId::new)
        .ok_or_else(|| StoreError::CorruptRecord(format!("invalid principal id {raw}")))
}

/// Appends `AND ...` clauses for every populated filter field, numbering
/// placeholders after `param_count`.
fn push_filter(filter: &OrderFilter, sql: &mut String, param_count: &mut usize) {
    if filter.order_id.is_some() {
        *param_count += 1;
        sql.push_str(&format!(" AND id = ${param_count}"));
    }
    if filter.user_id.is_some() {
        *param_count += 1;
        sql.push_str(&format!(" AND user_id = ${param_count}"));
    }
    if filter.store_id.is_some() {
        *param_count += 1;
        sql.push_str(&format!(" AND store_id = ${param_count}"));
    }
    match filter.delivery_agent {
        Some(AgentMatch::Is(_)) => {
            *param_count += 1;
            sql.push_str(&format!(" AND delivery_agent_id = ${param_count}"));
        }
        Some(AgentMatch::Unassigned) => sql.push_str(" AND delivery_agent_id IS NULL"),
        Some(AgentMatch::UnassignedOr(_)) => {
            *param_count += 1;
            sql.push_str(&format!(
                " AND (delivery_agent_id IS NULL OR delivery_agent_id = ${param_count})"
            ));
        }
        None => {}
    }
    if filter.status.is_some() {
        *param_count += 1;
        sql.push_str(&format!(" AND status = ${param_count}"));
    }
}

/// Binds filter values in the same order `push_filter` numbered them.
fn bind_filter<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    filter: &OrderFilter,
) -> Query<'q, Postgres, PgArguments> {
    if let Some(id) = filter.order_id {
        query = query.bind(id.as_uuid());
    }
    if let Some(user) = filter.user_id {
        query = query.bind(db_id(user));
    }
    if let Some(store) = filter.store_id {
        query = query.bind(db_id(store));
    }
    if let Some(AgentMatch::Is(agent) | AgentMatch::UnassignedOr(agent)) = filter.delivery_agent {
        query = query.bind(db_id(agent));
    }
    if let Some(status) = filter.status {
        query = query.bind(status.as_str());
    }
    query
}

#[async_trait]
impl OrderStore for PostgresStore {
    async fn insert_one(&self, order: Order) -> Result<()> {
        let items = serde_json::to_value(&order.items)?;
        let agent = order.delivery_agent().map(db_id);

        sqlx::query(
            r#"
            INSERT INTO orders (id, store_id, user_id, items, total_amount_cents, status, delivery_agent_id, current_location)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(order.order_id.as_uuid())
        .bind(db_id(order.store_id))
        .bind(db_id(order.user_id))
        .bind(items)
        .bind(order.total_amount.cents())
        .bind(order.status.as_str())
        .bind(agent)
        .bind(&order.delivery_info.current_location)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some("orders_pkey")
            {
                return StoreError::DuplicateOrder(order.order_id);
            }
            StoreError::Database(e)
        })?;

        Ok(())
    }

    async fn find_one(&self, filter: &OrderFilter) -> Result<Option<Order>> {
        let mut sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE 1=1");
        let mut param_count = 0;
        push_filter(filter, &mut sql, &mut param_count);
        sql.push_str(" ORDER BY created_at ASC, id ASC LIMIT 1");

        let row = bind_filter(sqlx::query(&sql), filter)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn find(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        let mut sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE 1=1");
        let mut param_count = 0;
        push_filter(filter, &mut sql, &mut param_count);
        sql.push_str(" ORDER BY created_at ASC, id ASC");

        let rows = bind_filter(sqlx::query(&sql), filter)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn update_one(&self, filter: &OrderFilter, patch: &OrderPatch) -> Result<UpdateResult> {
        // The row lock taken by the subquery makes a competing update wait,
        // then re-evaluate the filter against the committed row.
        let mut sql = String::from(
            "UPDATE orders SET status = $1, delivery_agent_id = COALESCE(delivery_agent_id, $2), updated_at = NOW() \
             WHERE id = (SELECT id FROM orders WHERE 1=1",
        );
        let mut param_count = 2;
        push_filter(filter, &mut sql, &mut param_count);
        sql.push_str(" ORDER BY created_at ASC, id ASC LIMIT 1 FOR UPDATE)");

        let query = sqlx::query(&sql)
            .bind(patch.status.as_str())
            .bind(patch.delivery_agent_id.map(db_id));
        let result = bind_filter(query, filter).execute(&self.pool).await?;

        tracing::debug!(
            matched = result.rows_affected(),
            status = %patch.status,
            "conditional order update"
        );

        Ok(UpdateResult {
            matched: result.rows_affected(),
        })
    }
}

#[async_trait]
impl CartStore for PostgresStore {
    async fn replace_cart(&self, cart: CartSnapshot) -> Result<()> {
        let items = serde_json::to_value(&cart.items)?;

        sqlx::query(
            r#"
            INSERT INTO carts (user_id, store_id, items, total_amount_cents, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE SET
                store_id = EXCLUDED.store_id,
                items = EXCLUDED.items,
                total_amount_cents = EXCLUDED.total_amount_cents,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(db_id(cart.user_id))
        .bind(cart.store_id.map(db_id))
        .bind(items)
        .bind(cart.total_amount.cents())
        .bind(cart.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_cart(&self, user_id: PrincipalId) -> Result<Option<CartSnapshot>> {
        let row = sqlx::query(
            r#"
            SELECT user_id, store_id, items, total_amount_cents, updated_at
            FROM carts
            WHERE user_id = $1
            "#,
        )
        .bind(db_id(user_id))
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_cart).transpose()
    }
}

#[async_trait]
impl SessionStore for PostgresStore {
    async fn find_session(&self, token: &str) -> Result<Option<SessionRecord>> {
        let row = sqlx::query(
            r#"
            SELECT user_id, user_type, expires_at
            FROM sessions
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(SessionRecord {
                user_id: row.try_get("user_id")?,
                user_type: row.try_get("user_type")?,
                expires_at: row.try_get("expires_at")?,
            })),
            None => Ok(None),
        }
    }
}

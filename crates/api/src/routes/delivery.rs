//! Delivery agent endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::{Extension, Json};
use common::Order;
use domain::IdentityContext;

use super::{MessageResponse, parse_order_id};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /deliveryagent/get: orders bound to this agent.
#[tracing::instrument(skip_all)]
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<IdentityContext>,
) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.orders.orders_for_agent(&identity).await?))
}

/// GET /deliveryagent/available: ready orders nobody has claimed.
#[tracing::instrument(skip_all)]
pub async fn available_orders(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<IdentityContext>,
) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.orders.available_orders(&identity).await?))
}

/// POST /deliveryagent/accept/{orderID}
#[tracing::instrument(skip(state, identity))]
pub async fn accept_order(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let order_id = parse_order_id(&id, &identity)?;
    state.orders.accept_order(&identity, order_id).await?;
    Ok(MessageResponse::new("Order accepted successfully"))
}

/// POST /deliveryagent/verify/{orderID}: complete the delivery.
#[tracing::instrument(skip(state, identity))]
pub async fn verify_delivery(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let order_id = parse_order_id(&id, &identity)?;
    state.orders.verify_delivery(&identity, order_id).await?;
    Ok(MessageResponse::new("Delivery verified successfully"))
}

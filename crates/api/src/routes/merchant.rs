//! Merchant endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::{Extension, Json};
use common::Order;
use domain::IdentityContext;

use super::{MessageResponse, parse_order_id};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /merchant/get: every order placed with this merchant.
#[tracing::instrument(skip_all)]
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<IdentityContext>,
) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.orders.orders_for_merchant(&identity).await?))
}

/// POST /merchant/confirm/{orderID}
#[tracing::instrument(skip(state, identity))]
pub async fn confirm_order(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let order_id = parse_order_id(&id, &identity)?;
    state.orders.confirm_order(&identity, order_id).await?;
    Ok(MessageResponse::new("Order confirmed successfully"))
}

/// POST /merchant/ready/{orderID}
#[tracing::instrument(skip(state, identity))]
pub async fn mark_ready(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let order_id = parse_order_id(&id, &identity)?;
    state.orders.mark_ready(&identity, order_id).await?;
    Ok(MessageResponse::new("Order marked as ready for pickup"))
}

/// POST /merchant/verify/{orderID}: hand the order to its delivery agent.
#[tracing::instrument(skip(state, identity))]
pub async fn verify_pickup(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let order_id = parse_order_id(&id, &identity)?;
    state.orders.verify_pickup(&identity, order_id).await?;
    Ok(MessageResponse::new("Pickup verified successfully"))
}

//! Customer endpoints: cart, placement, cancellation and tracking.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use common::{CartSnapshot, OrderDraft, OrderStatus};
use domain::IdentityContext;
use serde::Serialize;

use super::{MessageResponse, json_body, parse_order_id};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct OrderPlacedResponse {
    pub message: &'static str,
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub status: OrderStatus,
}

/// POST /customer/savecart: replace the saved cart.
#[tracing::instrument(skip_all)]
pub async fn save_cart(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<IdentityContext>,
    body: Result<Json<OrderDraft>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let draft = json_body(body)?;
    state.carts.save_cart(&identity, draft).await?;
    Ok(MessageResponse::new("Cart saved successfully"))
}

/// GET /customer/getcart: read the saved cart.
#[tracing::instrument(skip_all)]
pub async fn get_cart(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<IdentityContext>,
) -> Result<Json<CartSnapshot>, ApiError> {
    Ok(Json(state.carts.get_cart(&identity).await?))
}

/// POST /customer/place: place a new order.
#[tracing::instrument(skip_all)]
pub async fn place_order(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<IdentityContext>,
    body: Result<Json<OrderDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderPlacedResponse>), ApiError> {
    let draft = json_body(body)?;
    let order = state.orders.place_order(&identity, draft).await?;
    Ok((
        StatusCode::CREATED,
        Json(OrderPlacedResponse {
            message: "Order placed successfully",
            id: order.order_id.to_string(),
        }),
    ))
}

/// POST /customer/cancel/{orderID}
#[tracing::instrument(skip(state, identity))]
pub async fn cancel_order(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let order_id = parse_order_id(&id, &identity)?;
    state.orders.cancel_order(&identity, order_id).await?;
    Ok(MessageResponse::new("Order canceled successfully"))
}

/// GET /customer/track/{orderID}
#[tracing::instrument(skip(state, identity))]
pub async fn track_order(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> Result<Json<TrackResponse>, ApiError> {
    let order_id = parse_order_id(&id, &identity)?;
    let status = state.orders.track_order(&identity, order_id).await?;
    Ok(Json(TrackResponse { status }))
}

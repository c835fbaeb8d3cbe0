//! HTTP route handlers.

pub mod customer;
pub mod delivery;
pub mod health;
pub mod merchant;
pub mod metrics;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use common::OrderId;
use domain::{DomainError, IdentityContext};
use serde::Serialize;

use crate::error::ApiError;

/// Body of a successful state-changing request.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Json<Self> {
        Json(Self { message })
    }
}

/// Parses an order id from the path. An id that is not a UUID cannot name
/// an owned order, so it is reported like any other unknown order.
fn parse_order_id(raw: &str, identity: &IdentityContext) -> Result<OrderId, ApiError> {
    OrderId::parse(raw).ok_or_else(|| {
        DomainError::OrderNotFound {
            role: identity.role(),
        }
        .into()
    })
}

/// Unwraps a JSON body, turning any rejection into a 400.
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "invalid request payload");
            Err(ApiError::BadRequest("Invalid request payload".to_string()))
        }
    }
}

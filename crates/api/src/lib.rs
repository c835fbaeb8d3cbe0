//! HTTP API server for the order lifecycle service.
//!
//! Provides role-scoped REST endpoints for customers, merchants and
//! delivery agents, with structured logging (tracing) and Prometheus
//! metrics.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use common::Role;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    let customer = Router::new()
        .route("/savecart", post(routes::customer::save_cart))
        .route("/getcart", get(routes::customer::get_cart))
        .route("/place", post(routes::customer::place_order))
        .route("/cancel/{id}", post(routes::customer::cancel_order))
        .route("/track/{id}", get(routes::customer::track_order))
        .route_layer(from_fn_with_state(
            (state.clone(), Role::Customer),
            auth::authenticate,
        ));

    let merchant = Router::new()
        .route("/get", get(routes::merchant::list_orders))
        .route("/confirm/{id}", post(routes::merchant::confirm_order))
        .route("/ready/{id}", post(routes::merchant::mark_ready))
        .route("/verify/{id}", post(routes::merchant::verify_pickup))
        .route_layer(from_fn_with_state(
            (state.clone(), Role::Merchant),
            auth::authenticate,
        ));

    let delivery = Router::new()
        .route("/get", get(routes::delivery::list_orders))
        .route("/available", get(routes::delivery::available_orders))
        .route("/accept/{id}", post(routes::delivery::accept_order))
        .route("/verify/{id}", post(routes::delivery::verify_delivery))
        .route_layer(from_fn_with_state(
            (state.clone(), Role::DeliveryAgent),
            auth::authenticate,
        ));

    let api = Router::new()
        .nest("/customer", customer)
        .nest("/merchant", merchant)
        .nest("/deliveryagent", delivery);

    Router::new()
        .route("/health", get(routes::health::check))
        .nest("/api/v1", api)
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

//! quickshop HTTP Server
//!
//! Axum-based server exposing the storefront API: catalog listing, checkout
//! session creation, the payment webhook, and the diagnostic transaction log.

pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{
    create_checkout_session, gateway_webhook, health_check, list_products, list_transactions,
};
pub use crate::state::AppState;

/// Build the application router over the given state
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/products", get(list_products))
        .route("/api/create-checkout-session", post(create_checkout_session))
        .route("/webhook", post(gateway_webhook))
        .route("/api/transactions", get(list_transactions))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

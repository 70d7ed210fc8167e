//! HTTP Handlers

use axum::{
    body::Bytes,
    extract::State,
    http::{header::ORIGIN, HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use shop_core::Product;
use shop_payments::{
    verify_signature, CheckoutRequest, PaymentError, Transaction, TransactionStore, WebhookEvent,
    WebhookProcessor, SIGNATURE_TOLERANCE,
};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub gateway_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct CheckoutSessionResponse {
    pub url: String,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, error: impl Into<String>, code: &str) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        gateway_configured: state.checkout.is_some(),
    })
}

/// Product catalog
pub async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.catalog.as_ref().clone())
}

/// Create a gateway-hosted checkout session from a cart snapshot
pub async fn create_checkout_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CheckoutRequest>,
) -> Result<Json<CheckoutSessionResponse>, HandlerError> {
    let checkout = state.checkout.as_ref().ok_or_else(|| {
        error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Payments not configured",
            "PAYMENTS_DISABLED",
        )
    })?;

    let origin = headers
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(&state.public_origin);

    let session = checkout
        .create_session(&payload, origin)
        .await
        .map_err(|e| match e {
            PaymentError::InvalidRequest(_) => {
                error_response(StatusCode::BAD_REQUEST, e.to_string(), "INVALID_REQUEST")
            }
            _ => {
                tracing::error!(error = %e, "checkout session creation failed");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    e.user_message(),
                    "GATEWAY_ERROR",
                )
            }
        })?;

    Ok(Json(CheckoutSessionResponse { url: session.url }))
}

/// Gateway payment webhook.
///
/// The body is taken as raw bytes so the signature can be recomputed over
/// exactly what was sent. Only verification and parse failures produce a
/// non-success response; handled events are always acknowledged so the
/// gateway stops retrying.
pub async fn gateway_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, HandlerError> {
    let secret = state.webhook_secret.as_ref().ok_or_else(|| {
        error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Payments not configured",
            "PAYMENTS_DISABLED",
        )
    })?;

    let signature = headers
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            error_response(
                StatusCode::BAD_REQUEST,
                "Missing signature header",
                "MISSING_SIGNATURE",
            )
        })?;

    verify_signature(&body, signature, secret, SIGNATURE_TOLERANCE).map_err(|e| {
        tracing::warn!(error = %e, "webhook signature verification failed");
        error_response(StatusCode::BAD_REQUEST, "Invalid signature", "INVALID_SIGNATURE")
    })?;

    let event = WebhookEvent::parse(&body).map_err(|e| {
        tracing::warn!(error = %e, "webhook payload rejected");
        error_response(StatusCode::BAD_REQUEST, "Malformed payload", "INVALID_PAYLOAD")
    })?;

    let processor = WebhookProcessor::new(state.transactions.clone(), state.notifier.clone());
    processor.handle(event).await.map_err(|e| {
        tracing::error!(error = %e, "webhook processing error");
        error_response(
            StatusCode::BAD_REQUEST,
            "Webhook processing failed",
            "WEBHOOK_ERROR",
        )
    })?;

    Ok(Json(json!({ "received": true })))
}

/// Recorded transactions (diagnostic endpoint)
pub async fn list_transactions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Transaction>>, HandlerError> {
    let transactions = state.transactions.list().map_err(|e| {
        tracing::error!(error = %e, "transaction listing failed");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Storage error", "STORAGE_ERROR")
    })?;

    Ok(Json(transactions))
}

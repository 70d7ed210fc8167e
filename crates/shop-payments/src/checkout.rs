//! Checkout Orchestration
//!
//! Implements the hosted-checkout approach: the storefront turns a cart
//! snapshot into a gateway-hosted payment session and redirects the browser
//! there. The gateway redirects back on success or cancel.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────────┐     ┌─────────────┐
//! │  Storefront │────▶│  Gateway Hosted │────▶│  Storefront │
//! │   (cart)    │     │  Checkout Page  │     │  (success)  │
//! └─────────────┘     └─────────────────┘     └─────────────┘
//! ```
//!
//! The gateway is the sole source of session state until the completion
//! webhook fires; nothing about a pending session is cached server-side.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use stripe::{
    CheckoutSession as StripeCheckoutSession, CheckoutSessionMode, Client, CreateCheckoutSession,
    CreateCheckoutSessionLineItems, CreateCheckoutSessionLineItemsPriceData,
    CreateCheckoutSessionLineItemsPriceDataProductData, Currency,
};

use shop_core::OrderItem;

use crate::error::{PaymentError, Result};

/// Metadata key carrying the serialized order snapshot through the gateway.
///
/// The completion event only carries the gateway's own line items, so the
/// original catalog ids and titles must travel through session metadata to be
/// recoverable for the transaction record.
pub const ORDER_ITEMS_METADATA_KEY: &str = "order_items";

/// Bound on the outbound gateway round trip
const GATEWAY_TIMEOUT: Duration = Duration::from_secs(15);

/// Request to create a checkout session: the cart snapshot taken at
/// initiation, decoupled from later cart mutations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<OrderItem>,
}

/// One line item in the gateway's shape (unit price in minor currency units)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayLineItem {
    pub name: String,
    pub unit_amount: i64,
    pub quantity: u64,
}

/// Fully-prepared session parameters handed to the gateway
#[derive(Clone, Debug)]
pub struct SessionParams {
    pub line_items: Vec<GatewayLineItem>,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: HashMap<String, String>,
}

/// Result of creating a checkout session: an opaque session id and the URL
/// the browser is redirected to. Consumed once, never mutated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// The external payment gateway, specified at its interface only
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_session(&self, params: SessionParams) -> Result<CheckoutSession>;
}

/// Stripe-hosted checkout gateway
pub struct StripeGateway {
    client: Client,
}

impl StripeGateway {
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| PaymentError::Config("STRIPE_SECRET_KEY not set".into()))?;
        Ok(Self::new(&secret_key))
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_session(&self, params: SessionParams) -> Result<CheckoutSession> {
        let mut create = CreateCheckoutSession::new();
        create.mode = Some(CheckoutSessionMode::Payment);
        create.success_url = Some(&params.success_url);
        create.cancel_url = Some(&params.cancel_url);
        create.metadata = Some(params.metadata.clone());

        create.line_items = Some(
            params
                .line_items
                .iter()
                .map(|item| CreateCheckoutSessionLineItems {
                    quantity: Some(item.quantity),
                    price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                        currency: Currency::USD,
                        unit_amount: Some(item.unit_amount),
                        product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                            name: item.name.clone(),
                            ..Default::default()
                        }),
                        ..Default::default()
                    }),
                    ..Default::default()
                })
                .collect(),
        );

        let session = StripeCheckoutSession::create(&self.client, create)
            .await
            .map_err(|e| PaymentError::Gateway(e.to_string()))?;

        let url = session
            .url
            .ok_or_else(|| PaymentError::Gateway("no checkout URL returned".into()))?;

        Ok(CheckoutSession {
            id: session.id.to_string(),
            url,
        })
    }
}

/// Server-side checkout orchestrator.
///
/// Validates the snapshot, converts it into the gateway's line-item shape,
/// and submits a single create-session call. Carries no shared mutable
/// state, so concurrent checkouts from different carts need no coordination.
pub struct CheckoutOrchestrator {
    gateway: Arc<dyn PaymentGateway>,
}

impl CheckoutOrchestrator {
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { gateway }
    }

    /// Create a hosted checkout session for the given snapshot.
    ///
    /// `origin` is the requesting origin; the success redirect carries a
    /// session-id placeholder the gateway substitutes on completion, and the
    /// cancel redirect leads back to the cart view.
    pub async fn create_session(
        &self,
        request: &CheckoutRequest,
        origin: &str,
    ) -> Result<CheckoutSession> {
        validate(&request.items)?;

        let snapshot = serde_json::to_string(&request.items)
            .map_err(|e| PaymentError::InvalidRequest(e.to_string()))?;
        let metadata = HashMap::from([(ORDER_ITEMS_METADATA_KEY.to_string(), snapshot)]);

        let params = SessionParams {
            line_items: request
                .items
                .iter()
                .map(to_line_item)
                .collect::<Result<_>>()?,
            success_url: format!("{origin}/success?session_id={{CHECKOUT_SESSION_ID}}"),
            cancel_url: format!("{origin}/cart"),
            metadata,
        };

        tokio::time::timeout(GATEWAY_TIMEOUT, self.gateway.create_session(params))
            .await
            .map_err(|_| PaymentError::Gateway("gateway call timed out".into()))?
    }
}

fn validate(items: &[OrderItem]) -> Result<()> {
    if items.is_empty() {
        return Err(PaymentError::InvalidRequest("no items provided".into()));
    }
    for item in items {
        if item.quantity < 1 {
            return Err(PaymentError::InvalidRequest(format!(
                "item {}: quantity must be at least 1",
                item.id
            )));
        }
        if item.price.is_sign_negative() {
            return Err(PaymentError::InvalidRequest(format!(
                "item {}: price must not be negative",
                item.id
            )));
        }
    }
    Ok(())
}

/// Convert to the gateway shape: unit price in minor currency units, rounded
/// to the nearest cent (half away from zero).
fn to_line_item(item: &OrderItem) -> Result<GatewayLineItem> {
    let minor = (item.price * Decimal::from(100))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let unit_amount = minor.to_i64().ok_or_else(|| {
        PaymentError::InvalidRequest(format!("item {}: price out of range", item.id))
    })?;

    Ok(GatewayLineItem {
        name: item.title.clone(),
        unit_amount,
        quantity: u64::from(item.quantity),
    })
}

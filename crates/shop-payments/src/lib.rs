//! # shop-payments
//!
//! Checkout orchestration and payment webhook processing for quickshop.
//!
//! ## Order-processing pipeline
//!
//! ```text
//! ┌──────────┐  snapshot  ┌──────────────┐  session URL  ┌─────────────┐
//! │   Cart   │───────────▶│   Checkout   │──────────────▶│   Gateway   │
//! │  Store   │            │ Orchestrator │               │  Hosted UI  │
//! └──────────┘            └──────────────┘               └──────┬──────┘
//!                                                               │ webhook
//!                                                               ▼ (async)
//!                         ┌──────────────┐   append     ┌──────────────┐
//!                         │   Webhook    │─────────────▶│ Transaction  │
//!                         │  Processor   │  if absent   │     Log      │
//!                         └──────┬───────┘              └──────────────┘
//!                                │ fire-and-forget
//!                                ▼
//!                         ┌──────────────┐
//!                         │   Notifier   │
//!                         └──────────────┘
//! ```
//!
//! The webhook leg consumes the gateway's at-least-once delivery contract:
//! the same completion event may arrive more than once, so recording is
//! idempotent, keyed by the gateway session id at the storage boundary.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shop_payments::{CheckoutOrchestrator, CheckoutRequest, StripeGateway};
//!
//! let gateway = Arc::new(StripeGateway::from_env()?);
//! let orchestrator = CheckoutOrchestrator::new(gateway);
//!
//! let session = orchestrator
//!     .create_session(&CheckoutRequest { items: cart.snapshot() }, "https://shop.example.com")
//!     .await?;
//!
//! // Redirect the browser to: session.url
//! ```

mod checkout;
mod error;
mod notify;
mod transaction;
mod webhook;

pub use checkout::{
    CheckoutOrchestrator, CheckoutRequest, CheckoutSession, GatewayLineItem, PaymentGateway,
    SessionParams, StripeGateway, ORDER_ITEMS_METADATA_KEY,
};
pub use error::{PaymentError, Result};
pub use notify::{NoopNotifier, Notifier, OrderConfirmation, SmtpNotifier};
pub use transaction::{MemoryTransactionStore, Transaction, TransactionStore};
pub use webhook::{
    verify_signature, WebhookEvent, WebhookOutcome, WebhookProcessor, CHECKOUT_COMPLETED,
    SIGNATURE_TOLERANCE,
};

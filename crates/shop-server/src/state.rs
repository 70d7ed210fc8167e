//! Application State

use std::sync::Arc;

use shop_core::Product;
use shop_payments::{CheckoutOrchestrator, MemoryTransactionStore, Notifier};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Product catalog (static in this deployment)
    pub catalog: Arc<Vec<Product>>,

    /// Checkout orchestrator (None when the gateway is not configured)
    pub checkout: Option<Arc<CheckoutOrchestrator>>,

    /// Shared secret for webhook signature verification
    /// (None disables the webhook endpoint)
    pub webhook_secret: Option<String>,

    /// Fallback origin for redirect URLs when the request carries none
    pub public_origin: String,

    /// Append-only transaction log
    pub transactions: Arc<MemoryTransactionStore>,

    /// Confirmation notifier
    pub notifier: Arc<dyn Notifier>,
}

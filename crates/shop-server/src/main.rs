//! quickshop server binary

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shop_core::catalog;
use shop_payments::{
    CheckoutOrchestrator, MemoryTransactionStore, NoopNotifier, Notifier, SmtpNotifier,
    StripeGateway,
};
use shop_server::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Initialize the payment gateway
    let checkout = match StripeGateway::from_env() {
        Ok(gateway) => {
            tracing::info!("✓ Stripe configured");
            Some(Arc::new(CheckoutOrchestrator::new(Arc::new(gateway))))
        }
        Err(_) => {
            tracing::warn!("⚠ Stripe not configured - checkout disabled");
            tracing::warn!("  Set STRIPE_SECRET_KEY in .env");
            None
        }
    };

    let webhook_secret = std::env::var("STRIPE_WEBHOOK_SECRET").ok();
    if webhook_secret.is_none() {
        tracing::warn!("⚠ STRIPE_WEBHOOK_SECRET not set - webhook disabled");
    }

    // Confirmation notifier
    let notifier: Arc<dyn Notifier> = match SmtpNotifier::from_env() {
        Ok(notifier) => {
            tracing::info!("✓ SMTP configured");
            Arc::new(notifier)
        }
        Err(_) => {
            tracing::warn!("⚠ SMTP not configured - confirmations will be logged only");
            Arc::new(NoopNotifier)
        }
    };

    // Build application state
    let state = AppState {
        catalog: Arc::new(catalog::demo_products()),
        checkout,
        webhook_secret,
        public_origin: std::env::var("SHOP_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".into()),
        transactions: Arc::new(MemoryTransactionStore::new()),
        notifier,
    };

    let app = shop_server::router(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 quickshop server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                       - Health check");
    tracing::info!("  GET  /api/products                 - Product catalog");
    tracing::info!("  POST /api/create-checkout-session  - Create checkout session");
    tracing::info!("  POST /webhook                      - Payment webhook");
    tracing::info!("  GET  /api/transactions             - Transaction log");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}

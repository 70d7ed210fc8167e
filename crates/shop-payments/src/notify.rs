//! Order Confirmation Notifications
//!
//! The email transport is an external collaborator; this module defines the
//! dispatch interface, the confirmation content, and an SMTP implementation.
//! Failures here are reported to the caller and logged, never propagated
//! into transaction recording.

use async_trait::async_trait;
use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use rust_decimal::Decimal;

use shop_core::OrderItem;

use crate::error::{PaymentError, Result};

/// Confirmation payload for a settled order
#[derive(Clone, Debug)]
pub struct OrderConfirmation {
    /// Customer contact
    pub to: String,

    /// Gateway session id, doubling as the order id shown to the customer
    pub session_id: String,

    /// Settled amount in major currency units
    pub amount: Decimal,

    /// Settlement currency
    pub currency: String,

    /// Purchased items from the order snapshot
    pub items: Vec<OrderItem>,
}

impl OrderConfirmation {
    pub fn subject(&self) -> &'static str {
        "Order Confirmation - Thank you for your purchase!"
    }

    /// HTML body: order id, settled amount, one line per purchased item
    pub fn html_body(&self) -> String {
        let mut item_lines = String::new();
        for item in &self.items {
            item_lines.push_str(&format!(
                "<div style=\"border-bottom: 1px solid #d1d5db; padding: 10px 0;\">\
                 <p><strong>{}</strong></p>\
                 <p>Quantity: {} x ${} = ${}</p>\
                 </div>",
                item.title,
                item.quantity,
                item.price,
                item.line_total(),
            ));
        }

        format!(
            "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
             <h1>Order Confirmation</h1>\
             <p>Thank you for your purchase! Your order has been confirmed.</p>\
             <p><strong>Order ID:</strong> {}</p>\
             <p><strong>Amount:</strong> ${}</p>\
             <h3>Items Purchased:</h3>{item_lines}\
             <p>Your order will be processed within 1-2 business days.</p>\
             </div>",
            self.session_id, self.amount,
        )
    }
}

/// Confirmation dispatch interface
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_confirmation(&self, confirmation: &OrderConfirmation) -> Result<()>;
}

/// SMTP-backed notifier
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpNotifier {
    pub fn new(
        host: &str,
        port: u16,
        username: &str,
        password: &str,
        from: impl Into<String>,
    ) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| PaymentError::Config(e.to_string()))?
            .port(port)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build();

        Ok(Self {
            transport,
            from: from.into(),
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("SMTP_HOST")
            .map_err(|_| PaymentError::Config("SMTP_HOST not set".into()))?;
        let port = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(587);
        let username = std::env::var("SMTP_USERNAME").unwrap_or_default();
        let password = std::env::var("SMTP_PASSWORD").unwrap_or_default();
        let from = std::env::var("MAIL_FROM")
            .unwrap_or_else(|_| "QuickShop <noreply@quickshop.com>".into());

        Self::new(&host, port, &username, &password, from)
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_confirmation(&self, confirmation: &OrderConfirmation) -> Result<()> {
        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| PaymentError::Config(format!("invalid sender address: {e}")))?,
            )
            .to(confirmation
                .to
                .parse()
                .map_err(|e| PaymentError::Notification(format!("invalid recipient: {e}")))?)
            .subject(confirmation.subject())
            .header(ContentType::TEXT_HTML)
            .body(confirmation.html_body())
            .map_err(|e| PaymentError::Notification(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| PaymentError::Notification(e.to_string()))?;

        tracing::debug!(to = %confirmation.to, "confirmation email accepted by relay");
        Ok(())
    }
}

/// Logs instead of sending; used when SMTP is not configured and in tests
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send_confirmation(&self, confirmation: &OrderConfirmation) -> Result<()> {
        tracing::info!(
            to = %confirmation.to,
            session_id = %confirmation.session_id,
            "SMTP not configured, skipping confirmation email"
        );
        Ok(())
    }
}

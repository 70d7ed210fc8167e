//! Payment Webhook Processing
//!
//! Handles the gateway's asynchronous completion notifications. Per inbound
//! delivery: verify the signature over the raw body, filter for the
//! completion event type, record the transaction exactly once, then dispatch
//! the confirmation notification behind its own error boundary.
//!
//! The gateway delivers at-least-once: the same completion event may arrive
//! redundantly, and deliveries for different sessions may arrive concurrently
//! or out of order. Deduplication is the consumer's job, keyed by session id.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use serde::Deserialize;
use sha2::Sha256;

use shop_core::OrderItem;

use crate::checkout::ORDER_ITEMS_METADATA_KEY;
use crate::error::{PaymentError, Result};
use crate::notify::{Notifier, OrderConfirmation};
use crate::transaction::{Transaction, TransactionStore};

type HmacSha256 = Hmac<Sha256>;

/// The only event type that triggers transaction recording
pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

/// Accepted skew between the signature timestamp and the local clock
pub const SIGNATURE_TOLERANCE: Duration = Duration::from_secs(300);

/// Bound on the confirmation dispatch; the acknowledgment to the gateway is
/// never delayed past this.
const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Verify a `t=<unix>,v1=<hex>` signature header against the raw payload.
///
/// The expected signature is HMAC-SHA256 over `"{t}.{payload}"` with the
/// shared webhook secret. Stale timestamps are rejected to limit replays.
/// The comparison is constant-time.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance: Duration,
) -> Result<()> {
    let (timestamp, provided) = parse_signature_header(header)?;

    let skew = (Utc::now().timestamp() - timestamp).unsigned_abs();
    if skew > tolerance.as_secs() {
        return Err(PaymentError::SignatureInvalid(
            "timestamp outside tolerance".into(),
        ));
    }

    let provided = hex::decode(provided)
        .map_err(|_| PaymentError::SignatureInvalid("signature is not hex".into()))?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PaymentError::SignatureInvalid(e.to_string()))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    mac.verify_slice(&provided)
        .map_err(|_| PaymentError::SignatureInvalid("signature mismatch".into()))
}

fn parse_signature_header(header: &str) -> Result<(i64, &str)> {
    let mut timestamp = None;
    let mut signature = None;

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse::<i64>().ok(),
            Some(("v1", value)) => signature = Some(value),
            _ => {}
        }
    }

    match (timestamp, signature) {
        (Some(t), Some(s)) => Ok((t, s)),
        _ => Err(PaymentError::SignatureInvalid(
            "malformed signature header".into(),
        )),
    }
}

/// Inbound gateway event, parsed from the verified payload
#[derive(Clone, Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EventData {
    pub object: SessionObject,
}

/// The gateway's view of a checkout session as delivered in events
#[derive(Clone, Debug, Deserialize)]
pub struct SessionObject {
    pub id: String,

    /// Settled amount in minor currency units
    pub amount_total: Option<i64>,

    pub currency: Option<String>,

    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,

    #[serde(default)]
    pub metadata: std::collections::HashMap<String, String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CustomerDetails {
    pub email: Option<String>,
}

impl WebhookEvent {
    /// Parse the raw (already signature-verified) payload
    pub fn parse(payload: &[u8]) -> Result<Self> {
        serde_json::from_slice(payload).map_err(|e| PaymentError::WebhookParse(e.to_string()))
    }
}

/// How a verified delivery was handled
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// First delivery for this session; a transaction was appended
    Recorded { session_id: String },

    /// Redundant delivery; the transaction already existed
    Duplicate { session_id: String },

    /// Event type carries no side effects here
    Ignored { event_type: String },
}

/// Processes verified webhook deliveries
pub struct WebhookProcessor<S: TransactionStore> {
    store: Arc<S>,
    notifier: Arc<dyn Notifier>,
}

impl<S: TransactionStore> WebhookProcessor<S> {
    pub fn new(store: Arc<S>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Handle one verified event.
    ///
    /// Every recognized shape resolves to an outcome the caller acknowledges
    /// as success, so the gateway stops retrying; only verification and parse
    /// failures surface as non-success responses.
    pub async fn handle(&self, event: WebhookEvent) -> Result<WebhookOutcome> {
        tracing::info!(event_type = %event.event_type, "processing gateway webhook");

        if event.event_type != CHECKOUT_COMPLETED {
            tracing::debug!(event_type = %event.event_type, "ignoring webhook event");
            return Ok(WebhookOutcome::Ignored {
                event_type: event.event_type,
            });
        }

        let transaction = record_from(&event.data.object)?;
        let session_id = transaction.id.clone();
        let confirmation = transaction.customer_email.as_ref().map(|email| {
            OrderConfirmation {
                to: email.clone(),
                session_id: transaction.id.clone(),
                amount: transaction.amount,
                currency: transaction.currency.clone(),
                items: transaction.items.clone(),
            }
        });

        if !self.store.append_if_absent(transaction)? {
            tracing::info!(
                session_id = %session_id,
                "redundant delivery, transaction already recorded"
            );
            return Ok(WebhookOutcome::Duplicate { session_id });
        }

        tracing::info!(session_id = %session_id, "transaction recorded");

        // Notification runs after the record, inside its own error boundary;
        // failure or timeout never unwinds the transaction or the ack.
        if let Some(confirmation) = confirmation {
            match tokio::time::timeout(
                NOTIFY_TIMEOUT,
                self.notifier.send_confirmation(&confirmation),
            )
            .await
            {
                Ok(Ok(())) => {
                    tracing::info!(session_id = %session_id, "confirmation notification sent");
                }
                Ok(Err(e)) => {
                    tracing::warn!(
                        session_id = %session_id,
                        error = %e,
                        "confirmation notification failed"
                    );
                }
                Err(_) => {
                    tracing::warn!(
                        session_id = %session_id,
                        "confirmation notification timed out"
                    );
                }
            }
        }

        Ok(WebhookOutcome::Recorded { session_id })
    }
}

/// Build the transaction record from the session in a completion event.
/// Amounts arrive in minor currency units.
fn record_from(session: &SessionObject) -> Result<Transaction> {
    let items: Vec<OrderItem> = match session.metadata.get(ORDER_ITEMS_METADATA_KEY) {
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| PaymentError::WebhookParse(format!("order snapshot in metadata: {e}")))?,
        None => Vec::new(),
    };

    Ok(Transaction {
        id: session.id.clone(),
        amount: Decimal::new(session.amount_total.unwrap_or(0), 2),
        currency: session.currency.clone().unwrap_or_else(|| "usd".into()),
        customer_email: session
            .customer_details
            .as_ref()
            .and_then(|details| details.email.clone()),
        items,
        created_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NoopNotifier;
    use crate::transaction::MemoryTransactionStore;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sign(payload: &[u8], secret: &str, timestamp: i64) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{timestamp}.").as_bytes());
        mac.update(payload);
        format!("t={timestamp},v1={}", hex::encode(mac.finalize().into_bytes()))
    }

    fn completion_payload(session_id: &str, amount_total: i64) -> Vec<u8> {
        let snapshot = serde_json::json!([
            { "id": "1", "title": "Premium Wireless Headphones", "price": "299", "quantity": 1 },
            { "id": "7", "title": "Ceramic Coffee Mug", "price": "24", "quantity": 2 },
        ]);
        serde_json::json!({
            "type": CHECKOUT_COMPLETED,
            "data": {
                "object": {
                    "id": session_id,
                    "amount_total": amount_total,
                    "currency": "usd",
                    "customer_details": { "email": "buyer@example.com" },
                    "metadata": { ORDER_ITEMS_METADATA_KEY: snapshot.to_string() },
                }
            }
        })
        .to_string()
        .into_bytes()
    }

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn send_confirmation(&self, _confirmation: &OrderConfirmation) -> Result<()> {
            Err(PaymentError::Notification("smtp relay unreachable".into()))
        }
    }

    #[derive(Default)]
    struct CountingNotifier {
        sent: AtomicUsize,
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        async fn send_confirmation(&self, _confirmation: &OrderConfirmation) -> Result<()> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_valid_signature_accepted() {
        let payload = completion_payload("sess_123", 34700);
        let header = sign(&payload, "whsec_test", Utc::now().timestamp());

        verify_signature(&payload, &header, "whsec_test", SIGNATURE_TOLERANCE).unwrap();
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let payload = completion_payload("sess_123", 34700);
        let header = sign(&payload, "whsec_test", Utc::now().timestamp());

        let mut tampered = payload.clone();
        tampered[20] ^= 1;

        let result = verify_signature(&tampered, &header, "whsec_test", SIGNATURE_TOLERANCE);
        assert!(matches!(result, Err(PaymentError::SignatureInvalid(_))));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let payload = completion_payload("sess_123", 34700);
        let header = sign(&payload, "whsec_other", Utc::now().timestamp());

        let result = verify_signature(&payload, &header, "whsec_test", SIGNATURE_TOLERANCE);
        assert!(matches!(result, Err(PaymentError::SignatureInvalid(_))));
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let payload = completion_payload("sess_123", 34700);
        let stale = Utc::now().timestamp() - 3600;
        let header = sign(&payload, "whsec_test", stale);

        let result = verify_signature(&payload, &header, "whsec_test", SIGNATURE_TOLERANCE);
        assert!(matches!(result, Err(PaymentError::SignatureInvalid(_))));
    }

    #[test]
    fn test_malformed_header_rejected() {
        let payload = completion_payload("sess_123", 34700);

        for header in ["", "v1=deadbeef", "t=notanumber,v1=deadbeef", "garbage"] {
            let result = verify_signature(&payload, header, "whsec_test", SIGNATURE_TOLERANCE);
            assert!(
                matches!(result, Err(PaymentError::SignatureInvalid(_))),
                "header {header:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_completion_event_recorded() {
        let store = Arc::new(MemoryTransactionStore::new());
        let processor = WebhookProcessor::new(store.clone(), Arc::new(NoopNotifier));

        let event = WebhookEvent::parse(&completion_payload("sess_123", 34700)).unwrap();
        let outcome = processor.handle(event).await.unwrap();

        assert_eq!(
            outcome,
            WebhookOutcome::Recorded {
                session_id: "sess_123".into()
            }
        );

        let recorded = store.list().unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].id, "sess_123");
        assert_eq!(recorded[0].amount, dec!(347.00));
        assert_eq!(recorded[0].currency, "usd");
        assert_eq!(recorded[0].customer_email.as_deref(), Some("buyer@example.com"));
        assert_eq!(recorded[0].items.len(), 2);
        assert_eq!(recorded[0].items[1].quantity, 2);
    }

    #[tokio::test]
    async fn test_redundant_delivery_records_once() {
        let store = Arc::new(MemoryTransactionStore::new());
        let notifier = Arc::new(CountingNotifier::default());
        let processor = WebhookProcessor::new(store.clone(), notifier.clone());

        let payload = completion_payload("sess_123", 34700);
        let first = processor
            .handle(WebhookEvent::parse(&payload).unwrap())
            .await
            .unwrap();
        let second = processor
            .handle(WebhookEvent::parse(&payload).unwrap())
            .await
            .unwrap();

        assert!(matches!(first, WebhookOutcome::Recorded { .. }));
        assert_eq!(
            second,
            WebhookOutcome::Duplicate {
                session_id: "sess_123".into()
            }
        );
        assert_eq!(store.list().unwrap().len(), 1);
        // only the first delivery notifies
        assert_eq!(notifier.sent.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_other_event_types_ignored() {
        let store = Arc::new(MemoryTransactionStore::new());
        let processor = WebhookProcessor::new(store.clone(), Arc::new(NoopNotifier));

        let payload = serde_json::json!({
            "type": "payment_intent.created",
            "data": { "object": { "id": "pi_1" } }
        })
        .to_string();
        let outcome = processor
            .handle(WebhookEvent::parse(payload.as_bytes()).unwrap())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            WebhookOutcome::Ignored {
                event_type: "payment_intent.created".into()
            }
        );
        assert!(store.list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notification_failure_keeps_record() {
        let store = Arc::new(MemoryTransactionStore::new());
        let processor = WebhookProcessor::new(store.clone(), Arc::new(FailingNotifier));

        let event = WebhookEvent::parse(&completion_payload("sess_456", 2400)).unwrap();
        let outcome = processor.handle(event).await.unwrap();

        assert!(matches!(outcome, WebhookOutcome::Recorded { .. }));
        assert_eq!(store.list().unwrap().len(), 1);
        assert_eq!(store.list().unwrap()[0].amount, dec!(24.00));
    }

    #[tokio::test]
    async fn test_missing_contact_skips_notification() {
        let store = Arc::new(MemoryTransactionStore::new());
        let notifier = Arc::new(CountingNotifier::default());
        let processor = WebhookProcessor::new(store.clone(), notifier.clone());

        let payload = serde_json::json!({
            "type": CHECKOUT_COMPLETED,
            "data": {
                "object": {
                    "id": "sess_anon",
                    "amount_total": 4500,
                    "currency": "usd",
                }
            }
        })
        .to_string();
        let outcome = processor
            .handle(WebhookEvent::parse(payload.as_bytes()).unwrap())
            .await
            .unwrap();

        assert!(matches!(outcome, WebhookOutcome::Recorded { .. }));
        assert_eq!(notifier.sent.load(Ordering::SeqCst), 0);
        assert_eq!(store.list().unwrap().len(), 1);
    }
}

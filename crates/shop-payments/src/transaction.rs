//! Transaction Log
//!
//! Append-only record of settled checkouts. The gateway session id is the
//! idempotency key: at most one transaction exists per session regardless of
//! how many times the completion event is delivered. That guarantee lives at
//! the storage boundary - `append_if_absent` - not in caller convention.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::RwLock;

use shop_core::OrderItem;

use crate::error::Result;

/// A settled checkout, recorded once per gateway session.
/// Never updated or deleted in normal operation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    /// Gateway session id (unique key)
    pub id: String,

    /// Settled amount in major currency units
    pub amount: Decimal,

    /// Settlement currency (e.g., "usd")
    pub currency: String,

    /// Customer contact, when the gateway supplied one
    pub customer_email: Option<String>,

    /// Order snapshot recovered from session metadata
    pub items: Vec<OrderItem>,

    /// Recording timestamp
    pub created_at: DateTime<Utc>,
}

/// Transaction storage trait
pub trait TransactionStore: Send + Sync {
    /// Append unless a transaction with the same session id already exists.
    /// Returns `false` (writing nothing) on a duplicate.
    fn append_if_absent(&self, transaction: Transaction) -> Result<bool>;

    /// All recorded transactions, in append order
    fn list(&self) -> Result<Vec<Transaction>>;
}

/// In-memory transaction store (single-process deployments).
///
/// A multi-process deployment needs a unique-constraint-backed store keyed by
/// session id instead; the trait boundary is where that swap happens.
pub struct MemoryTransactionStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    log: Vec<Transaction>,
    seen: HashSet<String>,
}

impl Default for MemoryTransactionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTransactionStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }
}

impl TransactionStore for MemoryTransactionStore {
    fn append_if_absent(&self, transaction: Transaction) -> Result<bool> {
        // The write lock spans the duplicate check and the append: two
        // concurrent deliveries for one session cannot both get past the check.
        let mut inner = self.inner.write().unwrap();

        if !inner.seen.insert(transaction.id.clone()) {
            return Ok(false);
        }
        inner.log.push(transaction);
        Ok(true)
    }

    fn list(&self) -> Result<Vec<Transaction>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.log.clone())
    }
}

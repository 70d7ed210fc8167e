//! Domain Models
//!
//! Core data types for the storefront. Uses `rust_decimal` for all monetary
//! values - never use f64 for money!

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog product
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier (e.g., "1")
    pub id: String,

    /// Display title
    pub title: String,

    /// Unit price in major currency units
    pub price: Decimal,

    /// Product image
    #[serde(rename = "imageURL")]
    pub image_url: String,

    /// Short description
    pub description: String,

    /// Catalog category (e.g., "electronics")
    pub category: String,
}

/// The (id, title, price, quantity) tuple shared by cart snapshots, checkout
/// requests, gateway session metadata, and transaction records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub title: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl OrderItem {
    /// price × quantity
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

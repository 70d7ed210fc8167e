//! Cart State Machine
//!
//! A reducer over one state value: every mutation is a pure function of
//! (current cart, action), with no time, randomness, or I/O in the
//! transition. The [`CartStore`] owns the live cart and serializes
//! dispatches through the reducer; views read state and never mutate it
//! directly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::{OrderItem, Product};

/// One entry in the cart. Quantity is always >= 1; dropping to zero removes
/// the entry instead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub title: String,
    pub price: Decimal,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub description: String,
    pub quantity: u32,
}

impl CartItem {
    fn from_product(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image_url: product.image_url,
            description: product.description,
            quantity: 1,
        }
    }
}

/// Cart mutation, tagged per action kind.
///
/// The transition table in [`Cart::apply`] is exhaustive: every variant is
/// handled, none fall through silently.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum CartAction {
    /// Add one unit of a product. An already-present id increments its
    /// quantity instead of duplicating the entry.
    AddItem(Product),

    /// Remove an entry outright. Unknown ids are a no-op.
    RemoveItem(String),

    /// Set an entry's quantity. Zero or negative removes the entry; unknown
    /// ids are a silent no-op.
    UpdateQuantity { id: String, quantity: i64 },

    /// Reset to the empty cart.
    Clear,
}

/// Cart contents, insertion-ordered for display.
///
/// `item_count` and `total` are derived on demand - there is no stored
/// counter that could drift from the items.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across all entries
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of price × quantity across all entries
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum()
    }

    /// Apply one action, producing the next cart state.
    #[must_use]
    pub fn apply(&self, action: &CartAction) -> Self {
        let mut next = self.clone();
        match action {
            CartAction::AddItem(product) => {
                if let Some(existing) = next.items.iter_mut().find(|item| item.id == product.id) {
                    existing.quantity += 1;
                } else {
                    next.items.push(CartItem::from_product(product.clone()));
                }
            }
            CartAction::RemoveItem(id) => {
                next.items.retain(|item| &item.id != id);
            }
            CartAction::UpdateQuantity { id, quantity } => {
                if *quantity <= 0 {
                    next.items.retain(|item| &item.id != id);
                } else if let Some(existing) = next.items.iter_mut().find(|item| &item.id == id) {
                    existing.quantity = u32::try_from(*quantity).unwrap_or(u32::MAX);
                }
            }
            CartAction::Clear => {
                next.items.clear();
            }
        }
        next
    }

    /// Immutable order snapshot, decoupled from later cart mutations.
    pub fn snapshot(&self) -> Vec<OrderItem> {
        self.items
            .iter()
            .map(|item| OrderItem {
                id: item.id.clone(),
                title: item.title.clone(),
                price: item.price,
                quantity: item.quantity,
            })
            .collect()
    }
}

/// Owns the live cart and serializes dispatches through the reducer.
///
/// Single-threaded by construction: each dispatch runs the transition to
/// completion before the next is applied, so concurrent UI sources can never
/// interleave at the field level.
#[derive(Debug, Default)]
pub struct CartStore {
    state: Cart,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current cart state (read-only to consumers)
    pub fn state(&self) -> &Cart {
        &self.state
    }

    /// Dispatch one action through the reducer
    pub fn dispatch(&mut self, action: CartAction) {
        self.state = self.state.apply(&action);
    }

    /// Reset to the empty cart (checkout handoff or explicit reset)
    pub fn clear(&mut self) {
        self.dispatch(CartAction::Clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(id: &str, title: &str, price: Decimal) -> Product {
        Product {
            id: id.into(),
            title: title.into(),
            price,
            image_url: format!("https://images.example.com/{id}.jpeg"),
            description: format!("{title} description"),
            category: "home".into(),
        }
    }

    fn derived_fields_consistent(cart: &Cart) {
        let count: u32 = cart.items.iter().map(|i| i.quantity).sum();
        let total: Decimal = cart
            .items
            .iter()
            .map(|i| i.price * Decimal::from(i.quantity))
            .sum();
        assert_eq!(cart.item_count(), count);
        assert_eq!(cart.total(), total);
    }

    #[test]
    fn test_empty_cart() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_add_item_increments_existing() {
        let headphones = product("1", "Premium Wireless Headphones", dec!(299));
        let cart = Cart::new()
            .apply(&CartAction::AddItem(headphones.clone()))
            .apply(&CartAction::AddItem(headphones));

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 2);
        derived_fields_consistent(&cart);
    }

    #[test]
    fn test_totals_scenario() {
        // [{id:"1",price:299,qty:1},{id:"7",price:24,qty:2}] => total 347, count 3
        let cart = Cart::new()
            .apply(&CartAction::AddItem(product(
                "1",
                "Premium Wireless Headphones",
                dec!(299),
            )))
            .apply(&CartAction::AddItem(product("7", "Ceramic Coffee Mug", dec!(24))))
            .apply(&CartAction::UpdateQuantity {
                id: "7".into(),
                quantity: 2,
            });

        assert_eq!(cart.total(), dec!(347));
        assert_eq!(cart.item_count(), 3);
        derived_fields_consistent(&cart);
    }

    #[test]
    fn test_remove_item() {
        let cart = Cart::new()
            .apply(&CartAction::AddItem(product("1", "Headphones", dec!(299))))
            .apply(&CartAction::RemoveItem("1".into()));
        assert!(cart.is_empty());

        // removing an unknown id is a no-op
        let same = cart.apply(&CartAction::RemoveItem("404".into()));
        assert_eq!(same, cart);
    }

    #[test]
    fn test_update_quantity_zero_equals_remove() {
        let base = Cart::new()
            .apply(&CartAction::AddItem(product("1", "Headphones", dec!(299))))
            .apply(&CartAction::AddItem(product("7", "Mug", dec!(24))));

        let updated = base.apply(&CartAction::UpdateQuantity {
            id: "7".into(),
            quantity: 0,
        });
        let removed = base.apply(&CartAction::RemoveItem("7".into()));

        assert_eq!(updated, removed);
    }

    #[test]
    fn test_update_quantity_negative_removes() {
        let cart = Cart::new()
            .apply(&CartAction::AddItem(product("1", "Headphones", dec!(299))))
            .apply(&CartAction::UpdateQuantity {
                id: "1".into(),
                quantity: -3,
            });
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_unknown_id_is_noop() {
        let cart = Cart::new().apply(&CartAction::AddItem(product("1", "Headphones", dec!(299))));
        let same = cart.apply(&CartAction::UpdateQuantity {
            id: "404".into(),
            quantity: 5,
        });
        assert_eq!(same, cart);
    }

    #[test]
    fn test_clear() {
        let cart = Cart::new()
            .apply(&CartAction::AddItem(product("1", "Headphones", dec!(299))))
            .apply(&CartAction::Clear);
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_snapshot_decoupled_from_mutations() {
        let mut store = CartStore::new();
        store.dispatch(CartAction::AddItem(product("1", "Headphones", dec!(299))));
        let snapshot = store.state().snapshot();

        store.dispatch(CartAction::UpdateQuantity {
            id: "1".into(),
            quantity: 4,
        });

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].quantity, 1);
        assert_eq!(store.state().item_count(), 4);
    }

    #[test]
    fn test_store_dispatch_sequence() {
        let mut store = CartStore::new();
        store.dispatch(CartAction::AddItem(product("2", "Minimalist Watch", dec!(199))));
        store.dispatch(CartAction::AddItem(product("2", "Minimalist Watch", dec!(199))));
        store.dispatch(CartAction::AddItem(product("3", "Organic Cotton T-Shirt", dec!(45))));

        assert_eq!(store.state().item_count(), 3);
        assert_eq!(store.state().total(), dec!(443));

        store.clear();
        assert!(store.state().is_empty());
    }
}

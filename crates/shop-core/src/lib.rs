//! # shop-core
//!
//! Storefront domain types and the cart state machine.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       CartStore                          │
//! │  ┌─────────────┐     ┌─────────────┐     ┌────────────┐  │
//! │  │  CartAction │────▶│   reducer   │────▶│    Cart    │  │
//! │  │  (dispatch) │     │ Cart::apply │     │  (state)   │  │
//! │  └─────────────┘     └─────────────┘     └────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Every cart mutation flows through [`Cart::apply`], a pure transition
//! function over (current cart, action). Derived figures such as the item
//! count and total are always recomputed from the items, never stored.
//! Checkout takes an [`OrderItem`] snapshot decoupled from later mutations.

pub mod cart;
pub mod catalog;
pub mod product;

pub use cart::{Cart, CartAction, CartItem, CartStore};
pub use product::{OrderItem, Product};

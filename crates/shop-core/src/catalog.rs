//! Demo Catalog
//!
//! Static product data served by the storefront. Catalog storage is an
//! external collaborator; the reference deployment ships fixed data.

use rust_decimal_macros::dec;

use crate::product::Product;

/// The demo catalog, in display order.
pub fn demo_products() -> Vec<Product> {
    vec![
        Product {
            id: "1".into(),
            title: "Premium Wireless Headphones".into(),
            price: dec!(299),
            image_url: "https://images.pexels.com/photos/3394650/pexels-photo-3394650.jpeg?auto=compress&cs=tinysrgb&w=800".into(),
            description: "High-quality wireless headphones with noise cancellation and premium sound quality.".into(),
            category: "electronics".into(),
        },
        Product {
            id: "2".into(),
            title: "Minimalist Watch".into(),
            price: dec!(199),
            image_url: "https://images.pexels.com/photos/190819/pexels-photo-190819.jpeg?auto=compress&cs=tinysrgb&w=800".into(),
            description: "Elegant minimalist watch with leather strap, perfect for any occasion.".into(),
            category: "accessories".into(),
        },
        Product {
            id: "3".into(),
            title: "Organic Cotton T-Shirt".into(),
            price: dec!(45),
            image_url: "https://images.pexels.com/photos/1183266/pexels-photo-1183266.jpeg?auto=compress&cs=tinysrgb&w=800".into(),
            description: "Comfortable and sustainable organic cotton t-shirt in various colors.".into(),
            category: "clothing".into(),
        },
        Product {
            id: "4".into(),
            title: "Modern Desk Lamp".into(),
            price: dec!(89),
            image_url: "https://images.pexels.com/photos/1112598/pexels-photo-1112598.jpeg?auto=compress&cs=tinysrgb&w=800".into(),
            description: "Sleek modern desk lamp with adjustable brightness and USB charging port.".into(),
            category: "home".into(),
        },
        Product {
            id: "5".into(),
            title: "Leather Backpack".into(),
            price: dec!(159),
            image_url: "https://images.pexels.com/photos/2905238/pexels-photo-2905238.jpeg?auto=compress&cs=tinysrgb&w=800".into(),
            description: "Handcrafted leather backpack with multiple compartments and laptop sleeve.".into(),
            category: "accessories".into(),
        },
        Product {
            id: "6".into(),
            title: "Smart Fitness Tracker".into(),
            price: dec!(249),
            image_url: "https://images.pexels.com/photos/1553835/pexels-photo-1553835.jpeg?auto=compress&cs=tinysrgb&w=800".into(),
            description: "Advanced fitness tracker with heart rate monitoring and GPS.".into(),
            category: "electronics".into(),
        },
        Product {
            id: "7".into(),
            title: "Ceramic Coffee Mug".into(),
            price: dec!(24),
            image_url: "https://images.pexels.com/photos/982612/pexels-photo-982612.jpeg?auto=compress&cs=tinysrgb&w=800".into(),
            description: "Handmade ceramic coffee mug with unique glaze pattern.".into(),
            category: "home".into(),
        },
        Product {
            id: "8".into(),
            title: "Wool Sweater".into(),
            price: dec!(129),
            image_url: "https://images.pexels.com/photos/1020585/pexels-photo-1020585.jpeg?auto=compress&cs=tinysrgb&w=800".into(),
            description: "Cozy wool sweater made from ethically sourced materials.".into(),
            category: "clothing".into(),
        },
    ]
}

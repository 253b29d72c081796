//! Ephemeral shopping cart.
//!
//! Lines keep a snapshot of the product as it was when added, so the cart
//! total is what the customer saw. The cart serializes to JSON for local
//! persistence.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use simshop_core::models::{OrderItem, ProductSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product: ProductSummary,
    pub quantity: u32,
}

impl CartLine {
    pub fn subtotal(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units. Adding a product already in the cart merges
    /// into its line and keeps the first price snapshot.
    pub fn add(&mut self, product: ProductSummary, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.position(product.id) {
            Some(index) => {
                let line = &mut self.lines[index];
                line.quantity = line.quantity.saturating_add(quantity);
            }
            None => self.lines.push(CartLine { product, quantity }),
        }
    }

    /// Set a line's quantity; zero removes the line. Returns false when the
    /// product is not in the cart.
    pub fn update_quantity(&mut self, product: Uuid, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(product);
        }
        match self.position(product) {
            Some(index) => {
                self.lines[index].quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, product: Uuid) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product.id != product);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Distinct products.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Σ quantity.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Σ price × quantity.
    pub fn total(&self) -> f64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Order items with the snapshot prices.
    pub fn to_items(&self) -> Vec<OrderItem> {
        self.lines
            .iter()
            .map(|line| OrderItem {
                product: line.product.id,
                quantity: line.quantity,
                price: line.product.price,
            })
            .collect()
    }

    fn position(&self, product: Uuid) -> Option<usize> {
        self.lines.iter().position(|line| line.product.id == product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, price: f64) -> ProductSummary {
        ProductSummary {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            price,
            images: Vec::new(),
        }
    }

    #[test]
    fn adding_twice_merges() {
        let sim = product("SIM", 15.99);
        let mut cart = Cart::new();
        cart.add(sim.clone(), 1);
        cart.add(sim, 2);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.item_count(), 3);
        assert!((cart.total() - 47.97).abs() < 1e-9);
    }

    #[test]
    fn zero_quantity_removes() {
        let sim = product("SIM", 15.99);
        let mut cart = Cart::new();
        cart.add(sim.clone(), 1);
        cart.add(product("Router", 40.0), 1);

        assert!(cart.update_quantity(sim.id, 0));
        assert_eq!(cart.line_count(), 1);
        assert!(!cart.update_quantity(sim.id, 3));
        assert!(!cart.remove(sim.id));
    }

    #[test]
    fn adding_nothing_is_a_no_op() {
        let mut cart = Cart::new();
        cart.add(product("SIM", 15.99), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn items_carry_price_snapshots() {
        let sim = product("SIM", 15.99);
        let mut cart = Cart::new();
        cart.add(sim.clone(), 2);
        let items = cart.to_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product, sim.id);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].price, 15.99);
    }

    #[test]
    fn survives_json() {
        let mut cart = Cart::new();
        cart.add(product("SIM", 15.99), 2);
        let raw = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, cart);
    }
}

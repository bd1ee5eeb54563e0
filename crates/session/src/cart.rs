//! Cart state: an ordered collection of line items keyed by product slug.
//!
//! The cart itself is a plain value type with no I/O. Persistence and
//! remote sync are layered on by [`StorefrontSession`](crate::StorefrontSession);
//! keeping the container pure makes the merge and quantity rules easy to
//! test in isolation.

use serde::{Deserialize, Serialize};

use coursecart_core::{Price, ProductSlug, SlugError};

/// A product as the catalog presents it. Identity is derived from the
/// name at add time, so two products with the same name are the same
/// cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Display name, also the source of the slug
    pub name: String,
    /// Unit price
    pub price: Price,
    /// Image URL for cart and shelf rendering
    pub image: String,
}

/// One cart line: a product snapshot plus a quantity.
///
/// `name`, `price`, and `image` are captured when the line is first
/// created and are not updated by later merges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Slug derived from the product name; the line's identity
    pub slug: ProductSlug,
    /// Product name as first added
    pub name: String,
    /// Unit price as first added
    pub price: Price,
    /// Image URL as first added
    pub image: String,
    /// Number of units; always at least 1 while the line exists
    pub quantity: u32,
}

impl LineItem {
    /// Total for this line (`price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.line_total(self.quantity)
    }
}

/// Ordered cart contents. Lines keep insertion order; merging into an
/// existing line never moves it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Rebuild a cart from persisted or remote line items, preserving
    /// their order.
    #[must_use]
    pub const fn from_items(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    /// Add one unit of `product`.
    ///
    /// If a line with the same slug already exists its quantity is
    /// incremented and the stored snapshot (name, price, image) is left
    /// untouched. Otherwise a new line with quantity 1 is appended.
    ///
    /// # Errors
    ///
    /// Returns `SlugError` if the product name contains no usable
    /// characters. The cart is not modified in that case.
    pub fn add(&mut self, product: Product) -> Result<ProductSlug, SlugError> {
        let slug = ProductSlug::derive(&product.name)?;
        if let Some(item) = self.items.iter_mut().find(|item| item.slug == slug) {
            item.quantity = item.quantity.saturating_add(1);
        } else {
            self.items.push(LineItem {
                slug: slug.clone(),
                name: product.name,
                price: product.price,
                image: product.image,
                quantity: 1,
            });
        }
        Ok(slug)
    }

    /// Remove the line with the given slug. Returns `false` (and leaves
    /// the cart untouched) when no such line exists.
    pub fn remove(&mut self, slug: &ProductSlug) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.slug != *slug);
        self.items.len() < before
    }

    /// Set the quantity of an existing line. A quantity of zero removes
    /// the line. Returns `false` when no such line exists.
    pub fn set_quantity(&mut self, slug: &ProductSlug, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(slug);
        }
        match self.items.iter_mut().find(|item| item.slug == *slug) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Line with the given slug, if present.
    #[must_use]
    pub fn get(&self, slug: &ProductSlug) -> Option<&LineItem> {
        self.items.iter().find(|item| item.slug == *slug)
    }

    /// All lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of distinct lines (not units).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(name: &str, cents: u32) -> Product {
        Product {
            name: name.to_string(),
            price: Price::from_cents(cents),
            image: format!("https://img.example/{name}.jpg"),
        }
    }

    #[test]
    fn test_add_creates_line_with_quantity_one() {
        let mut cart = Cart::new();
        let slug = cart.add(product("Machine Learning 101", 19_99)).unwrap();

        assert_eq!(slug.as_str(), "machine-learning-101");
        assert_eq!(cart.len(), 1);
        let item = cart.get(&slug).unwrap();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.name, "Machine Learning 101");
    }

    #[test]
    fn test_add_same_name_merges() {
        let mut cart = Cart::new();
        cart.add(product("Rust in Practice", 49_00)).unwrap();
        let slug = cart.add(product("Rust in Practice", 49_00)).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&slug).unwrap().quantity, 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_merge_keeps_first_snapshot() {
        let mut cart = Cart::new();
        cart.add(product("Rust in Practice", 49_00)).unwrap();

        // Same name, different price and image: quantity merges but the
        // original snapshot wins.
        let slug = cart
            .add(Product {
                name: "Rust in Practice".to_string(),
                price: Price::from_cents(59_00),
                image: "https://img.example/other.jpg".to_string(),
            })
            .unwrap();

        let item = cart.get(&slug).unwrap();
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price, Price::from_cents(49_00));
        assert!(item.image.ends_with("Rust in Practice.jpg"));
    }

    #[test]
    fn test_names_colliding_on_slug_merge() {
        let mut cart = Cart::new();
        let first = cart.add(product("Rust 101", 10_00)).unwrap();
        let second = cart.add(product("Rust   101!", 20_00)).unwrap();

        assert_eq!(first, second);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&first).unwrap().quantity, 2);
    }

    #[test]
    fn test_unusable_name_rejected_without_mutation() {
        let mut cart = Cart::new();
        cart.add(product("Rust 101", 10_00)).unwrap();

        let err = cart.add(product("!!!", 5_00));
        assert!(err.is_err());
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_insertion_order_survives_merges() {
        let mut cart = Cart::new();
        cart.add(product("Alpha", 1_00)).unwrap();
        cart.add(product("Beta", 2_00)).unwrap();
        cart.add(product("Alpha", 1_00)).unwrap();

        let names: Vec<&str> = cart.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_remove_is_benign_when_absent() {
        let mut cart = Cart::new();
        cart.add(product("Alpha", 1_00)).unwrap();

        let missing = ProductSlug::derive("Ghost").unwrap();
        assert!(!cart.remove(&missing));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_remove_then_remove_again() {
        let mut cart = Cart::new();
        let slug = cart.add(product("Alpha", 1_00)).unwrap();

        assert!(cart.remove(&slug));
        assert!(!cart.remove(&slug));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_updates_line() {
        let mut cart = Cart::new();
        let slug = cart.add(product("Alpha", 1_00)).unwrap();

        assert!(cart.set_quantity(&slug, 5));
        assert_eq!(cart.get(&slug).unwrap().quantity, 5);
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        let slug = cart.add(product("Alpha", 1_00)).unwrap();

        assert!(cart.set_quantity(&slug, 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_absent_is_noop() {
        let mut cart = Cart::new();
        let missing = ProductSlug::derive("Ghost").unwrap();
        assert!(!cart.set_quantity(&missing, 3));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_sums_line_totals() {
        let mut cart = Cart::new();
        cart.add(product("Alpha", 19_99)).unwrap();
        cart.add(product("Alpha", 19_99)).unwrap();
        cart.add(product("Beta", 5_00)).unwrap();

        assert_eq!(cart.total(), Price::from_cents(44_98));
    }

    #[test]
    fn test_clear_empties_cart() {
        let mut cart = Cart::new();
        cart.add(product("Alpha", 1_00)).unwrap();
        cart.add(product("Beta", 2_00)).unwrap();

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_cart_persists_as_bare_array() {
        let mut cart = Cart::new();
        cart.add(product("Alpha", 19_99)).unwrap();

        let json = serde_json::to_string(&cart).unwrap();
        assert!(json.starts_with('['), "cart should serialize as an array");

        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }
}

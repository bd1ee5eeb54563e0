//! Wishlist and recently-viewed shelves.
//!
//! Both shelves store quantity-less product snapshots ([`SavedItem`]).
//! The wishlist is an insertion-ordered set; the recently-viewed shelf
//! is a bounded most-recent-first list. Neither is synced remotely.

use serde::{Deserialize, Serialize};

use coursecart_core::{Price, ProductSlug, SlugError};

use crate::cart::Product;

/// A product snapshot saved outside the cart. Unlike a cart line there
/// is no quantity: an item is either on the shelf or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedItem {
    /// Slug derived from the product name; the item's identity
    pub slug: ProductSlug,
    /// Product name as saved
    pub name: String,
    /// Unit price as saved
    pub price: Price,
    /// Image URL as saved
    pub image: String,
}

impl SavedItem {
    /// Snapshot a product for a shelf.
    ///
    /// # Errors
    ///
    /// Returns `SlugError` if the product name contains no usable
    /// characters.
    pub fn new(product: Product) -> Result<Self, SlugError> {
        let slug = ProductSlug::derive(&product.name)?;
        Ok(Self {
            slug,
            name: product.name,
            price: product.price,
            image: product.image,
        })
    }
}

/// Insertion-ordered wishlist, deduplicated by slug.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist {
    items: Vec<SavedItem>,
}

impl Wishlist {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Rebuild from persisted items, dropping any duplicate slugs
    /// (first occurrence wins, matching [`Wishlist::add`]).
    #[must_use]
    pub fn from_items(items: Vec<SavedItem>) -> Self {
        let mut wishlist = Self::new();
        for item in items {
            wishlist.add(item);
        }
        wishlist
    }

    /// Add an item. Returns `false` (and changes nothing) when an item
    /// with the same slug is already saved.
    pub fn add(&mut self, item: SavedItem) -> bool {
        if self.contains(&item.slug) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove the item with the given slug. Returns `false` when no
    /// such item exists.
    pub fn remove(&mut self, slug: &ProductSlug) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.slug != *slug);
        self.items.len() < before
    }

    #[must_use]
    pub fn contains(&self, slug: &ProductSlug) -> bool {
        self.items.iter().any(|item| item.slug == *slug)
    }

    /// Saved items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[SavedItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Bounded most-recent-first shelf of viewed products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentlyViewed {
    items: Vec<SavedItem>,
}

impl RecentlyViewed {
    /// Maximum number of entries kept; the oldest entry is evicted when
    /// a new view would exceed this.
    pub const CAPACITY: usize = 10;

    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Rebuild from persisted items, truncating anything beyond
    /// [`Self::CAPACITY`] so an oversized stored list heals on load.
    #[must_use]
    pub fn from_items(mut items: Vec<SavedItem>) -> Self {
        items.truncate(Self::CAPACITY);
        Self { items }
    }

    /// Record a view. A slug already on the shelf moves to the front
    /// without growing the list; a new slug is inserted at the front
    /// and the oldest entry is evicted past capacity.
    pub fn record(&mut self, item: SavedItem) {
        self.items.retain(|existing| existing.slug != item.slug);
        self.items.insert(0, item);
        self.items.truncate(Self::CAPACITY);
    }

    /// Viewed items, most recent first.
    #[must_use]
    pub fn items(&self) -> &[SavedItem] {
        &self.items
    }

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

    fn saved(name: &str) -> SavedItem {
        SavedItem::new(Product {
            name: name.to_string(),
            price: Price::from_cents(9_99),
            image: format!("https://img.example/{name}.jpg"),
        })
        .unwrap()
    }

    #[test]
    fn test_saved_item_derives_slug() {
        let item = saved("Design Systems Field Guide");
        assert_eq!(item.slug.as_str(), "design-systems-field-guide");
    }

    #[test]
    fn test_saved_item_rejects_unusable_name() {
        let result = SavedItem::new(Product {
            name: "???".to_string(),
            price: Price::ZERO,
            image: String::new(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_wishlist_add_dedups_by_slug() {
        let mut wishlist = Wishlist::new();
        assert!(wishlist.add(saved("Rust 101")));
        assert!(!wishlist.add(saved("Rust 101")));
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn test_wishlist_remove_absent_is_noop() {
        let mut wishlist = Wishlist::new();
        wishlist.add(saved("Rust 101"));

        let missing = ProductSlug::derive("Ghost").unwrap();
        assert!(!wishlist.remove(&missing));
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn test_wishlist_keeps_insertion_order() {
        let mut wishlist = Wishlist::new();
        wishlist.add(saved("Alpha"));
        wishlist.add(saved("Beta"));
        wishlist.add(saved("Alpha"));

        let names: Vec<&str> = wishlist.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_wishlist_from_items_dedups() {
        let items = vec![saved("Alpha"), saved("Beta"), saved("Alpha")];
        let wishlist = Wishlist::from_items(items);
        assert_eq!(wishlist.len(), 2);
    }

    #[test]
    fn test_recently_viewed_most_recent_first() {
        let mut shelf = RecentlyViewed::new();
        shelf.record(saved("Alpha"));
        shelf.record(saved("Beta"));

        let names: Vec<&str> = shelf.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Beta", "Alpha"]);
    }

    #[test]
    fn test_recently_viewed_revisit_moves_to_front() {
        let mut shelf = RecentlyViewed::new();
        shelf.record(saved("Alpha"));
        shelf.record(saved("Beta"));
        shelf.record(saved("Alpha"));

        let names: Vec<&str> = shelf.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
        assert_eq!(shelf.len(), 2);
    }

    #[test]
    fn test_recently_viewed_evicts_oldest_past_capacity() {
        let mut shelf = RecentlyViewed::new();
        for i in 0..12 {
            shelf.record(saved(&format!("Course {i}")));
        }

        assert_eq!(shelf.len(), RecentlyViewed::CAPACITY);
        assert_eq!(shelf.items().first().unwrap().name, "Course 11");
        // Courses 0 and 1 were evicted.
        assert_eq!(shelf.items().last().unwrap().name, "Course 2");
    }

    #[test]
    fn test_recently_viewed_from_items_truncates() {
        let items: Vec<SavedItem> = (0..15).map(|i| saved(&format!("Course {i}"))).collect();
        let shelf = RecentlyViewed::from_items(items);
        assert_eq!(shelf.len(), RecentlyViewed::CAPACITY);
    }
}

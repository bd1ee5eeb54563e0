//! Derived views over a cart snapshot: analytics, category breakdown,
//! and recommendations.
//!
//! Everything here is a pure function of the cart passed in. No state,
//! no I/O, no randomness; calling twice on the same cart gives the same
//! answer. The session re-runs these after every mutation.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use coursecart_core::Price;

use crate::cart::{Cart, LineItem};

/// Flat tax rate applied to the cart total for the estimate shown at
/// checkout (0.10). This is a display estimate, not a tax engine.
const TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Course categories, in rule-evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Machine Learning")]
    MachineLearning,
    #[serde(rename = "Data Science")]
    DataScience,
    #[serde(rename = "Web Development")]
    WebDevelopment,
    #[serde(rename = "Programming")]
    Programming,
    #[serde(rename = "Design")]
    Design,
    #[serde(rename = "General")]
    General,
}

impl Category {
    /// Display name, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MachineLearning => "Machine Learning",
            Self::DataScience => "Data Science",
            Self::WebDevelopment => "Web Development",
            Self::Programming => "Programming",
            Self::Design => "Design",
            Self::General => "General",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered classification rules. The first rule with any keyword found
/// in the lowercased product name wins; a name matching nothing is
/// `General`.
const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (
        Category::MachineLearning,
        &["machine learning", "neural", "deep learning", "ai"],
    ),
    (Category::DataScience, &["data", "analytics", "statistics"]),
    (
        Category::WebDevelopment,
        &["web", "javascript", "react", "html"],
    ),
    (
        Category::Programming,
        &["programming", "python", "rust", "coding"],
    ),
    (Category::Design, &["design", "ux", "ui"]),
];

/// Classify a product name into exactly one category.
#[must_use]
pub fn categorize(name: &str) -> Category {
    let lowered = name.to_lowercase();
    for (category, keywords) in CATEGORY_RULES {
        if keywords.iter().any(|keyword| lowered.contains(keyword)) {
            return *category;
        }
    }
    Category::General
}

/// Units per category for the given cart. Categories with no items are
/// absent from the map, so an empty cart yields an empty breakdown.
#[must_use]
pub fn category_breakdown(cart: &Cart) -> BTreeMap<Category, u32> {
    let mut breakdown = BTreeMap::new();
    for item in cart.items() {
        *breakdown.entry(categorize(&item.name)).or_insert(0) += item.quantity;
    }
    breakdown
}

/// Snapshot analytics for a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartAnalytics {
    /// Sum of quantities
    pub total_items: u32,
    /// Sum of line totals
    pub total_value: Price,
    /// `total_value / total_items`, zero (not an error) on an empty cart
    pub average_item_price: Price,
    /// Units per category
    pub category_breakdown: BTreeMap<Category, u32>,
    /// Priciest line, `None` on an empty cart; ties keep the earlier line
    pub most_expensive_item: Option<LineItem>,
    /// `total_value * 0.10`
    pub estimated_tax: Price,
    /// `total_value + estimated_tax`
    pub estimated_total: Price,
}

/// Compute analytics for a cart snapshot.
#[must_use]
pub fn analytics(cart: &Cart) -> CartAnalytics {
    let total_items = cart.item_count();
    let total_value = cart.total();

    let average_item_price = if total_items == 0 {
        Price::ZERO
    } else {
        Price::new(total_value.amount() / Decimal::from(total_items)).unwrap_or(Price::ZERO)
    };

    // First max wins on ties, so the earliest-added line is reported.
    let most_expensive_item = cart
        .items()
        .iter()
        .fold(None::<&LineItem>, |best, item| match best {
            Some(current) if item.price <= current.price => Some(current),
            _ => Some(item),
        })
        .cloned();

    let estimated_tax = Price::new(total_value.amount() * TAX_RATE).unwrap_or(Price::ZERO);
    let estimated_total = total_value + estimated_tax;

    CartAnalytics {
        total_items,
        total_value,
        average_item_price,
        category_breakdown: category_breakdown(cart),
        most_expensive_item,
        estimated_tax,
        estimated_total,
    }
}

/// A suggested course from the fixed catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub name: &'static str,
    pub price: Price,
    pub category: Category,
}

/// One suggestion per category, offered when that category is present
/// in the breakdown. A lookup table, not personalization.
const RECOMMENDATION_CATALOG: &[(Category, &str, u32)] = &[
    (Category::MachineLearning, "Deep Learning Workshop", 149),
    (Category::DataScience, "SQL for Analysts", 79),
    (Category::WebDevelopment, "Advanced React Patterns", 119),
    (Category::Programming, "Rust in Practice", 89),
    (Category::Design, "Design Systems Field Guide", 99),
    (Category::General, "Study Skills Starter Pack", 29),
];

/// Suggestions gated on category presence, in catalog order.
#[must_use]
pub fn recommendations(breakdown: &BTreeMap<Category, u32>) -> Vec<Recommendation> {
    RECOMMENDATION_CATALOG
        .iter()
        .filter(|(category, _, _)| breakdown.contains_key(category))
        .map(|&(category, name, price)| Recommendation {
            name,
            price: Price::from_major(price),
            category,
        })
        .collect()
}

/// Convenience wrapper: breakdown plus lookup in one call.
#[must_use]
pub fn recommendations_for(cart: &Cart) -> Vec<Recommendation> {
    recommendations(&category_breakdown(cart))
}

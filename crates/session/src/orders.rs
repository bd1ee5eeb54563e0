//! Order records and the local order ledger.
//!
//! The ledger is append-only: orders are recorded at checkout and never
//! edited or removed. It is a shopper-facing history, not an accounting
//! system; the remote profile keeps its own counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coursecart_core::{Email, OrderNumber, Price};

use crate::auth::CurrentUser;
use crate::cart::LineItem;
use crate::error::ValidationError;

/// Checkout contact details as typed into the form, unvalidated.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
}

impl CheckoutForm {
    /// Validate the form into [`CustomerInfo`].
    ///
    /// Both fields are trimmed first. Nothing is mutated on failure, so
    /// a rejected checkout leaves the cart exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the name is blank or the email does
    /// not parse.
    pub fn validate(&self) -> Result<CustomerInfo, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        let email = Email::parse(self.email.trim())?;
        Ok(CustomerInfo {
            name: name.to_string(),
            email,
        })
    }
}

/// Validated checkout contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: Email,
}

/// A placed order: the cart contents at checkout plus contact details
/// and, when the shopper was signed in, their account identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Locally generated order number (`ORD-` prefix)
    pub number: OrderNumber,
    /// Cart lines as they stood at checkout
    pub items: Vec<LineItem>,
    /// Sum of line totals at checkout
    pub total: Price,
    /// When the order was placed
    pub placed_at: DateTime<Utc>,
    /// Contact details from the checkout form
    pub customer: CustomerInfo,
    /// Account identity, present only for signed-in checkouts
    pub placed_by: Option<CurrentUser>,
}

impl Order {
    /// Build an order from the current cart lines, generating a fresh
    /// order number and timestamp. The total is computed here so it
    /// always agrees with the items.
    #[must_use]
    pub fn place(
        customer: CustomerInfo,
        items: Vec<LineItem>,
        placed_by: Option<CurrentUser>,
    ) -> Self {
        let total = items.iter().map(LineItem::line_total).sum();
        Self {
            number: OrderNumber::generate(),
            items,
            total,
            placed_at: Utc::now(),
            customer,
            placed_by,
        }
    }
}

/// Append-only order history, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderLedger {
    orders: Vec<Order>,
}

impl OrderLedger {
    #[must_use]
    pub const fn new() -> Self {
        Self { orders: Vec::new() }
    }

    /// Rebuild from persisted orders, preserving their order.
    #[must_use]
    pub const fn from_orders(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    /// Append an order to the ledger.
    pub fn record(&mut self, order: Order) {
        self.orders.push(order);
    }

    /// Look up an order by number. Order numbers are short random
    /// strings and histories are small, so this is a linear scan.
    #[must_use]
    pub fn find(&self, number: &OrderNumber) -> Option<&Order> {
        self.orders.iter().find(|order| order.number == *number)
    }

    /// All orders, oldest first.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

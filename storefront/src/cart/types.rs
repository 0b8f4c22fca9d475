//! Cart domain types.

use crate::money::{Money, TaxRate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog identifier of a product
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u32);

impl ProductId {
    /// Creates a `ProductId`
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw identifier
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The product fields the cart keeps for display
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartProduct {
    /// Product identifier
    pub id: ProductId,
    /// Display name
    pub name: String,
    /// Unit price
    pub price: Money,
    /// Image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Catalog category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Manufacturer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

impl CartProduct {
    /// Creates a product with only the required fields
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: Money) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image: None,
            category: None,
            brand: None,
        }
    }
}

/// One product/quantity pair in the cart
///
/// Invariant: `quantity >= 1`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// The product
    #[serde(flatten)]
    pub product: CartProduct,
    /// Number of units
    pub quantity: u32,
}

impl LineItem {
    /// The product identifier
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Price times quantity
    #[must_use]
    pub const fn line_total(&self) -> Money {
        self.product.price.saturating_mul(self.quantity)
    }
}

/// Sum of price times quantity over `items`
#[must_use]
pub fn calculate_total(items: &[LineItem]) -> Money {
    items.iter().map(LineItem::line_total).sum()
}

/// The full persisted cart: items in insertion order plus the derived total
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    /// Line items, insertion order
    pub items: Vec<LineItem>,
    /// Always `calculate_total(&items)`
    pub total: Money,
}

impl CartState {
    /// Creates an empty cart
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            total: Money::ZERO,
        }
    }

    /// Builds a cart from items, deriving the total
    #[must_use]
    pub fn from_items(items: Vec<LineItem>) -> Self {
        let total = calculate_total(&items);
        Self { items, total }
    }

    /// Whether the cart has no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all items
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Returns the line item for a product
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: ProductId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub(crate) fn recompute_total(&mut self) {
        self.total = calculate_total(&self.items);
    }
}

/// Actions accepted by the cart
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartAction {
    /// Add one unit of a product
    AddItem {
        /// The product to add
        product: CartProduct,
    },
    /// Remove every line item for a product
    RemoveItem {
        /// Product to remove
        id: ProductId,
    },
    /// Set a quantity; `0` removes the item
    UpdateQuantity {
        /// Product to update
        id: ProductId,
        /// New quantity
        quantity: u32,
    },
    /// One more unit
    IncrementQuantity {
        /// Product to update
        id: ProductId,
    },
    /// One fewer unit, never below 1
    DecrementQuantity {
        /// Product to update
        id: ProductId,
    },
    /// Empty the cart
    ClearCart,
}

/// Totals shown on the cart and checkout pages
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Number of units
    pub item_count: u64,
    /// Sum of line totals
    pub subtotal: Money,
    /// Tax on the subtotal
    pub tax: Money,
    /// Subtotal plus tax
    pub total: Money,
}

impl OrderSummary {
    /// Summarise `items` at `tax_rate`
    #[must_use]
    pub fn compute(items: &[LineItem], tax_rate: TaxRate) -> Self {
        let subtotal = calculate_total(items);
        let tax = tax_rate.tax_on(subtotal);
        Self {
            item_count: items.iter().map(|item| u64::from(item.quantity)).sum(),
            subtotal,
            tax,
            total: subtotal.saturating_add(tax),
        }
    }

    /// Whether there is nothing to pay for
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.item_count == 0
    }
}

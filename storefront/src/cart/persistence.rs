//! Durable cart slot.
//!
//! The cart is stored as JSON with top-level keys `items` and `total` under
//! [`CART_KEY`]. Loading is parse-or-default: anything that does not parse
//! into a valid [`CartState`] is discarded and an empty cart is used.

use super::types::{CartState, LineItem, ProductId};
use serde_json::Value;
use storefront_core::environment::{KeyValueStorage, StorageError};
use thiserror::Error;

/// Storage slot holding the serialized cart
pub const CART_KEY: &str = "cart";

const REQUIRED_KEYS: [&str; 2] = ["items", "total"];

/// Why a stored cart was rejected
#[derive(Error, Debug)]
pub enum CartLoadError {
    /// Not JSON at all
    #[error("stored cart is not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    /// JSON, but not an object
    #[error("stored cart is not a JSON object")]
    NotAnObject,

    /// A top-level key of the cart shape is absent
    #[error("stored cart is missing the `{0}` key")]
    MissingKey(&'static str),

    /// Keys present but values of the wrong shape
    #[error("stored cart has an invalid shape: {0}")]
    Shape(#[source] serde_json::Error),

    /// A line item with quantity 0
    #[error("stored cart has a zero quantity for product {0}")]
    ZeroQuantity(ProductId),
}

/// Parse a stored cart
///
/// The stored `total` must be present but is not trusted; it is re-derived
/// from the items.
///
/// # Errors
///
/// Returns [`CartLoadError`] if `raw` is not a JSON object with valid `items`
/// and `total` keys, or any item has a zero quantity.
pub fn parse_cart(raw: &str) -> Result<CartState, CartLoadError> {
    let value: Value = serde_json::from_str(raw).map_err(CartLoadError::Syntax)?;
    let Value::Object(mut object) = value else {
        return Err(CartLoadError::NotAnObject);
    };

    for key in REQUIRED_KEYS {
        if !object.contains_key(key) {
            return Err(CartLoadError::MissingKey(key));
        }
    }

    let items = object.remove("items").unwrap_or(Value::Null);
    let items: Vec<LineItem> = serde_json::from_value(items).map_err(CartLoadError::Shape)?;
    let total = object.remove("total").unwrap_or(Value::Null);
    serde_json::from_value::<crate::money::Money>(total).map_err(CartLoadError::Shape)?;

    if let Some(bad) = items.iter().find(|item| item.quantity == 0) {
        return Err(CartLoadError::ZeroQuantity(bad.id()));
    }

    Ok(CartState::from_items(items))
}

/// Serialize the cart into its slot
///
/// # Errors
///
/// Returns [`StorageError`] if the backend rejects the write.
pub fn persist_cart(storage: &dyn KeyValueStorage, cart: &CartState) -> Result<(), StorageError> {
    let json = serde_json::to_string(cart)
        .map_err(|e| StorageError::Corrupted(format!("cart serialization failed: {e}")))?;
    storage.set(CART_KEY, &json)
}

/// Restore the cart at start-up
///
/// An absent slot yields an empty cart. A slot that fails [`parse_cart`] is
/// removed and logged, and an empty cart is returned; so is a storage read
/// failure. Never fails.
pub fn load_cart(storage: &dyn KeyValueStorage) -> CartState {
    let raw = match storage.get(CART_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return CartState::new(),
        Err(error) => {
            tracing::error!(%error, "could not read stored cart, starting empty");
            return CartState::new();
        },
    };

    match parse_cart(&raw) {
        Ok(cart) => {
            tracing::debug!(items = cart.items.len(), total = %cart.total, "restored cart");
            cart
        },
        Err(error) => {
            tracing::error!(%error, "discarding stored cart");
            if let Err(error) = storage.remove(CART_KEY) {
                tracing::error!(%error, "could not remove stored cart");
            }
            CartState::new()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::types::CartProduct;
    use crate::money::Money;
    use storefront_testing::{FailingStorage, InMemoryStorage};

    fn sample_cart() -> CartState {
        CartState::from_items(vec![
            LineItem {
                product: CartProduct::new(ProductId::new(1), "Smartphone Pro X", Money::from_dollars(899)),
                quantity: 1,
            },
            LineItem {
                product: CartProduct::new(ProductId::new(7), "Bluetooth Speaker", Money::from_dollars(79)),
                quantity: 3,
            },
        ])
    }

    #[test]
    fn persisted_cart_loads_back_equal() {
        let storage = InMemoryStorage::new();
        let cart = sample_cart();

        assert!(persist_cart(&storage, &cart).is_ok());

        assert_eq!(load_cart(&storage), cart);
    }

    #[test]
    fn absent_slot_is_empty_cart() {
        assert_eq!(load_cart(&InMemoryStorage::new()), CartState::new());
    }

    #[test]
    fn corrupted_slot_is_discarded() {
        let storage = InMemoryStorage::with_slot(CART_KEY, "{not json");

        assert_eq!(load_cart(&storage), CartState::new());
        assert!(!storage.contains(CART_KEY));
    }

    #[test]
    fn shape_check_requires_both_keys() {
        assert!(matches!(
            parse_cart(r#"{"items": []}"#),
            Err(CartLoadError::MissingKey("total"))
        ));
        assert!(matches!(
            parse_cart(r#"{"total": 0}"#),
            Err(CartLoadError::MissingKey("items"))
        ));
        assert!(matches!(parse_cart("[]"), Err(CartLoadError::NotAnObject)));
    }

    #[test]
    fn rejects_malformed_items() {
        assert!(matches!(
            parse_cart(r#"{"items": [{"id": 1}], "total": 0}"#),
            Err(CartLoadError::Shape(_))
        ));
        assert!(matches!(
            parse_cart(r#"{"items": [{"id": 1, "name": "X", "price": 100, "quantity": 0}], "total": 0}"#),
            Err(CartLoadError::ZeroQuantity(id)) if id == ProductId::new(1)
        ));
        assert!(matches!(
            parse_cart(r#"{"items": [], "total": -5}"#),
            Err(CartLoadError::Shape(_))
        ));
    }

    #[test]
    fn stored_total_is_rederived() {
        let cart = parse_cart(
            r#"{"items": [{"id": 2, "name": "Laptop", "price": 129900, "quantity": 2}], "total": 1}"#,
        );

        assert!(matches!(cart, Ok(ref c) if c.total == Money::from_cents(259_800)));
    }

    #[test]
    fn unreadable_storage_starts_empty() {
        assert_eq!(load_cart(&FailingStorage), CartState::new());
    }
}

//! Shopping cart: line items, derived totals, and the persisted cart slot.

pub mod persistence;
pub mod reducer;
pub mod types;

pub use persistence::{CART_KEY, CartLoadError, load_cart, parse_cart, persist_cart};
pub use reducer::{CartEnvironment, CartReducer};
pub use types::{
    CartAction, CartProduct, CartState, LineItem, OrderSummary, ProductId, calculate_total,
};

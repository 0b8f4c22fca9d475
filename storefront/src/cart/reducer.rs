//! Reducer logic for the cart.

use super::persistence::persist_cart;
use super::types::{CartAction, CartState, LineItem};
use std::sync::Arc;
use storefront_core::{SmallVec, effect::Effect, environment::KeyValueStorage, reducer::Reducer};

/// Environment dependencies for the cart reducer
#[derive(Clone)]
pub struct CartEnvironment {
    /// Durable slot the cart is written to after every mutation
    pub storage: Arc<dyn KeyValueStorage>,
}

impl CartEnvironment {
    /// Creates a new `CartEnvironment`
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }
}

/// Reducer for the cart
///
/// Every action recomputes the total and writes the cart to storage before
/// returning. A failed write is logged; the in-memory cart stays authoritative.
#[derive(Clone, Debug, Default)]
pub struct CartReducer;

impl CartReducer {
    /// Creates a new `CartReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn apply(state: &mut CartState, action: CartAction) {
        match action {
            CartAction::AddItem { product } => {
                if let Some(item) = state.get_mut(product.id) {
                    item.quantity = item.quantity.saturating_add(1);
                } else {
                    state.items.push(LineItem {
                        product,
                        quantity: 1,
                    });
                }
            },
            CartAction::RemoveItem { id } => {
                state.items.retain(|item| item.id() != id);
            },
            CartAction::UpdateQuantity { id, quantity: 0 } => {
                state.items.retain(|item| item.id() != id);
            },
            CartAction::UpdateQuantity { id, quantity } => {
                if let Some(item) = state.get_mut(id) {
                    item.quantity = quantity;
                }
            },
            CartAction::IncrementQuantity { id } => {
                if let Some(item) = state.get_mut(id) {
                    item.quantity = item.quantity.saturating_add(1);
                }
            },
            CartAction::DecrementQuantity { id } => {
                if let Some(item) = state.get_mut(id) {
                    item.quantity = item.quantity.saturating_sub(1).max(1);
                }
            },
            CartAction::ClearCart => {
                state.items.clear();
            },
        }
        state.recompute_total();
    }
}

impl Reducer for CartReducer {
    type State = CartState;
    type Action = CartAction;
    type Environment = CartEnvironment;

    #[tracing::instrument(skip_all, name = "cart")]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        tracing::debug!(?action, "applying cart action");
        Self::apply(state, action);

        if let Err(error) = persist_cart(env.storage.as_ref(), state) {
            tracing::error!(%error, "failed to persist cart");
        }

        tracing::debug!(items = state.items.len(), total = %state.total, "cart updated");
        SmallVec::new()
    }
}

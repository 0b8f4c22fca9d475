//! Property tests for cart arithmetic and persistence

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use proptest::prelude::*;
use proptest::test_runner::Config;
use std::sync::Arc;
use storefront::cart::{
    CART_KEY, CartAction, CartEnvironment, CartProduct, CartReducer, CartState, ProductId,
    load_cart, parse_cart,
};
use storefront::money::Money;
use storefront_core::reducer::Reducer;
use storefront_testing::InMemoryStorage;

fn product(id: u32, cents: u64) -> CartProduct {
    CartProduct::new(ProductId::new(id), format!("Product {id}"), Money::from_cents(cents))
}

fn action() -> impl Strategy<Value = CartAction> {
    let id = 1_u32..6;
    prop_oneof![
        3 => (id.clone(), 1_u64..100_000).prop_map(|(id, cents)| CartAction::AddItem {
            product: product(id, cents),
        }),
        1 => id.clone().prop_map(|id| CartAction::RemoveItem { id: ProductId::new(id) }),
        2 => (id.clone(), 0_u32..20).prop_map(|(id, quantity)| CartAction::UpdateQuantity {
            id: ProductId::new(id),
            quantity,
        }),
        1 => id.clone().prop_map(|id| CartAction::IncrementQuantity { id: ProductId::new(id) }),
        1 => id.prop_map(|id| CartAction::DecrementQuantity { id: ProductId::new(id) }),
        1 => Just(CartAction::ClearCart),
    ]
}

fn run(actions: Vec<CartAction>) -> (CartState, Arc<InMemoryStorage>) {
    let storage = Arc::new(InMemoryStorage::new());
    let env = CartEnvironment::new(storage.clone());
    let mut cart = CartState::new();
    for action in actions {
        let _ = CartReducer::new().reduce(&mut cart, action, &env);
    }
    (cart, storage)
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn total_matches_line_items(actions in prop::collection::vec(action(), 0..40)) {
        let (cart, _) = run(actions);
        let expected = cart
            .items
            .iter()
            .fold(0_u64, |sum, item| sum + item.product.price.cents() * u64::from(item.quantity));
        prop_assert_eq!(cart.total.cents(), expected);
    }

    #[test]
    fn no_line_item_is_empty_or_duplicated(actions in prop::collection::vec(action(), 0..40)) {
        let (cart, _) = run(actions);
        for (index, item) in cart.items.iter().enumerate() {
            prop_assert!(item.quantity >= 1);
            prop_assert!(cart.items[index + 1..].iter().all(|other| other.id() != item.id()));
        }
    }

    #[test]
    fn storage_always_holds_latest_cart(actions in prop::collection::vec(action(), 1..40)) {
        let (cart, storage) = run(actions);
        let stored = storage.slot(CART_KEY).expect("cart slot written");
        prop_assert_eq!(parse_cart(&stored).unwrap(), cart.clone());
        prop_assert_eq!(load_cart(storage.as_ref()), cart);
    }

    #[test]
    fn repeated_adds_count_up(times in 1_u32..25, cents in 1_u64..50_000) {
        let (cart, _) = run((0..times).map(|_| CartAction::AddItem { product: product(1, cents) }).collect());
        prop_assert_eq!(cart.items.len(), 1);
        prop_assert_eq!(cart.items[0].quantity, times);
        prop_assert_eq!(cart.total, Money::from_cents(cents * u64::from(times)));
    }

    #[test]
    fn add_order_does_not_change_total(ids in prop::collection::vec(1_u32..6, 0..20)) {
        let adds = |ids: &[u32]| {
            ids.iter()
                .map(|&id| CartAction::AddItem { product: product(id, u64::from(id) * 1_250) })
                .collect::<Vec<_>>()
        };
        let mut reversed = ids.clone();
        reversed.reverse();

        let (forward, _) = run(adds(&ids));
        let (backward, _) = run(adds(&reversed));

        prop_assert_eq!(forward.total, backward.total);
        prop_assert_eq!(forward.item_count(), backward.item_count());
    }

    #[test]
    fn clearing_leaves_nothing(actions in prop::collection::vec(action(), 0..40)) {
        let mut actions = actions;
        actions.push(CartAction::ClearCart);
        let (cart, _) = run(actions);
        prop_assert!(cart.is_empty());
        prop_assert_eq!(cart.total, Money::ZERO);
    }
}

//! Application-level store: every feature slice behind one reducer.
//!
//! Feature reducers stay independent; this module routes actions to them,
//! lifts their effects into [`AppAction`], and wires the few cross-feature
//! rules (placing an order summarises the cart, a placed order empties it).

use crate::booking::{BookingAction, BookingEnvironment, BookingReducer, BookingState};
use crate::cart::{CartAction, CartEnvironment, CartReducer, CartState, OrderSummary, load_cart};
use crate::checkout::{CheckoutAction, CheckoutEnvironment, CheckoutReducer, CheckoutState};
use crate::config::StorefrontConfig;
use crate::money::TaxRate;
use crate::session::{SessionAction, SessionReducer, SessionState};
use crate::theme::{ThemeAction, ThemeEnvironment, ThemeReducer, ThemeState, load_theme};
use std::sync::Arc;
use storefront_core::{
    SmallVec,
    effect::Effect,
    environment::{Clock, IdGenerator, KeyValueStorage},
    reducer::Reducer,
};

/// Every piece of client state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppState {
    /// Shopping cart
    pub cart: CartState,
    /// Checkout page
    pub checkout: CheckoutState,
    /// Repair booking wizard
    pub booking: BookingState,
    /// Colour scheme
    pub theme: ThemeState,
    /// Signed-in user
    pub session: SessionState,
}

impl AppState {
    /// State at start-up: persisted slices restored, everything else fresh
    #[must_use]
    pub fn restore(storage: &dyn KeyValueStorage, prefers_dark: bool) -> Self {
        Self {
            cart: load_cart(storage),
            theme: ThemeState {
                theme: load_theme(storage, prefers_dark),
            },
            ..Self::default()
        }
    }
}

/// Actions accepted by the application store
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppAction {
    /// Cart action
    Cart(CartAction),
    /// Checkout action
    Checkout(CheckoutAction),
    /// Booking wizard action
    Booking(BookingAction),
    /// Theme action
    Theme(ThemeAction),
    /// Session action
    Session(SessionAction),
    /// Submit the checkout for the current cart contents
    PlaceOrder,
}

/// Injected dependencies for every feature
#[derive(Clone)]
pub struct AppEnvironment {
    /// Tax applied when placing an order
    pub tax_rate: TaxRate,
    /// Cart dependencies
    pub cart: CartEnvironment,
    /// Checkout dependencies
    pub checkout: CheckoutEnvironment,
    /// Booking dependencies
    pub booking: BookingEnvironment,
    /// Theme dependencies
    pub theme: ThemeEnvironment,
}

impl AppEnvironment {
    /// Wire the feature environments from shared dependencies
    #[must_use]
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        config: &StorefrontConfig,
    ) -> Self {
        Self {
            tax_rate: config.tax_rate,
            cart: CartEnvironment::new(Arc::clone(&storage)),
            checkout: CheckoutEnvironment::new(ids, config.checkout_delay),
            booking: BookingEnvironment::new(clock, config.booking_window_days),
            theme: ThemeEnvironment::new(storage),
        }
    }
}

fn lift<A: 'static>(
    effects: SmallVec<[Effect<A>; 4]>,
    into: fn(A) -> AppAction,
) -> SmallVec<[Effect<AppAction>; 4]> {
    effects.into_iter().map(|effect| effect.map(into)).collect()
}

/// Root reducer for [`AppState`]
#[derive(Clone, Debug, Default)]
pub struct StorefrontReducer {
    cart: CartReducer,
    checkout: CheckoutReducer,
    booking: BookingReducer,
    theme: ThemeReducer,
    session: SessionReducer,
}

impl StorefrontReducer {
    /// Creates a new `StorefrontReducer`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reducer for StorefrontReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AppAction::Cart(action) => lift(
                self.cart.reduce(&mut state.cart, action, &env.cart),
                AppAction::Cart,
            ),
            AppAction::Checkout(action) => {
                let completes_order = state.checkout.submitting
                    && matches!(action, CheckoutAction::OrderPlaced { .. });
                let mut effects = lift(
                    self.checkout.reduce(&mut state.checkout, action, &env.checkout),
                    AppAction::Checkout,
                );
                if completes_order {
                    effects.extend(lift(
                        self.cart.reduce(&mut state.cart, CartAction::ClearCart, &env.cart),
                        AppAction::Cart,
                    ));
                }
                effects
            },
            AppAction::Booking(action) => lift(
                self.booking.reduce(&mut state.booking, action, &env.booking),
                AppAction::Booking,
            ),
            AppAction::Theme(action) => lift(
                self.theme.reduce(&mut state.theme, action, &env.theme),
                AppAction::Theme,
            ),
            AppAction::Session(action) => lift(
                self.session.reduce(&mut state.session, action, &()),
                AppAction::Session,
            ),
            AppAction::PlaceOrder => {
                let summary = OrderSummary::compute(&state.cart.items, env.tax_rate);
                tracing::debug!(items = summary.item_count, total = %summary.total, "placing order");
                self.reduce(
                    state,
                    AppAction::Checkout(CheckoutAction::Submit { summary }),
                    env,
                )
            },
        }
    }
}

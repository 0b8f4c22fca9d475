//! Checkout: the order form and simulated order submission.
//!
//! Submitting a valid form starts a cancellable delay that delivers
//! [`CheckoutAction::OrderPlaced`]. Abandoning the checkout cancels it, so a
//! torn-down checkout never receives a stale confirmation.

use crate::cart::OrderSummary;
use crate::forms::{CheckoutField, CheckoutForm, FORM, PaymentMethod, ValidationErrors, validate_checkout};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use storefront_core::{
    SmallVec, cancellable_delay,
    effect::{Effect, EffectId},
    environment::IdGenerator,
    reducer::Reducer,
    smallvec,
};

/// Id of the in-flight order submission
pub const ORDER_SUBMISSION: EffectId = EffectId::new("checkout.order_submission");

/// Default simulated submission latency
pub const DEFAULT_SUBMISSION_DELAY: Duration = Duration::from_millis(1500);

const ORDER_NUMBER_SPACE: u32 = 1_000_000;

/// A placed order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    /// `ORD-` followed by a number below one million, unpadded
    pub order_number: String,
    /// Customer's full name
    pub customer: String,
    /// Customer's email
    pub email: String,
    /// How the order was paid
    pub payment_method: PaymentMethod,
    /// Totals at the time of submission
    pub summary: OrderSummary,
}

/// State of the checkout page
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckoutState {
    /// Form contents
    pub form: CheckoutForm,
    /// Selected payment method
    pub payment_method: PaymentMethod,
    /// Errors from the last submit attempt, minus fields edited since
    pub errors: ValidationErrors,
    /// An order is being submitted
    pub submitting: bool,
    /// The most recently placed order
    pub confirmation: Option<OrderConfirmation>,
}

/// Actions accepted by the checkout
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckoutAction {
    /// Edit a form field
    UpdateField {
        /// Which field
        field: CheckoutField,
        /// New value
        value: String,
    },
    /// Choose how to pay
    SelectPaymentMethod(PaymentMethod),
    /// Place the order for `summary`
    Submit {
        /// Cart totals being paid for
        summary: OrderSummary,
    },
    /// The submission completed
    OrderPlaced {
        /// The placed order
        confirmation: OrderConfirmation,
    },
    /// The checkout was left; drop any submission in flight
    Abandon,
}

/// Environment dependencies for the checkout reducer
#[derive(Clone)]
pub struct CheckoutEnvironment {
    /// Source of order numbers
    pub ids: Arc<dyn IdGenerator>,
    /// Simulated submission latency
    pub submission_delay: Duration,
}

impl CheckoutEnvironment {
    /// Creates a new `CheckoutEnvironment`
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>, submission_delay: Duration) -> Self {
        Self {
            ids,
            submission_delay,
        }
    }
}

/// Reducer for the checkout
#[derive(Clone, Debug, Default)]
pub struct CheckoutReducer;

impl CheckoutReducer {
    /// Creates a new `CheckoutReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn submit(
        state: &mut CheckoutState,
        summary: OrderSummary,
        env: &CheckoutEnvironment,
    ) -> SmallVec<[Effect<CheckoutAction>; 4]> {
        if state.submitting {
            tracing::debug!("order already submitting, ignoring submit");
            return SmallVec::new();
        }

        let mut errors = validate_checkout(&state.form, state.payment_method);
        if summary.is_empty() {
            errors.insert(FORM, "Your cart is empty");
        }
        if !errors.is_empty() {
            tracing::warn!(fields = ?errors.fields().collect::<Vec<_>>(), "checkout rejected");
            state.errors = errors;
            return SmallVec::new();
        }

        let order_number = format!("ORD-{}", env.ids.next_below(ORDER_NUMBER_SPACE));
        tracing::info!(%order_number, total = %summary.total, "submitting order");

        state.errors.clear();
        state.submitting = true;

        let confirmation = OrderConfirmation {
            order_number,
            customer: state.form.full_name(),
            email: state.form.email.trim().to_string(),
            payment_method: state.payment_method,
            summary,
        };

        smallvec![cancellable_delay! {
            id: ORDER_SUBMISSION,
            duration: env.submission_delay,
            action: CheckoutAction::OrderPlaced { confirmation }
        }]
    }
}

impl Reducer for CheckoutReducer {
    type State = CheckoutState;
    type Action = CheckoutAction;
    type Environment = CheckoutEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CheckoutAction::UpdateField { field, value } => {
                state.form.set(field, value);
                state.errors.clear_field(field.key());
                SmallVec::new()
            },
            CheckoutAction::SelectPaymentMethod(method) => {
                state.payment_method = method;
                SmallVec::new()
            },
            CheckoutAction::Submit { summary } => Self::submit(state, summary, env),
            CheckoutAction::OrderPlaced { confirmation } => {
                if !state.submitting {
                    tracing::warn!(
                        order_number = %confirmation.order_number,
                        "order placed with no submission pending, ignoring"
                    );
                    return SmallVec::new();
                }
                tracing::info!(order_number = %confirmation.order_number, "order placed");
                state.submitting = false;
                state.form = CheckoutForm::default();
                state.confirmation = Some(confirmation);
                SmallVec::new()
            },
            CheckoutAction::Abandon => {
                if state.submitting {
                    tracing::info!("checkout abandoned, cancelling submission");
                }
                state.submitting = false;
                state.errors.clear();
                smallvec![Effect::Cancel(ORDER_SUBMISSION)]
            },
        }
    }
}

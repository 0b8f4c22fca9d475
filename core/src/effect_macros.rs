//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use storefront_core::async_effect;
///
/// async_effect! {
///     let products = catalog.load().await;
///     Some(CatalogAction::Loaded { products })
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```rust,ignore
/// use storefront_core::delay;
/// use std::time::Duration;
///
/// delay! {
///     duration: Duration::from_millis(1500),
///     action: CheckoutAction::OrderPlaced { confirmation }
/// }
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}

/// Create a delayed action that can be cancelled under an id
///
/// # Example
///
/// ```rust,ignore
/// use storefront_core::cancellable_delay;
///
/// cancellable_delay! {
///     id: CHECKOUT_SUBMISSION,
///     duration: env.submission_delay,
///     action: CheckoutAction::OrderPlaced { confirmation }
/// }
/// ```
#[macro_export]
macro_rules! cancellable_delay {
    (
        id: $id:expr,
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Cancellable {
            id: $id,
            effect: ::std::boxed::Box::new($crate::delay! {
                duration: $duration,
                action: $action
            }),
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::{Effect, EffectId};
    use std::time::Duration;

    #[derive(Clone, Debug)]
    enum TestAction {
        Loaded { count: usize },
        Expired,
    }

    #[test]
    fn test_async_effect_macro() {
        let effect = async_effect! {
            Some(TestAction::Loaded { count: 3 })
        };

        assert!(matches!(effect, Effect::Future(_)));
    }

    #[test]
    fn test_delay_macro() {
        let effect = delay! {
            duration: Duration::from_secs(1),
            action: TestAction::Expired
        };

        assert!(matches!(effect, Effect::Delay { .. }));
    }

    #[test]
    fn test_cancellable_delay_macro() {
        const ID: EffectId = EffectId::new("expiry");

        let effect = cancellable_delay! {
            id: ID,
            duration: Duration::from_millis(10),
            action: TestAction::Expired
        };

        match effect {
            Effect::Cancellable { id, effect } => {
                assert_eq!(id, ID);
                assert!(matches!(*effect, Effect::Delay { .. }));
            },
            other => unreachable!("unexpected effect {other:?}"),
        }
    }
}

//! # Storefront Core
//!
//! Core traits and types for the storefront state containers.
//!
//! Every piece of client-side state (cart, booking wizard, checkout, theme,
//! session) is modelled the same way:
//!
//! - **State**: plain owned data for a feature
//! - **Action**: every input the feature reacts to
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: a description of work for the runtime (delays, async work,
//!   cancellation), never executed by the reducer itself
//! - **Environment**: injected dependencies (clock, durable storage, ids)
//!
//! ## Example
//!
//! ```
//! use storefront_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct BadgeState {
//!     unread: u32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum BadgeAction {
//!     Bump,
//!     Dismiss,
//! }
//!
//! struct BadgeReducer;
//!
//! impl Reducer for BadgeReducer {
//!     type State = BadgeState;
//!     type Action = BadgeAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut BadgeState,
//!         action: BadgeAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<BadgeAction>; 4]> {
//!         match action {
//!             BadgeAction::Bump => state.unread += 1,
//!             BadgeAction::Dismiss => state.unread = 0,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = BadgeState::default();
//! let _ = BadgeReducer.reduce(&mut state, BadgeAction::Bump, &());
//! assert_eq!(state.unread, 1);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Declarative helpers for building effects
pub mod effect_macros;

/// Reducer module - the core trait for feature logic
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - all feature logic lives behind it
    ///
    /// Reducers are deterministic given their environment: they mutate the
    /// state in place and describe follow-up work as effects.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects are values returned by reducers and executed by the runtime.
/// They compose (`Parallel`, `Sequential`), can be delayed, and can be
/// tagged with an [`EffectId`](effect::EffectId) so that the owner of the
/// state can cancel them before they feed a stale action back.
pub mod effect {
    use std::fmt;
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Identifier used to cancel in-flight effects
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct EffectId(&'static str);

    impl EffectId {
        /// Create a new effect identifier
        #[must_use]
        pub const fn new(name: &'static str) -> Self {
            Self(name)
        }

        /// The identifier as a string
        #[must_use]
        pub const fn as_str(&self) -> &'static str {
            self.0
        }
    }

    impl fmt::Display for EffectId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Dispatch an action after a delay
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// Run `effect` under `id`
        ///
        /// Starting a cancellable effect cancels any in-flight effect with the
        /// same id first. A cancelled effect never delivers its action.
        Cancellable {
            /// Cancellation identifier
            id: EffectId,
            /// The wrapped effect
            effect: Box<Effect<Action>>,
        },

        /// Cancel every in-flight effect registered under the id
        Cancel(EffectId),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> fmt::Debug for Effect<Action>
    where
        Action: fmt::Debug,
    {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Cancellable { id, effect } => f
                    .debug_struct("Effect::Cancellable")
                    .field("id", id)
                    .field("effect", effect)
                    .finish(),
                Effect::Cancel(id) => f.debug_tuple("Effect::Cancel").field(id).finish(),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Wrap this effect so it can be cancelled with `id`
        #[must_use]
        pub fn cancellable(self, id: EffectId) -> Effect<Action> {
            Effect::Cancellable {
                id,
                effect: Box::new(self),
            }
        }

        /// Whether this effect does nothing
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }

        /// Transform the actions this effect will produce
        ///
        /// Used to lift a feature's effects into a parent action type.
        #[must_use]
        pub fn map<B, F>(self, f: F) -> Effect<B>
        where
            Action: 'static,
            B: 'static,
            F: Fn(Action) -> B + Clone + Send + Sync + 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Parallel(effects) => Effect::Parallel(
                    effects.into_iter().map(|e| e.map(f.clone())).collect(),
                ),
                Effect::Sequential(effects) => Effect::Sequential(
                    effects.into_iter().map(|e| e.map(f.clone())).collect(),
                ),
                Effect::Delay { duration, action } => Effect::Delay {
                    duration,
                    action: Box::new(f(*action)),
                },
                Effect::Future(fut) => Effect::Future(Box::pin(async move { fut.await.map(f) })),
                Effect::Cancellable { id, effect } => Effect::Cancellable {
                    id,
                    effect: Box::new(effect.map(f)),
                },
                Effect::Cancel(id) => Effect::Cancel(id),
            }
        }
    }
}

/// Environment module - dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};
    use thiserror::Error;

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Errors raised by a [`KeyValueStorage`] backend
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StorageError {
        /// The backend could not be read or written
        #[error("storage backend unavailable: {0}")]
        Unavailable(String),

        /// The backend's own contents could not be decoded
        #[error("storage backend corrupted: {0}")]
        Corrupted(String),
    }

    /// Durable string slots addressed by key
    ///
    /// Models browser-style local storage: synchronous, whole-value reads and
    /// writes, no transactions.
    pub trait KeyValueStorage: Send + Sync {
        /// Read a slot
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backend cannot be read.
        fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

        /// Overwrite a slot
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backend cannot be written.
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

        /// Delete a slot (no-op if absent)
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backend cannot be written.
        fn remove(&self, key: &str) -> Result<(), StorageError>;
    }

    /// Source of numeric identifiers (order numbers and the like)
    pub trait IdGenerator: Send + Sync {
        /// Next identifier, strictly below `bound`
        fn next_below(&self, bound: u32) -> u32;
    }
}

//! # Storefront Testing
//!
//! Testing utilities for the storefront state containers.
//!
//! This crate provides:
//! - Mock implementations of the environment traits
//! - [`ReducerTest`], a Given/When/Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use storefront_testing::{InMemoryStorage, test_clock};
//!
//! let storage = Arc::new(InMemoryStorage::new());
//! let env = CartEnvironment::new(storage.clone());
//!
//! ReducerTest::new(CartReducer::new())
//!     .with_env(env)
//!     .given_state(CartState::default())
//!     .when_action(CartAction::ClearCart)
//!     .then_state(|cart| assert!(cart.is_empty()))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use storefront_core::environment::{Clock, IdGenerator, KeyValueStorage, StorageError};


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, KeyValueStorage, StorageError, Utc};
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Mutex, MutexGuard, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_testing::mocks::FixedClock;
    /// use storefront_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (Wednesday 2025-01-01 09:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T09:00:00Z")
                .map_or(DateTime::UNIX_EPOCH, |t| t.with_timezone(&Utc)),
        )
    }

    /// In-memory key/value slots
    ///
    /// Stands in for browser local storage. Clones do not share contents.
    #[derive(Debug, Default)]
    pub struct InMemoryStorage {
        slots: Mutex<BTreeMap<String, String>>,
    }

    impl InMemoryStorage {
        /// Empty storage
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Storage pre-seeded with one slot
        #[must_use]
        pub fn with_slot(key: &str, value: &str) -> Self {
            let storage = Self::new();
            storage.slots().insert(key.to_string(), value.to_string());
            storage
        }

        /// Raw contents of a slot
        #[must_use]
        pub fn slot(&self, key: &str) -> Option<String> {
            self.slots().get(key).cloned()
        }

        /// Whether a slot is present
        #[must_use]
        pub fn contains(&self, key: &str) -> bool {
            self.slots().contains_key(key)
        }

        fn slots(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
            self.slots.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    impl KeyValueStorage for InMemoryStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.slot(key))
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.slots().insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.slots().remove(key);
            Ok(())
        }
    }

    /// Storage whose every operation fails
    #[derive(Debug, Clone, Copy, Default)]
    pub struct FailingStorage;

    impl KeyValueStorage for FailingStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("storage disabled".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("storage disabled".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("storage disabled".to_string()))
        }
    }

    /// Predictable ids: `start`, `start + 1`, ... wrapped below the bound
    #[derive(Debug, Default)]
    pub struct SequentialIds {
        next: AtomicU32,
    }

    impl SequentialIds {
        /// Sequence starting at `start`
        #[must_use]
        pub const fn starting_at(start: u32) -> Self {
            Self {
                next: AtomicU32::new(start),
            }
        }
    }

    impl IdGenerator for SequentialIds {
        fn next_below(&self, bound: u32) -> u32 {
            let value = self.next.fetch_add(1, Ordering::SeqCst);
            if bound == 0 { 0 } else { value % bound }
        }
    }
}

/// Install a `tracing` subscriber that writes through the test harness
///
/// Safe to call from every test; only the first call installs.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{FailingStorage, FixedClock, InMemoryStorage, SequentialIds, test_clock};

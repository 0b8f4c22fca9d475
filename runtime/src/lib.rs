//! # Storefront Runtime
//!
//! The Store runtime that coordinates reducer execution and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: owns one feature's state, runs its reducer, executes effects
//! - **Effect Executor**: turns effect descriptions into tasks and feeds the
//!   actions they produce back into the reducer
//! - **Cancellation registry**: aborts in-flight cancellable effects so a torn
//!   down owner never receives a stale action
//!
//! ## Example
//!
//! ```ignore
//! use storefront_runtime::Store;
//!
//! let store = Store::new(CartState::default(), CartReducer::new(), env);
//!
//! store.send(CartAction::AddItem { product }).await?;
//! let total = store.state(|s| s.total).await;
//! ```

use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use storefront_core::{
    effect::{Effect, EffectId},
    reducer::Reducer,
};
use tokio::sync::{RwLock, broadcast, watch};
use tokio::task::{AbortHandle, JoinHandle};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for a matching action
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`]. Waiting on it resolves once every effect
/// started by that action has finished, been cancelled, or panicked.
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };
        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Number of effects still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires first.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.pending())
            .finish_non_exhaustive()
    }
}

/// Internal: completion counter shared by every task an action started
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements effect counters on drop
///
/// Runs even when the guarded task panics or is aborted.
struct DecrementGuard {
    tracking: EffectTracking,
    pending: Arc<AtomicUsize>,
}

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.tracking.decrement();
        self.pending.fetch_sub(1, Ordering::SeqCst);
    }
}

type CancellationRegistry = HashMap<EffectId, Vec<(u64, AbortHandle)>>;

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        AbortHandle, Arc, AtomicBool, AtomicU64, AtomicUsize, BoxFuture, CancellationRegistry,
        DecrementGuard, Duration, Effect, EffectHandle, EffectId, EffectTracking, JoinHandle,
        Mutex, MutexGuard, Ordering, PoisonError, Reducer, RwLock, StoreError, broadcast,
    };

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`; the reducer runs under the write lock)
    /// 2. Reducer (feature logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop and cancellation)
    ///
    /// Effects returned by the reducer are started before the write lock is
    /// released, so a later `Effect::Cancel` always sees every cancellable
    /// effect started by an earlier action.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        cancellations: Arc<Mutex<CancellationRegistry>>,
        next_token: Arc<AtomicU64>,
        /// Every action produced by an effect is broadcast here
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
        }

        /// Create a new Store with custom action broadcast capacity
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                cancellations: Arc::new(Mutex::new(CancellationRegistry::new())),
                next_token: Arc::new(AtomicU64::new(0)),
                action_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires the write lock on state
        /// 2. Calls the reducer with (state, action, environment)
        /// 3. Starts the returned effects
        ///
        /// Returns once the effects are started, not finished; wait on the
        /// returned [`EffectHandle`] for completion.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            self.dispatch(action, false).await
        }

        /// Reduce `action` and start its effects
        ///
        /// With `observed` set the action is broadcast after the reducer has
        /// applied it, while the write lock is still held. Nothing after the
        /// lock is acquired awaits, so an effect aborted while queued for the
        /// lock is neither applied nor broadcast.
        async fn dispatch(&self, action: A, observed: bool) -> Result<EffectHandle, StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.actions.total").increment(1);

            let (handle, tracking) = EffectHandle::new();

            let mut state = self.state.write().await;
            let applied = observed.then(|| action.clone());
            let effects = self.reducer.reduce(&mut *state, action, &self.environment);
            tracing::trace!("Reducer completed, returned {} effects", effects.len());

            if let Some(applied) = applied {
                let _ = self.action_broadcast.send(applied);
            }
            for effect in effects {
                self.execute_effect(effect, &tracking);
            }
            drop(state);

            Ok(handle)
        }

        /// Send an action and wait for a matching action produced by effects
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: no matching action before the timeout
        /// - [`StoreError::ChannelClosed`]: the broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: the store is shutting down
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool,
        {
            // Subscribe BEFORE sending to avoid missing a fast effect
            let mut rx = self.action_broadcast.subscribe();

            self.send(action).await?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged");
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to every action produced by effects
        ///
        /// Actions are broadcast after the reducer has applied them, so state
        /// read after receiving one already reflects it.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Cancel every in-flight effect registered under `id`
        ///
        /// Returns the number of effects that were aborted.
        pub fn cancel(&self, id: EffectId) -> usize {
            let aborted = self.registry().remove(&id).unwrap_or_default();

            for (_, handle) in &aborted {
                handle.abort();
            }

            if !aborted.is_empty() {
                tracing::debug!(effect_id = %id, count = aborted.len(), "Cancelled in-flight effects");
                metrics::counter!("store.effects.cancelled").increment(aborted.len() as u64);
            }

            aborted.len()
        }

        /// Whether any effect is currently registered under `id`
        #[must_use]
        pub fn is_in_flight(&self, id: EffectId) -> bool {
            self.registry().get(&id).is_some_and(|handles| !handles.is_empty())
        }

        /// Tear the store down
        ///
        /// Rejects new actions, aborts every cancellable effect, and waits for
        /// the remaining effects to finish.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
        /// when the timeout expires.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating store shutdown");
            self.shutdown.store(true, Ordering::Release);

            let ids: Vec<EffectId> = self.registry().keys().copied().collect();
            for id in ids {
                self.cancel(id);
            }

            let start = std::time::Instant::now();
            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);
                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    return Ok(());
                }
                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Shutdown timeout");
                    return Err(StoreError::ShutdownTimeout(pending));
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }

        fn registry(&self) -> MutexGuard<'_, CancellationRegistry> {
            self.cancellations
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
        }

        fn track(&self, tracking: &EffectTracking) -> DecrementGuard {
            tracking.increment();
            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            DecrementGuard {
                tracking: tracking.clone(),
                pending: Arc::clone(&self.pending_effects),
            }
        }

        /// Start an effect returned by the reducer
        ///
        /// Called with the state lock held; never awaits.
        fn execute_effect(&self, effect: Effect<A>, tracking: &EffectTracking) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Cancel(id) => {
                    metrics::counter!("store.effects.executed", "type" => "cancel").increment(1);
                    self.cancel(id);
                },
                Effect::Cancellable { id, effect } => {
                    metrics::counter!("store.effects.executed", "type" => "cancellable")
                        .increment(1);
                    let guard = self.track(tracking);
                    let (token, task) = self.spawn_cancellable(id, *effect);
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = guard;
                        store.finish_cancellable(id, token, task).await;
                    });
                },
                other => {
                    metrics::counter!("store.effects.executed", "type" => "task").increment(1);
                    let guard = self.track(tracking);
                    let run = self.run_effect(other);

                    tokio::spawn(async move {
                        let _guard = guard;
                        run.await;
                    });
                },
            }
        }

        /// Run an effect to completion inside the current task
        fn run_effect(&self, effect: Effect<A>) -> BoxFuture<'static, ()> {
            let store = self.clone();

            Box::pin(async move {
                match effect {
                    Effect::None => {},
                    Effect::Cancel(id) => {
                        store.cancel(id);
                    },
                    Effect::Future(fut) => {
                        if let Some(action) = fut.await {
                            store.feed_back(action).await;
                        }
                    },
                    Effect::Delay { duration, action } => {
                        tokio::time::sleep(duration).await;
                        store.feed_back(*action).await;
                    },
                    Effect::Parallel(effects) => {
                        let runs: Vec<_> = effects.into_iter().map(|e| store.run_effect(e)).collect();
                        futures::future::join_all(runs).await;
                    },
                    Effect::Sequential(effects) => {
                        for effect in effects {
                            store.run_effect(effect).await;
                        }
                    },
                    Effect::Cancellable { id, effect } => {
                        let (token, task) = store.spawn_cancellable(id, *effect);
                        store.finish_cancellable(id, token, task).await;
                    },
                }
            })
        }

        /// Spawn `effect` as its own abortable task registered under `id`
        ///
        /// Any effect already in flight under `id` is cancelled first.
        fn spawn_cancellable(&self, id: EffectId, effect: Effect<A>) -> (u64, JoinHandle<()>) {
            self.cancel(id);

            let token = self.next_token.fetch_add(1, Ordering::SeqCst);
            let task = tokio::spawn(self.run_effect(effect));
            let abort: AbortHandle = task.abort_handle();
            self.registry().entry(id).or_default().push((token, abort));

            (token, task)
        }

        async fn finish_cancellable(&self, id: EffectId, token: u64, task: JoinHandle<()>) {
            let outcome = task.await;

            {
                let mut registry = self.registry();
                if let Some(handles) = registry.get_mut(&id) {
                    handles.retain(|(t, _)| *t != token);
                    if handles.is_empty() {
                        registry.remove(&id);
                    }
                }
            }

            match outcome {
                Ok(()) => tracing::trace!(effect_id = %id, "Cancellable effect completed"),
                Err(error) if error.is_cancelled() => {
                    tracing::debug!(effect_id = %id, "Cancellable effect aborted before delivery");
                },
                Err(error) => {
                    tracing::error!(effect_id = %id, error = %error, "Cancellable effect panicked");
                },
            }
        }

        async fn feed_back(&self, action: A) {
            if let Err(error) = self.dispatch(action, true).await {
                tracing::debug!(error = %error, "Dropped effect action");
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                cancellations: Arc::clone(&self.cancellations),
                next_token: Arc::clone(&self.next_token),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;

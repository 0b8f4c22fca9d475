//! # Storefront
//!
//! Client-side state for an electronics storefront with a repair desk:
//! product browsing, a persisted shopping cart, checkout, a four-step repair
//! booking wizard, and small theme and session stores.
//!
//! Each feature is a reducer over its own state slice. [`app`] composes them
//! into a single [`StorefrontReducer`] that runs inside a
//! [`storefront_runtime::Store`], with storage, clock and id generation
//! injected through [`AppEnvironment`].
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use storefront::{
//!     AppAction, AppEnvironment, AppState, Catalog, RandomIds, StorefrontConfig,
//!     StorefrontReducer, cart::CartAction, cart::ProductId, storage::FileStorage,
//! };
//! use storefront_core::environment::SystemClock;
//! use storefront_runtime::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StorefrontConfig::from_env()?;
//! let storage = Arc::new(FileStorage::open(&config.data_file)?);
//! let env = AppEnvironment::new(storage.clone(), Arc::new(SystemClock), Arc::new(RandomIds), &config);
//! let store = Store::new(
//!     AppState::restore(storage.as_ref(), config.prefers_dark),
//!     StorefrontReducer::new(),
//!     env,
//! );
//!
//! let catalog = Catalog::demo();
//! let product = catalog.product(ProductId::new(1))?.to_cart_product();
//! store.send(AppAction::Cart(CartAction::AddItem { product })).await?;
//!
//! let total = store.state(|s| s.cart.total).await;
//! println!("Cart total: {total}");
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod booking;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod forms;
pub mod ids;
pub mod money;
pub mod session;
pub mod storage;
pub mod theme;

pub use app::{AppAction, AppEnvironment, AppState, StorefrontReducer};
pub use catalog::{
    Catalog, CatalogError, FilterCriterion, Product, ProductFilter, Service, ServiceCatalog,
    ServiceId, SortOrder,
};
pub use config::{ConfigError, StorefrontConfig};
pub use error::{Result, StorefrontError};
pub use ids::RandomIds;
pub use money::{Money, TaxRate};

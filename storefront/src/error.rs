//! Top-level error type for the storefront.

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use storefront_core::environment::StorageError;
use storefront_runtime::StoreError;
use thiserror::Error;

/// Any error surfaced by the storefront crate
#[derive(Error, Debug)]
pub enum StorefrontError {
    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Durable storage failed
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The store runtime rejected an action
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Catalog lookup failed
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Result type for storefront operations
pub type Result<T> = std::result::Result<T, StorefrontError>;

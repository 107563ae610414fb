//! Storefront error types.

use thiserror::Error;
use turbo_data::FetchError;

/// Errors from the cart API.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CartError {
    /// Transport failure or a body that is not a JSON cart.
    #[error("Cart request failed: {0}")]
    Network(#[from] FetchError),
}

/// Errors surfaced by user-facing interactions.
///
/// Only cart failures exist today; page side effects are infallible.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InteractionError {
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Errors loading storefront configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse JSON config {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors loading a carousel image.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    #[error("Image request failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Image request returned HTTP {status}")]
    Status { status: u16 },
}

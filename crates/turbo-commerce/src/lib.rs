//! Commerce wire types shared by TurboCommerce storefront clients.
//!
//! - **Ids**: newtype identifiers such as [`ProductId`]
//! - **Cart**: the server cart snapshot ([`CartState`]) and its item count
//!
//! # Example
//!
//! ```rust
//! use turbo_commerce::prelude::*;
//!
//! let cart = CartState::with_lines([("A", 2), ("B", 3)]);
//! assert_eq!(cart.item_count(), 5);
//! ```

pub mod cart;
pub mod ids;

pub use cart::{CartLine, CartState};
pub use ids::ProductId;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{CartLine, CartState};
    pub use crate::ids::ProductId;
}

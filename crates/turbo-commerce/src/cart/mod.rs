//! Shopping cart module.
//!
//! The server owns the cart; clients only ever hold the latest snapshot
//! returned by the cart API.

mod snapshot;

pub use snapshot::{CartLine, CartState};

//! Server cart access and the cart badge.

mod badge;
mod client;

pub use badge::{BadgeView, CartBadge};
pub use client::{normalize_qty, CartClient};

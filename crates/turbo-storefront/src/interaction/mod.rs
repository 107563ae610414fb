//! User interactions: parsing, page collaborators, and the controller.

mod action;
mod controller;
mod page;

pub use action::{
    coerce_number, coerce_qty, Action, AddToCart, CartOpen, Dataset, ProductClick,
    RemoveFromCart, CART_LINK, REMOVE_ITEM, VIEW_PRODUCT,
};
pub use controller::{InteractionController, Outcome, SearchDecision};
pub use page::{HeadlessPage, PageEffect, PageHost};

//! Direct cart API access.

use anyhow::{Context as _, Result};
use turbo_commerce::{CartState, ProductId};
use turbo_storefront::cart::CartClient;

use super::{CartArgs, CartCommand};
use crate::context::Context;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let client = ctx.cart_client(args.base_url.as_deref())?;

    let (label, state) = match args.command {
        CartCommand::Show => ("Cart", client.fetch_cart().await),
        CartCommand::Add { id, qty } => (
            "Added to cart",
            client.add_item(Some(&ProductId::new(id)), qty).await,
        ),
        CartCommand::Remove { id } => (
            "Removed from cart",
            client.remove_item(&ProductId::new(id)).await,
        ),
    };
    let state = state.context("Cart request failed")?;

    print_cart(label, &state, ctx);
    Ok(())
}

fn print_cart(label: &str, state: &CartState, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(state);
        return;
    }

    ctx.output.success(label);
    ctx.output.kv("Items", &CartClient::count(state).to_string());
    for line in state.lines() {
        let id = line.product_id().unwrap_or_else(|| "?".to_string());
        ctx.output.list_item(&format!("{} x{}", id, line.qty()));
    }
}

//! Configuration commands.

use anyhow::{bail, Result};
use turbo_storefront::StorefrontConfig;

use super::{ConfigArgs, ConfigCommand};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init => init_config(),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let api = &ctx.config.api;
    ctx.output.info("");
    ctx.output.info("[api]");
    ctx.output.kv(
        "base_url",
        if api.base_url.is_empty() {
            "(same origin)"
        } else {
            api.base_url.as_str()
        },
    );
    ctx.output.kv("cart_path", &api.cart_path);
    ctx.output.kv("add_path", &api.add_path);
    ctx.output.kv("remove_path", &api.remove_path);
    ctx.output.kv("timeout_ms", &api.timeout_ms.to_string());

    let interaction = &ctx.config.interaction;
    ctx.output.info("");
    ctx.output.info("[interaction]");
    ctx.output.kv("language", &interaction.language);
    ctx.output.kv(
        "product_click_delay_ms",
        &interaction.product_click_delay_ms.to_string(),
    );
    ctx.output.kv(
        "cart_open_delay_ms",
        &interaction.cart_open_delay_ms.to_string(),
    );
    ctx.output.kv("cart_notice", &interaction.cart_notice);

    let carousel = &ctx.config.carousel;
    ctx.output.info("");
    ctx.output.info("[carousel]");
    ctx.output.kv(
        "autoplay_interval_ms",
        &carousel.autoplay_interval_ms.to_string(),
    );
    ctx.output.kv(
        "lazy_root_margin_px",
        &carousel.lazy_root_margin_px.to_string(),
    );

    Ok(())
}

fn init_config() -> Result<()> {
    print!("{}", toml::to_string_pretty(&StorefrontConfig::default())?);
    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    let config = &ctx.config;
    let mut problems = Vec::new();

    for (name, path) in [
        ("api.cart_path", &config.api.cart_path),
        ("api.add_path", &config.api.add_path),
        ("api.remove_path", &config.api.remove_path),
    ] {
        if !path.starts_with('/') && !path.starts_with("http") {
            problems.push(format!("{} must be an absolute path or URL", name));
        }
    }
    if !config.api.base_url.is_empty() && !config.api.base_url.starts_with("http") {
        problems.push("api.base_url must start with http:// or https://".to_string());
    }
    if config.api.timeout_ms == 0 {
        problems.push("api.timeout_ms must be greater than zero".to_string());
    }
    if config.carousel.autoplay_interval_ms == 0 {
        problems.push("carousel.autoplay_interval_ms must be greater than zero".to_string());
    }

    if !problems.is_empty() {
        for problem in &problems {
            ctx.output.warn(problem);
        }
        bail!("Configuration has {} problem(s)", problems.len());
    }

    ctx.output.success("Configuration is valid");
    Ok(())
}

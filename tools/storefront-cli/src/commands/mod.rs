//! CLI command implementations.

pub mod cart;
pub mod config;
pub mod session;

use clap::{Args, Subcommand};

/// Arguments for the session command.
#[derive(Args)]
pub struct SessionArgs {
    /// Session script (JSON).
    pub script: String,

    /// Cart API base URL, overriding the config file.
    #[arg(short, long)]
    pub base_url: Option<String>,

    /// Print only the resulting data layer.
    #[arg(long)]
    pub events_only: bool,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,

    /// Cart API base URL, overriding the config file.
    #[arg(short, long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the current cart and its item count.
    Show,
    /// Add a product.
    Add {
        /// Product ID.
        id: String,
        /// Quantity; values below one are sent as one.
        #[arg(short, long, default_value = "1")]
        qty: u32,
    },
    /// Remove a product line.
    Remove {
        /// Product ID.
        id: String,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration.
    Show,
    /// Print a default config file.
    Init,
    /// Validate the config file.
    Validate,
}

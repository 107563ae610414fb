//! `storefront`: replay shopper sessions and poke at a cart API from a terminal.
//!
//! ```text
//! storefront session walk.json      # run a scripted session, print the data layer
//! storefront cart add sku-1 -q 2    # mutate the server cart
//! storefront config validate        # check storefront.toml
//! ```

mod commands;
mod context;
mod logging;
mod output;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{CartArgs, ConfigArgs, SessionArgs};

/// Drive cart and analytics flows from the terminal
#[derive(Parser)]
#[command(name = "storefront", author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Show debug lines and raise the log level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Machine-readable output on stdout, JSON logs on stderr
    #[arg(long, global = true)]
    json: bool,

    /// Path to storefront.toml (searched upwards from the cwd otherwise)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scripted shopper session
    Session(SessionArgs),

    /// Inspect and change the server cart
    Cart(CartArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json);

    let output = output::Output::new(cli.verbose, cli.json);
    match run(cli, output.clone()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, output: output::Output) -> Result<()> {
    let ctx = context::Context::load(cli.config.as_deref(), output)?;
    match cli.command {
        Commands::Session(args) => commands::session::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    }
}

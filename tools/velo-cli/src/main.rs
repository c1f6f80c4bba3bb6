//! Velo CLI - Browse the catalog, manage the cart, and check out from a terminal.
//!
//! Commands:
//! - `velo catalog` - List products
//! - `velo cart` - Show or change the cart
//! - `velo shipping` - List shipping methods
//! - `velo payment` - List payment methods
//! - `velo checkout` - Walk the checkout steps and place an order
//! - `velo config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::{CartArgs, CatalogArgs, CheckoutArgs, ConfigArgs, PaymentArgs, ShippingArgs};

/// Velo CLI - Shop the storefront from the command line
#[derive(Parser)]
#[command(name = "velo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products in the catalog
    Catalog(CatalogArgs),

    /// Show or change the cart
    Cart(CartArgs),

    /// List shipping methods
    Shipping(ShippingArgs),

    /// List payment methods
    Payment(PaymentArgs),

    /// Check out the cart and place an order
    Checkout(CheckoutArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Logs go to stderr so they never mix with command output.
fn init_tracing(verbose: bool, json: bool) {
    let default_filter = if verbose {
        "velo_cli=debug,velo_commerce=debug,velo_cache=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.json);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    // Execute command
    let result = match cli.command {
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Shipping(args) => commands::methods::shipping(args, &ctx).await,
        Commands::Payment(args) => commands::methods::payment(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

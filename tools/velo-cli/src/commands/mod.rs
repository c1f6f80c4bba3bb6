//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod methods;

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    /// Only list products with stock.
    #[arg(long)]
    pub in_stock: bool,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Add a product to the cart.
    Add {
        /// Product id from `velo catalog`.
        product_id: u64,

        /// Color, for products that come in several.
        #[arg(short, long)]
        color: Option<String>,

        /// Size, for products that come in several.
        #[arg(short, long)]
        size: Option<String>,

        /// Quantity to add.
        #[arg(short, long, default_value = "1", allow_hyphen_values = true)]
        qty: i64,
    },
    /// Set the quantity of a line. Zero or less removes it.
    Update {
        /// Line id as shown by `velo cart show`.
        line_id: String,

        /// New quantity.
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },
    /// Remove a line.
    Remove {
        /// Line id as shown by `velo cart show`.
        line_id: String,
    },
    /// Empty the cart.
    Clear {
        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the cart and its totals.
    Show {
        /// Price shipping with this method.
        #[arg(long)]
        shipping: Option<String>,
    },
}

/// Arguments for the shipping command.
#[derive(Args)]
pub struct ShippingArgs {
    /// Include disabled methods.
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the payment command.
#[derive(Args)]
pub struct PaymentArgs {}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// TOML file with checkout details. Prompts for anything it leaves out.
    #[arg(short, long)]
    pub details: Option<PathBuf>,

    /// Shipping method id.
    #[arg(long)]
    pub shipping: Option<String>,

    /// Payment method id.
    #[arg(long)]
    pub payment: Option<String>,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,

    /// Write the order JSON to this file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}

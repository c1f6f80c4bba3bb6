//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing::debug;
use velo_cache::FileStore;
use velo_commerce::cart::CartStore;
use velo_commerce::catalog::Product;
use velo_commerce::checkout::{CheckoutSession, SimulatedGateway};
use velo_commerce::{Currency, Money};

use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Where the configuration came from, if a file was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, path);
                (CliConfig::load(&path)?, Some(path))
            }
            None => match Self::find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            },
        };
        debug!(path = ?config_path, "Configuration loaded");

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in CONFIG_FILE_NAMES {
                let candidate = current.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Directory holding the persisted cart.
    pub fn store_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.store.dir)
    }

    /// Open the persisted cart.
    pub fn open_cart(&self) -> Result<CartStore> {
        let dir = self.store_dir();
        let store = FileStore::open(&dir)
            .with_context(|| format!("Failed to open cart store at {}", dir.display()))?;
        Ok(CartStore::new(Arc::new(store))
            .with_settings(&self.config.cart)
            .rehydrate())
    }

    /// Start a checkout with the configured catalogs, policy and gateway.
    pub fn checkout_session(&self) -> CheckoutSession<SimulatedGateway> {
        CheckoutSession::new(self.config.checkout.simulated_gateway())
            .with_policy(self.config.pricing.clone())
            .with_shipping_methods(self.config.shipping_methods())
            .with_payment_methods(self.config.payment_methods())
    }

    /// Look up a product by id.
    pub fn find_product(&self, id: u64) -> Option<Product> {
        self.config.products().into_iter().find(|p| p.id.get() == id)
    }

    /// Store currency.
    pub fn currency(&self) -> Currency {
        self.config.pricing.currency
    }

    /// Format an amount in the store currency.
    pub fn money(&self, amount: Money) -> String {
        self.currency().format(amount)
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        resolve(&self.cwd, path)
    }
}

fn resolve(cwd: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

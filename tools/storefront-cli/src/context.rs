//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use serde::Deserialize;
use storefront_catalog::catalog::Product;

use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Path the configuration was loaded from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

/// Product exports come either as a bare array or wrapped in the API envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProductsPayload {
    Bare(Vec<Product>),
    Envelope { data: Vec<Product> },
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        if let Some(path) = &config_path {
            tracing::debug!(path = %path.display(), "loaded config");
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some((config, config_path));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    /// Load the product export named on the command line or in the config.
    pub fn load_products(&self, override_path: Option<&str>) -> Result<Vec<Product>> {
        let Some(path) = override_path.or(self.config.catalog.products.as_deref()) else {
            bail!("No product file given. Pass --products or set catalog.products in the config.");
        };

        let path = self.resolve_path(path);
        let products = read_products(&path)?;
        tracing::debug!(path = %path.display(), count = products.len(), "loaded products");
        Ok(products)
    }
}

/// Read a JSON product export.
pub fn read_products(path: &Path) -> Result<Vec<Product>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read products file: {}", path.display()))?;

    let payload: ProductsPayload = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse products file: {}", path.display()))?;

    Ok(match payload {
        ProductsPayload::Bare(products) => products,
        ProductsPayload::Envelope { data } => data,
    })
}

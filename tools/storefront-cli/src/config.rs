//! CLI configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use storefront_catalog::search::{FilterState, SortKey};

/// Config file names searched for, in order.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["storefront.toml", ".storefront.toml", "storefront.json"];

/// Day ranges above this are flagged by `validate`.
const MAX_REASONABLE_DAY_RANGE: i64 = 36_500;

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CliConfig {
    /// Product source configuration.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Default filters applied before command-line overrides.
    #[serde(default)]
    pub filters: FilterState,

    /// Display configuration.
    #[serde(default)]
    pub display: DisplayConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }

    /// Check the config for values the pipeline would silently coerce.
    pub fn validate(&self) -> (Vec<String>, Vec<String>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let f = &self.filters;

        if let (Some(min), Some(max)) = (f.min_price, f.max_price) {
            if min > max {
                warnings.push(format!(
                    "filters.min_price ({}) exceeds filters.max_price ({}); bounds will be swapped",
                    min, max
                ));
            }
        }
        if f.min_price.is_some_and(|min| min < 0.0) {
            warnings.push("filters.min_price is negative and will be ignored".to_string());
        }
        if f.day_range <= 0 {
            warnings.push(format!(
                "filters.day_range ({}) is not positive; the default window is used",
                f.day_range
            ));
        }
        if f.day_range > MAX_REASONABLE_DAY_RANGE {
            warnings.push(format!(
                "filters.day_range ({}) spans more than a century; windows past the \
                 representable date range are open-ended",
                f.day_range
            ));
        }
        if self.display.limit == 0 {
            errors.push("display.limit must be at least 1".to_string());
        }
        if self.catalog.products.is_none() {
            warnings.push("catalog.products is not set; pass --products on each run".to_string());
        }

        (errors, warnings)
    }
}

/// Where product data comes from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogConfig {
    /// Path to a JSON product export.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<String>,
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    /// Default sort key.
    #[serde(default)]
    pub sort: SortKey,

    /// Maximum rows printed in table mode.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Currency symbol used for prices.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_limit() -> usize {
    20
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            sort: SortKey::default(),
            limit: default_limit(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

/// Generate the default config file contents.
pub fn generate_default_config(products: Option<&str>) -> String {
    let products_line = match products {
        Some(path) => format!("products = \"{}\"", path),
        None => "# products = \"products.json\"".to_string(),
    };

    format!(
        r#"# Storefront CLI configuration

[catalog]
{products_line}

[filters]
# min_price = 0
# max_price = 500
# date_from = "2024-01-01"
day_range = 30
# sale_type = "sale"      # sale | discount | new
# categories = ["shoes"]
# brand_id = "1"
# color_id = "1"
# gender = "men"
# search = "air"

[display]
sort = "default"          # default | price-asc | price-desc | name-asc | name-desc | newest | discount
limit = 20
currency_symbol = "$"
"#
    )
}

//! CLI command implementations.

pub mod config;
pub mod filter;
pub mod stats;

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use storefront_catalog::catalog::timestamp::parse_timestamp;
use storefront_catalog::ids::{BrandId, ColorId};
use storefront_catalog::search::{FilterState, ListingQuery, SaleType, SortKey};

/// Filter flags shared by the listing commands.
///
/// Values given here override the `[filters]` section of the config.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Listing URL query string (e.g. "q=air&sale=discount&sort=price-asc").
    #[arg(long)]
    pub query: Option<String>,

    /// Minimum effective price.
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Maximum effective price.
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Start of the update-date window (YYYY-MM-DD or RFC 3339).
    #[arg(long)]
    pub since: Option<String>,

    /// Width of the update-date window in days.
    #[arg(long)]
    pub days: Option<i64>,

    /// Sale filter: sale, discount or new.
    #[arg(long)]
    pub sale: Option<SaleType>,

    /// Category to include (repeatable).
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Brand id.
    #[arg(long)]
    pub brand: Option<String>,

    /// Color id.
    #[arg(long)]
    pub color: Option<String>,

    /// Gender.
    #[arg(long)]
    pub gender: Option<String>,

    /// Free-text search over name, description and brand.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Ignore the filters from the config file.
    #[arg(long)]
    pub no_config_filters: bool,
}

impl FilterArgs {
    /// Layer these flags over `base` and return the listing query.
    ///
    /// Order of precedence: flags, then `--query`, then `base`.
    pub fn resolve(&self, base: &FilterState, sort: SortKey) -> Result<ListingQuery> {
        let mut query = match &self.query {
            Some(qs) => {
                let mut parsed =
                    ListingQuery::from_query_string(qs).context("Invalid --query value")?;
                if !qs.split('&').any(|pair| pair.trim_start_matches('?').starts_with("sort=")) {
                    parsed.sort = sort;
                }
                parsed
            }
            None => ListingQuery {
                filters: if self.no_config_filters {
                    FilterState::default()
                } else {
                    base.clone()
                },
                sort,
            },
        };

        let f = &mut query.filters;
        if let Some(min) = self.min_price {
            f.min_price = Some(min);
        }
        if let Some(max) = self.max_price {
            f.max_price = Some(max);
        }
        if let Some(since) = &self.since {
            let date = parse_timestamp(since)
                .with_context(|| format!("Invalid --since date: {}", since))?;
            f.date_from = Some(date);
        }
        if let Some(days) = self.days {
            f.day_range = days;
        }
        if let Some(sale) = self.sale {
            f.sale_type = Some(sale);
        }
        f.categories.extend(self.categories.iter().cloned());
        if let Some(brand) = &self.brand {
            f.brand_id = Some(BrandId::new(brand.as_str()));
        }
        if let Some(color) = &self.color {
            f.color_id = Some(ColorId::new(color.as_str()));
        }
        if let Some(gender) = &self.gender {
            f.gender = Some(gender.clone());
        }
        if let Some(search) = &self.search {
            f.search = Some(search.clone());
        }

        query.filters = std::mem::take(&mut query.filters).normalized();
        Ok(query)
    }
}

/// Arguments for the filter command.
#[derive(Args)]
pub struct FilterCommandArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Product export (JSON). Defaults to catalog.products from the config.
    #[arg(short, long)]
    pub products: Option<String>,

    /// Sort key (default, price-asc, price-desc, name-asc, name-desc, newest, discount).
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// Maximum rows to print.
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the stats command.
#[derive(Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Product export (JSON). Defaults to catalog.products from the config.
    #[arg(short, long)]
    pub products: Option<String>,

    /// Skip facet counts.
    #[arg(long)]
    pub no_facets: bool,
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
        /// Product export to reference.
        #[arg(short, long)]
        products: Option<String>,

        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let base = FilterState {
            min_price: Some(10.0),
            search: Some("classic".to_string()),
            ..FilterState::default()
        };
        let args = FilterArgs {
            search: Some("air".to_string()),
            categories: vec!["shoes".to_string()],
            sale: Some(SaleType::New),
            ..FilterArgs::default()
        };

        let query = args.resolve(&base, SortKey::Newest).unwrap();
        assert_eq!(query.filters.min_price, Some(10.0));
        assert_eq!(query.filters.search.as_deref(), Some("air"));
        assert!(query.filters.categories.contains("shoes"));
        assert_eq!(query.filters.sale_type, Some(SaleType::New));
        assert_eq!(query.sort, SortKey::Newest);
    }

    #[test]
    fn test_query_string_replaces_config_filters() {
        let base = FilterState {
            min_price: Some(10.0),
            ..FilterState::default()
        };
        let args = FilterArgs {
            query: Some("q=air&sort=price-desc".to_string()),
            max_price: Some(99.0),
            ..FilterArgs::default()
        };

        let query = args.resolve(&base, SortKey::Newest).unwrap();
        assert_eq!(query.filters.min_price, None);
        assert_eq!(query.filters.max_price, Some(99.0));
        assert_eq!(query.filters.search.as_deref(), Some("air"));
        assert_eq!(query.sort, SortKey::PriceDesc);
    }

    #[test]
    fn test_no_config_filters() {
        let base = FilterState {
            gender: Some("men".to_string()),
            ..FilterState::default()
        };
        let args = FilterArgs {
            no_config_filters: true,
            ..FilterArgs::default()
        };
        let query = args.resolve(&base, SortKey::Default).unwrap();
        assert!(query.filters.is_empty());
    }

    #[test]
    fn test_invalid_since() {
        let args = FilterArgs {
            since: Some("last week".to_string()),
            ..FilterArgs::default()
        };
        assert!(args.resolve(&FilterState::default(), SortKey::Default).is_err());
    }
}

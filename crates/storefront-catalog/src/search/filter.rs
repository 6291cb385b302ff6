//! Faceted filter state and the predicate engine.

use crate::catalog::{timestamp, Product};
use crate::error::CatalogError;
use crate::ids::{BrandId, ColorId};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Default width of the date window, in days.
pub const DEFAULT_DAY_RANGE: i64 = 30;

/// Single-select sale filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleType {
    /// Any product carrying a sale price.
    Sale,
    /// Products whose sale price is below the base price.
    Discount,
    /// Products flagged as new arrivals.
    New,
}

impl SaleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleType::Sale => "sale",
            SaleType::Discount => "discount",
            SaleType::New => "new",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SaleType::Sale => "On Sale",
            SaleType::Discount => "Discounted",
            SaleType::New => "New Arrivals",
        }
    }

    fn matches(&self, product: &Product) -> bool {
        match self {
            SaleType::Sale => product.is_on_sale(),
            SaleType::Discount => product.has_discount(),
            SaleType::New => product.is_new,
        }
    }
}

impl FromStr for SaleType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sale" => Ok(SaleType::Sale),
            "discount" => Ok(SaleType::Discount),
            "new" => Ok(SaleType::New),
            other => Err(CatalogError::InvalidSaleType(other.to_string())),
        }
    }
}

impl fmt::Display for SaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The active filter predicates for a product listing.
///
/// A plain value owned by the caller. The engine reads it and never keeps
/// a reference past one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    /// Lower bound on effective price (unset means 0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    /// Upper bound on effective price (unset means unbounded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    /// Start of the update-date window.
    #[serde(
        deserialize_with = "timestamp::deserialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_from: Option<DateTime<Utc>>,
    /// Width of the update-date window in days.
    pub day_range: i64,
    /// Sale/discount/new selector.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_type: Option<SaleType>,
    /// Selected categories (OR within the set).
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub categories: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<BrandId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_id: Option<ColorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Case-insensitive substring over name, description and brand name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            min_price: None,
            max_price: None,
            date_from: None,
            day_range: DEFAULT_DAY_RANGE,
            sale_type: None,
            categories: BTreeSet::new(),
            brand_id: None,
            color_id: None,
            gender: None,
            search: None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl FilterState {
    /// Create an empty filter state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Coerce malformed values to their defaults.
    ///
    /// Non-positive day ranges fall back to 30 days, negative or NaN lower
    /// bounds and NaN upper bounds are dropped, inverted bounds are swapped,
    /// and blank text values are unset.
    pub fn normalized(self) -> Self {
        let original = self.clone();

        let day_range = if self.day_range > 0 {
            self.day_range
        } else {
            DEFAULT_DAY_RANGE
        };

        let min_price = self.min_price.filter(|v| !v.is_nan() && *v >= 0.0);
        let max_price = self.max_price.filter(|v| !v.is_nan());
        let (min_price, max_price) = match (min_price, max_price) {
            (Some(min), Some(max)) if min > max => (Some(max.max(0.0)), Some(min)),
            bounds => bounds,
        };

        let normalized = Self {
            min_price,
            max_price,
            date_from: self.date_from,
            day_range,
            sale_type: self.sale_type,
            categories: self
                .categories
                .into_iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            brand_id: non_empty(self.brand_id.map(BrandId::into_inner)).map(BrandId::new),
            color_id: non_empty(self.color_id.map(ColorId::into_inner)).map(ColorId::new),
            gender: non_empty(self.gender),
            search: non_empty(self.search),
        };

        if normalized != original {
            tracing::debug!(before = ?original, after = ?normalized, "normalized filter state");
        }

        normalized
    }

    /// Check if no predicate is active.
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Number of active predicate categories.
    pub fn active_count(&self) -> usize {
        [
            self.min_price.is_some() || self.max_price.is_some(),
            self.date_from.is_some(),
            self.sale_type.is_some(),
            !self.categories.is_empty(),
            self.brand_id.is_some(),
            self.color_id.is_some(),
            self.gender.is_some(),
            self.search.as_deref().is_some_and(|s| !s.is_empty()),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// Reset every predicate.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Add the category if absent, remove it if present.
    pub fn toggle_category(&mut self, category: impl Into<String>) {
        let category = category.into();
        if !self.categories.remove(&category) {
            self.categories.insert(category);
        }
    }

    /// End of the date window, if one is active.
    ///
    /// A window reaching past the representable range is open-ended.
    pub fn date_until(&self) -> Option<DateTime<Utc>> {
        self.date_from.map(|start| {
            TimeDelta::try_days(self.day_range)
                .and_then(|range| start.checked_add_signed(range))
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
        })
    }

    /// Check a product against every active predicate.
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_price(product)
            && self.matches_date(product)
            && self.matches_sale_type(product)
            && self.matches_categories(product)
            && self.matches_brand(product)
            && self.matches_color(product)
            && self.matches_gender(product)
            && self.matches_search(product)
    }

    fn matches_price(&self, product: &Product) -> bool {
        let price = product.effective_price();
        let min = self.min_price.unwrap_or(0.0);
        let max = self.max_price.unwrap_or(f64::INFINITY);
        min <= price && price <= max
    }

    // Products without an update time pass the window.
    fn matches_date(&self, product: &Product) -> bool {
        match (self.date_from, self.date_until(), product.updated_at) {
            (Some(start), Some(end), Some(updated)) => start <= updated && updated <= end,
            _ => true,
        }
    }

    fn matches_sale_type(&self, product: &Product) -> bool {
        self.sale_type.map_or(true, |sale| sale.matches(product))
    }

    fn matches_categories(&self, product: &Product) -> bool {
        self.categories.is_empty()
            || product
                .category_names()
                .any(|name| self.categories.contains(name))
    }

    fn matches_brand(&self, product: &Product) -> bool {
        self.brand_id
            .as_ref()
            .map_or(true, |id| product.brand_id() == Some(id))
    }

    fn matches_color(&self, product: &Product) -> bool {
        self.color_id
            .as_ref()
            .map_or(true, |id| product.color_id() == Some(id))
    }

    fn matches_gender(&self, product: &Product) -> bool {
        self.gender
            .as_deref()
            .map_or(true, |gender| product.gender.as_deref() == Some(gender))
    }

    fn matches_search(&self, product: &Product) -> bool {
        let needle = match self.search.as_deref() {
            Some(q) if !q.is_empty() => q.to_lowercase(),
            _ => return true,
        };

        let hit = |text: &str| text.to_lowercase().contains(&needle);

        hit(&product.name)
            || product.description.as_deref().is_some_and(hit)
            || product.brand_name().is_some_and(hit)
    }
}

/// Keep the products that satisfy every active predicate, in input order.
pub fn filter_products(products: &[Product], filters: &FilterState) -> Vec<Product> {
    products
        .iter()
        .filter(|product| filters.matches(product))
        .cloned()
        .collect()
}

//! Product types.

use crate::catalog::timestamp;
use crate::ids::{BrandId, ColorId, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Nested brand reference as embedded by the product endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BrandRef {
    #[serde(default)]
    pub id: Option<BrandId>,
    #[serde(default)]
    pub name: Option<String>,
}

impl BrandRef {
    pub fn new(id: impl Into<BrandId>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
        }
    }
}

/// Nested color reference as embedded by the product endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ColorRef {
    #[serde(default)]
    pub id: Option<ColorId>,
    #[serde(default)]
    pub name: Option<String>,
}

impl ColorRef {
    pub fn new(id: impl Into<ColorId>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
        }
    }
}

/// A product as listed in the storefront catalog.
///
/// Read-only to the filter pipeline. Most fields are optional because the
/// backend omits them freely; the accessors below encode how each engine
/// coalesces missing values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    #[serde(default)]
    pub name: String,
    /// Base price.
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<f64>,
    /// Discounted price, if the product is on sale.
    #[serde(default, deserialize_with = "lenient_price")]
    pub price_sale: Option<f64>,
    /// Direct brand id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<BrandId>,
    /// Embedded brand reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<BrandRef>,
    /// Direct color id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_id: Option<ColorId>,
    /// Embedded color reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorRef>,
    /// Single category name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Category names (a bare string is accepted too).
    #[serde(
        default,
        deserialize_with = "string_or_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub categories: Vec<String>,
    /// Target gender.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Whether the product is flagged as a new arrival.
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_new: bool,
    /// Creation time.
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Truthiness of a numeric field: present, non-zero and not NaN.
fn truthy(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

impl Product {
    /// Create a product with only an id and a name.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: None,
            price_sale: None,
            brand_id: None,
            brand: None,
            color_id: None,
            color: None,
            category: None,
            categories: Vec::new(),
            gender: None,
            is_new: false,
            created_at: None,
            updated_at: None,
            description: None,
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_sale_price(mut self, price_sale: f64) -> Self {
        self.price_sale = Some(price_sale);
        self
    }

    pub fn with_brand(mut self, brand: BrandRef) -> Self {
        self.brand = Some(brand);
        self
    }

    pub fn with_color(mut self, color: ColorRef) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    pub fn mark_new(mut self) -> Self {
        self.is_new = true;
        self
    }

    /// The sale price, if present and truthy.
    pub fn sale_price(&self) -> Option<f64> {
        truthy(self.price_sale)
    }

    /// Check if the product carries a sale price.
    pub fn is_on_sale(&self) -> bool {
        self.sale_price().is_some()
    }

    /// Price the customer pays: sale price, else base price, else zero.
    pub fn effective_price(&self) -> f64 {
        self.sale_price()
            .or_else(|| truthy(self.price))
            .unwrap_or(0.0)
    }

    /// Check if the sale price is a genuine markdown below the base price.
    pub fn has_discount(&self) -> bool {
        match (truthy(self.price), self.sale_price()) {
            (Some(price), Some(sale)) => price > sale,
            _ => false,
        }
    }

    /// Markdown as a percentage of the base price, or zero.
    pub fn discount_percentage(&self) -> f64 {
        match (truthy(self.price), self.sale_price()) {
            (Some(price), Some(sale)) => (price - sale) / price * 100.0,
            _ => 0.0,
        }
    }

    /// Brand id from the direct field, falling back to the embedded reference.
    pub fn brand_id(&self) -> Option<&BrandId> {
        self.brand_id
            .as_ref()
            .or_else(|| self.brand.as_ref().and_then(|b| b.id.as_ref()))
    }

    pub fn brand_name(&self) -> Option<&str> {
        self.brand.as_ref().and_then(|b| b.name.as_deref())
    }

    /// Color id from the direct field, falling back to the embedded reference.
    pub fn color_id(&self) -> Option<&ColorId> {
        self.color_id
            .as_ref()
            .or_else(|| self.color.as_ref().and_then(|c| c.id.as_ref()))
    }

    pub fn color_name(&self) -> Option<&str> {
        self.color.as_ref().and_then(|c| c.name.as_deref())
    }

    /// All category names, single field first.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.category
            .as_deref()
            .into_iter()
            .chain(self.categories.iter().map(String::as_str))
    }

    /// Timestamp used for "newest" ordering: creation, else update, else epoch.
    pub fn recency(&self) -> DateTime<Utc> {
        self.created_at
            .or(self.updated_at)
            .unwrap_or(DateTime::UNIX_EPOCH)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(f64),
    Text(String),
}

/// Accept prices as JSON numbers or numeric strings; anything else is missing.
fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawPrice>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawPrice::Number(n)) => Some(n),
        Some(RawPrice::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Number(i64),
    Text(String),
}

/// Accept `true`, `1` or `"1"`/`"true"` for boolean flags.
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawFlag>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawFlag::Bool(b)) => b,
        Some(RawFlag::Number(n)) => n != 0,
        Some(RawFlag::Text(s)) => matches!(s.trim(), "1" | "true"),
        None => false,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    One(String),
    Many(Vec<String>),
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<StringOrList>::deserialize(deserializer)?;
    Ok(match raw {
        Some(StringOrList::One(s)) => vec![s],
        Some(StringOrList::Many(v)) => v,
        None => Vec::new(),
    })
}

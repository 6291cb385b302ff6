//! Derived listing statistics and facet counts.

use crate::catalog::Product;
use crate::search::FilterState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Min/max effective price over a collection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// Summary statistics for one pipeline pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DerivedStats {
    /// Size of the collection before filtering.
    pub total: usize,
    /// Size of the collection after filtering.
    pub filtered: usize,
    /// Filtered products carrying a sale price.
    pub sale_products: usize,
    /// Filtered products flagged as new.
    pub new_products: usize,
    /// Effective price range of the filtered products; zero when empty.
    pub price_range: PriceRange,
}

/// Compute statistics over the filtered collection in a single pass.
pub fn aggregate(total: usize, filtered: &[Product]) -> DerivedStats {
    let mut stats = DerivedStats {
        total,
        filtered: filtered.len(),
        ..DerivedStats::default()
    };

    let mut range: Option<PriceRange> = None;
    for product in filtered {
        if product.is_on_sale() {
            stats.sale_products += 1;
        }
        if product.is_new {
            stats.new_products += 1;
        }

        let price = product.effective_price();
        range = Some(match range {
            None => PriceRange {
                min: price,
                max: price,
            },
            Some(r) => PriceRange {
                min: r.min.min(price),
                max: r.max.max(price),
            },
        });
    }

    stats.price_range = range.unwrap_or_default();
    stats
}

/// Type of facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacetType {
    /// Multi-select discrete values (e.g., categories).
    Terms,
    /// Single-select discrete values (e.g., brand).
    Choice,
}

/// A facet for filtering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Facet {
    /// Facet name (e.g., "Category", "Brand").
    pub name: String,
    /// Filter field this facet drives.
    pub field: String,
    /// Type of facet.
    pub facet_type: FacetType,
    /// Facet values, most common first.
    pub values: Vec<FacetValue>,
}

impl Facet {
    fn new(name: &str, field: &str, facet_type: FacetType) -> Self {
        Self {
            name: name.to_string(),
            field: field.to_string(),
            facet_type,
            values: Vec::new(),
        }
    }

    /// Find a value by its key.
    pub fn value(&self, value: &str) -> Option<&FacetValue> {
        self.values.iter().find(|v| v.value == value)
    }
}

/// A single facet value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FacetValue {
    /// Value used by the filter (category name, brand id, ...).
    pub value: String,
    /// Human label, when it differs from the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Number of filtered products with this value.
    pub count: usize,
    /// Whether currently selected.
    pub selected: bool,
}

#[derive(Default)]
struct Tally {
    counts: HashMap<String, (Option<String>, usize)>,
}

impl Tally {
    fn add(&mut self, value: &str, label: Option<&str>) {
        let entry = self
            .counts
            .entry(value.to_string())
            .or_insert_with(|| (label.map(str::to_string), 0));
        if entry.0.is_none() {
            entry.0 = label.map(str::to_string);
        }
        entry.1 += 1;
    }

    fn into_facet(self, mut facet: Facet, is_selected: impl Fn(&str) -> bool) -> Facet {
        let mut values: Vec<FacetValue> = self
            .counts
            .into_iter()
            .map(|(value, (label, count))| FacetValue {
                selected: is_selected(&value),
                value,
                label,
                count,
            })
            .collect();
        values.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
        facet.values = values;
        facet
    }
}

/// Count category, brand, color and gender values over the filtered products.
///
/// `selected` mirrors the active filter state so the view can render checked
/// options without consulting it again.
pub fn build_facets(filtered: &[Product], filters: &FilterState) -> Vec<Facet> {
    let mut categories = Tally::default();
    let mut brands = Tally::default();
    let mut colors = Tally::default();
    let mut genders = Tally::default();

    for product in filtered {
        let mut seen: Vec<&str> = Vec::new();
        for name in product.category_names() {
            if !seen.contains(&name) {
                seen.push(name);
                categories.add(name, None);
            }
        }
        if let Some(id) = product.brand_id() {
            brands.add(id.as_str(), product.brand_name());
        }
        if let Some(id) = product.color_id() {
            colors.add(id.as_str(), product.color_name());
        }
        if let Some(gender) = product.gender.as_deref() {
            genders.add(gender, None);
        }
    }

    vec![
        categories.into_facet(Facet::new("Category", "category", FacetType::Terms), |v| {
            filters.categories.contains(v)
        }),
        brands.into_facet(Facet::new("Brand", "brand", FacetType::Choice), |v| {
            filters.brand_id.as_ref().is_some_and(|id| id.as_str() == v)
        }),
        colors.into_facet(Facet::new("Color", "color", FacetType::Choice), |v| {
            filters.color_id.as_ref().is_some_and(|id| id.as_str() == v)
        }),
        genders.into_facet(Facet::new("Gender", "gender", FacetType::Choice), |v| {
            filters.gender.as_deref() == Some(v)
        }),
    ]
}

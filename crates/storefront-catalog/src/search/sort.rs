//! Sort keys and the sort engine.

use crate::catalog::Product;
use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Sort options for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Keep the input order.
    #[default]
    Default,
    /// Sort by effective price, low to high.
    PriceAsc,
    /// Sort by effective price, high to low.
    PriceDesc,
    /// Sort by name A-Z.
    ///
    /// Names are case-folded and then compared by code point. This is not
    /// locale collation: accented initials sort after `z`.
    NameAsc,
    /// Sort by name Z-A, with the same comparison as `NameAsc`.
    NameDesc,
    /// Sort by newest first.
    Newest,
    /// Sort by largest markdown first.
    Discount,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::Default,
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::NameAsc,
        SortKey::NameDesc,
        SortKey::Newest,
        SortKey::Discount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Default => "default",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
            SortKey::Newest => "newest",
            SortKey::Discount => "discount",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortKey::Default => "Featured",
            SortKey::PriceAsc => "Price: Low to High",
            SortKey::PriceDesc => "Price: High to Low",
            SortKey::NameAsc => "Name: A-Z",
            SortKey::NameDesc => "Name: Z-A",
            SortKey::Newest => "Newest",
            SortKey::Discount => "Biggest Discount",
        }
    }

    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortKey::Default => Ordering::Equal,
            SortKey::PriceAsc => compare_f64(a.effective_price(), b.effective_price()),
            SortKey::PriceDesc => compare_f64(b.effective_price(), a.effective_price()),
            SortKey::NameAsc => compare_names(&a.name, &b.name),
            SortKey::NameDesc => compare_names(&b.name, &a.name),
            SortKey::Newest => b.recency().cmp(&a.recency()),
            SortKey::Discount => compare_f64(b.discount_percentage(), a.discount_percentage()),
        }
    }
}

impl FromStr for SortKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('_', "-");
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str() == key)
            .ok_or_else(|| CatalogError::InvalidSortKey(s.to_string()))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Incomparable values (NaN) are treated as equal so the sort stays stable.
fn compare_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Case-insensitive comparison with the raw string as tiebreak.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Return a sorted copy of `products`. Equal keys keep their input order.
pub fn sort_products(products: &[Product], key: SortKey) -> Vec<Product> {
    let mut sorted = products.to_vec();
    if key != SortKey::Default {
        sorted.sort_by(|a, b| key.compare(a, b));
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_default_keeps_order() {
        let products = vec![
            Product::new("3", "c").with_price(5.0),
            Product::new("1", "a").with_price(1.0),
            Product::new("2", "b").with_price(3.0),
        ];
        assert_eq!(sort_products(&products, SortKey::Default), products);
    }

    #[test]
    fn test_price_sorts_are_stable() {
        let products = vec![
            Product::new("1", "x").with_price(20.0),
            Product::new("2", "y").with_price(10.0),
            Product::new("3", "z").with_price(40.0).with_sale_price(20.0),
            Product::new("4", "w"),
        ];
        assert_eq!(ids(&sort_products(&products, SortKey::PriceAsc)), vec!["4", "2", "1", "3"]);
        assert_eq!(ids(&sort_products(&products, SortKey::PriceDesc)), vec!["1", "3", "2", "4"]);
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let products = vec![
            Product::new("1", "banana"),
            Product::new("2", "Apple"),
            Product::new("3", "cherry"),
        ];
        assert_eq!(ids(&sort_products(&products, SortKey::NameAsc)), vec!["2", "1", "3"]);
        assert_eq!(ids(&sort_products(&products, SortKey::NameDesc)), vec!["3", "1", "2"]);
    }

    #[test]
    fn test_name_sort_compares_code_points_after_case_folding() {
        let products = vec![
            Product::new("1", "Éclair"),
            Product::new("2", "zebra"),
            Product::new("3", "Zebra"),
            Product::new("4", "apple"),
        ];
        assert_eq!(
            ids(&sort_products(&products, SortKey::NameAsc)),
            vec!["4", "3", "2", "1"]
        );
    }

    #[test]
    fn test_newest_uses_created_then_updated() {
        let day = |d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap();
        let products = vec![
            Product::new("1", "old").with_created_at(day(1)),
            Product::new("2", "undated"),
            Product::new("3", "updated-only").with_updated_at(day(20)),
            Product::new("4", "recent").with_created_at(day(10)).with_updated_at(day(2)),
        ];
        assert_eq!(ids(&sort_products(&products, SortKey::Newest)), vec!["3", "4", "1", "2"]);
    }

    #[test]
    fn test_discount_sort() {
        let products = vec![
            Product::new("1", "none").with_price(100.0),
            Product::new("2", "ten").with_price(100.0).with_sale_price(90.0),
            Product::new("3", "half").with_price(100.0).with_sale_price(50.0),
            Product::new("4", "also-none").with_sale_price(5.0),
        ];
        assert_eq!(ids(&sort_products(&products, SortKey::Discount)), vec!["3", "2", "1", "4"]);
    }

    #[test]
    fn test_sort_does_not_mutate_input() {
        let products = vec![
            Product::new("1", "b").with_price(10.0),
            Product::new("2", "a").with_price(20.0),
        ];
        let before = products.clone();
        let _ = sort_products(&products, SortKey::PriceDesc);
        assert_eq!(products, before);
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("price-asc".parse::<SortKey>(), Ok(SortKey::PriceAsc));
        assert_eq!("NAME_DESC".parse::<SortKey>(), Ok(SortKey::NameDesc));
        assert!("relevance".parse::<SortKey>().is_err());

        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>(), Ok(key));
        }
    }

    #[test]
    fn test_sort_key_serde() {
        assert_eq!(serde_json::to_string(&SortKey::PriceDesc).unwrap(), "\"price-desc\"");
        let key: SortKey = serde_json::from_str("\"newest\"").unwrap();
        assert_eq!(key, SortKey::Newest);
    }
}

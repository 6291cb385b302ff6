//! Property tests for the filter and sort engines.

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use storefront_catalog::prelude::*;

fn timestamp_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    // 2001-09-09 .. 2033-05-18
    (1_000_000_000i64..2_000_000_000).prop_map(|secs| DateTime::from_timestamp(secs, 0).unwrap())
}

fn product_strategy() -> impl Strategy<Value = Product> {
    (
        0u32..1000,
        prop::sample::select(vec!["Air Max", "Classic", "runner", "Slide", "AIR zoom"]),
        prop::option::of(0.0f64..500.0),
        prop::option::of(0.0f64..500.0),
        prop::option::of(prop::sample::select(vec!["shoes", "bags", "shirts"])),
        prop::option::of(prop::sample::select(vec!["1", "2", "3"])),
        prop::option::of(prop::sample::select(vec!["1", "2"])),
        prop::option::of(prop::sample::select(vec!["men", "women"])),
        prop::option::of(timestamp_strategy()),
        any::<bool>(),
    )
        .prop_map(
            |(id, name, price, sale, category, brand, color, gender, updated_at, is_new)| {
                let mut product = Product::new(id.to_string(), name);
                product.price = price;
                product.price_sale = sale;
                if let Some(category) = category {
                    product = product.with_category(category);
                }
                if let Some(brand) = brand {
                    product = product.with_brand(BrandRef::new(brand, format!("Brand {}", brand)));
                }
                if let Some(color) = color {
                    product = product.with_color(ColorRef::new(color, format!("Color {}", color)));
                }
                product.gender = gender.map(str::to_string);
                product.updated_at = updated_at;
                product.is_new = is_new;
                product
            },
        )
}

fn filter_strategy() -> impl Strategy<Value = FilterState> {
    (
        prop::option::of(0.0f64..300.0),
        prop::option::of(0.0f64..500.0),
        prop::option::of(timestamp_strategy()),
        prop_oneof![any::<i64>(), 1i64..400],
        prop::option::of(prop::sample::select(vec![
            SaleType::Sale,
            SaleType::Discount,
            SaleType::New,
        ])),
        prop::collection::btree_set(
            prop::sample::select(vec!["shoes".to_string(), "bags".to_string()]),
            0..2,
        ),
        prop::option::of(prop::sample::select(vec!["1", "2"])),
        prop::option::of(prop::sample::select(vec!["1", "2"])),
        prop::option::of(prop::sample::select(vec!["men", "women"])),
        prop::option::of(prop::sample::select(vec!["air", "CLASSIC", "x"])),
    )
        .prop_map(
            |(min, max, date_from, day_range, sale, categories, brand, color, gender, search)| {
                FilterState {
                    min_price: min,
                    max_price: max,
                    date_from,
                    day_range,
                    sale_type: sale,
                    categories,
                    brand_id: brand.map(BrandId::new),
                    color_id: color.map(ColorId::new),
                    gender: gender.map(str::to_string),
                    search: search.map(str::to_string),
                }
            },
        )
}

fn sort_strategy() -> impl Strategy<Value = SortKey> {
    prop::sample::select(SortKey::ALL.to_vec())
}

proptest! {
    #[test]
    fn filter_returns_ordered_subset(
        products in prop::collection::vec(product_strategy(), 0..30),
        filters in filter_strategy()
    ) {
        let filtered = filter_products(&products, &filters);
        let mut rest = products.iter();
        for kept in &filtered {
            prop_assert!(rest.any(|p| p == kept));
        }
    }

    #[test]
    fn normalized_filters_are_stable_and_total(
        products in prop::collection::vec(product_strategy(), 0..30),
        filters in filter_strategy()
    ) {
        let normalized = filters.clone().normalized();
        prop_assert!(normalized.day_range > 0);
        prop_assert_eq!(normalized.clone().normalized(), normalized.clone());

        let filtered = filter_products(&products, &normalized);
        prop_assert!(filtered.len() <= products.len());
    }

    #[test]
    fn default_filters_are_identity(products in prop::collection::vec(product_strategy(), 0..30)) {
        prop_assert_eq!(filter_products(&products, &FilterState::default()), products);
    }

    #[test]
    fn filter_is_idempotent(
        products in prop::collection::vec(product_strategy(), 0..30),
        filters in filter_strategy()
    ) {
        let once = filter_products(&products, &filters);
        let twice = filter_products(&once, &filters);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn default_sort_is_no_op(
        products in prop::collection::vec(product_strategy(), 0..30),
        filters in filter_strategy()
    ) {
        let filtered = filter_products(&products, &filters);
        prop_assert_eq!(sort_products(&filtered, SortKey::Default), filtered);
    }

    #[test]
    fn sort_preserves_multiset(
        products in prop::collection::vec(product_strategy(), 0..30),
        key in sort_strategy()
    ) {
        let sorted = sort_products(&products, key);
        prop_assert_eq!(sorted.len(), products.len());
        let mut before: Vec<String> = products.iter().map(|p| format!("{:?}", p)).collect();
        let mut after: Vec<String> = sorted.iter().map(|p| format!("{:?}", p)).collect();
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn stats_match_filtered_collection(
        products in prop::collection::vec(product_strategy(), 0..30),
        filters in filter_strategy()
    ) {
        let filtered = filter_products(&products, &filters);
        let stats = aggregate(products.len(), &filtered);

        prop_assert_eq!(stats.total, products.len());
        prop_assert_eq!(stats.filtered, filtered.len());
        prop_assert!(stats.price_range.min <= stats.price_range.max);
        for product in &filtered {
            let price = product.effective_price();
            prop_assert!(stats.price_range.min <= price && price <= stats.price_range.max);
        }
    }
}

//! Listing query: filter state plus sort key, as carried in page URLs.

use crate::catalog::timestamp::parse_timestamp;
use crate::error::CatalogError;
use crate::ids::{BrandId, ColorId};
use crate::search::{FilterState, SaleType, SortKey};
use serde::{Deserialize, Serialize};

/// Everything a listing page needs to reproduce its view.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListingQuery {
    #[serde(default)]
    pub filters: FilterState,
    #[serde(default)]
    pub sort: SortKey,
}

impl ListingQuery {
    /// Create a new listing query with no filters and the default sort.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text search.
    pub fn with_search(mut self, q: impl Into<String>) -> Self {
        self.filters.search = Some(q.into());
        self
    }

    /// Set the price bounds.
    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.filters.min_price = min;
        self.filters.max_price = max;
        self
    }

    /// Set the sale selector.
    pub fn with_sale_type(mut self, sale_type: SaleType) -> Self {
        self.filters.sale_type = Some(sale_type);
        self
    }

    /// Add a category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.filters.categories.insert(category.into());
        self
    }

    /// Set sort option.
    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Parse a URL query string (without the leading `?`).
    ///
    /// Unknown keys are ignored and empty values mean "unset". The result
    /// is normalized.
    pub fn from_query_string(qs: &str) -> Result<Self, CatalogError> {
        let mut query = ListingQuery::new();
        let filters = &mut query.filters;

        for pair in qs.trim_start_matches('?').split('&') {
            if pair.is_empty() {
                continue;
            }
            let mut parts = pair.splitn(2, '=');
            let key = parts.next().unwrap_or("");
            let value = urlencoding_decode(parts.next().unwrap_or(""));
            if value.trim().is_empty() {
                continue;
            }

            match key {
                "min_price" => filters.min_price = Some(parse_number(key, &value)?),
                "max_price" => filters.max_price = Some(parse_number(key, &value)?),
                "date" => {
                    filters.date_from = Some(
                        parse_timestamp(&value).ok_or(CatalogError::InvalidDate(value))?,
                    )
                }
                "days" => {
                    filters.day_range = value
                        .trim()
                        .parse()
                        .map_err(|_| CatalogError::invalid_number(key, &value))?
                }
                "sale" => filters.sale_type = Some(value.parse()?),
                "category" => {
                    filters.categories.insert(value);
                }
                "brand" => filters.brand_id = Some(BrandId::new(value)),
                "color" => filters.color_id = Some(ColorId::new(value)),
                "gender" => filters.gender = Some(value),
                "q" => filters.search = Some(value),
                "sort" => query.sort = value.parse()?,
                _ => {}
            }
        }

        query.filters = std::mem::take(&mut query.filters).normalized();
        Ok(query)
    }

    /// Render as a URL query string. Only active values are emitted.
    pub fn to_query_string(&self) -> String {
        let f = &self.filters;
        let mut pairs: Vec<(&str, String)> = Vec::new();

        if let Some(min) = f.min_price {
            pairs.push(("min_price", min.to_string()));
        }
        if let Some(max) = f.max_price {
            pairs.push(("max_price", max.to_string()));
        }
        if let Some(date) = f.date_from {
            pairs.push(("date", date.format("%Y-%m-%d").to_string()));
            pairs.push(("days", f.day_range.to_string()));
        }
        if let Some(sale) = f.sale_type {
            pairs.push(("sale", sale.as_str().to_string()));
        }
        for category in &f.categories {
            pairs.push(("category", category.clone()));
        }
        if let Some(brand) = &f.brand_id {
            pairs.push(("brand", brand.to_string()));
        }
        if let Some(color) = &f.color_id {
            pairs.push(("color", color.to_string()));
        }
        if let Some(gender) = &f.gender {
            pairs.push(("gender", gender.clone()));
        }
        if let Some(q) = f.search.as_deref().filter(|q| !q.is_empty()) {
            pairs.push(("q", q.to_string()));
        }
        if self.sort != SortKey::Default {
            pairs.push(("sort", self.sort.as_str().to_string()));
        }

        pairs
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding_encode(&v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn parse_number(field: &str, value: &str) -> Result<f64, CatalogError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CatalogError::invalid_number(field, value))
}

/// Percent-decoding with `+` as space. Invalid escapes are kept verbatim.
fn urlencoding_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                        continue;
                    }
                    None => out.push(b'%'),
                }
            }
            b'+' => out.push(b' '),
            b => out.push(b),
        }
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn urlencoding_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_string() {
        let query = ListingQuery::from_query_string(
            "?min_price=10&max_price=99.5&sale=discount&category=shoes&category=running+gear&brand=7&q=air%20max&sort=price-desc&utm_source=x",
        )
        .unwrap();

        let f = &query.filters;
        assert_eq!(f.min_price, Some(10.0));
        assert_eq!(f.max_price, Some(99.5));
        assert_eq!(f.sale_type, Some(SaleType::Discount));
        assert!(f.categories.contains("shoes"));
        assert!(f.categories.contains("running gear"));
        assert_eq!(f.brand_id, Some(BrandId::new("7")));
        assert_eq!(f.search.as_deref(), Some("air max"));
        assert_eq!(query.sort, SortKey::PriceDesc);
    }

    #[test]
    fn test_empty_values_are_unset() {
        let query = ListingQuery::from_query_string("sale=&q=&min_price=").unwrap();
        assert!(query.filters.is_empty());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            ListingQuery::from_query_string("min_price=cheap"),
            Err(CatalogError::InvalidNumber { .. })
        ));
        assert!(matches!(
            ListingQuery::from_query_string("sale=clearance"),
            Err(CatalogError::InvalidSaleType(_))
        ));
        assert!(matches!(
            ListingQuery::from_query_string("date=someday"),
            Err(CatalogError::InvalidDate(_))
        ));
        assert!(matches!(
            ListingQuery::from_query_string("sort=relevance"),
            Err(CatalogError::InvalidSortKey(_))
        ));
    }

    #[test]
    fn test_negative_days_normalized() {
        let query = ListingQuery::from_query_string("date=2024-01-01&days=-3").unwrap();
        assert_eq!(query.filters.day_range, crate::search::DEFAULT_DAY_RANGE);
    }

    #[test]
    fn test_query_string_round_trip() {
        let query = ListingQuery::new()
            .with_search("air max")
            .with_price_range(Some(10.0), None)
            .with_sale_type(SaleType::New)
            .with_category("shoes & boots")
            .with_sort(SortKey::Newest);

        let qs = query.to_query_string();
        assert_eq!(
            qs,
            "min_price=10&sale=new&category=shoes+%26+boots&q=air+max&sort=newest"
        );
        assert_eq!(ListingQuery::from_query_string(&qs).unwrap(), query);
    }

    #[test]
    fn test_decode_utf8() {
        assert_eq!(urlencoding_decode("caf%C3%A9"), "café");
        assert_eq!(urlencoding_decode("100%"), "100%");
    }
}

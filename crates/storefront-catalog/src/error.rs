//! Catalog error types.
//!
//! The filter, sort and stats engines are total and never fail. Errors only
//! arise at the edges: parsing filter state from URLs or config, and
//! decoding product payloads.

use thiserror::Error;

/// Errors that can occur when building catalog inputs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Unknown sort key.
    #[error("Invalid sort key: {0}")]
    InvalidSortKey(String),

    /// Unknown sale type.
    #[error("Invalid sale type: {0}")]
    InvalidSaleType(String),

    /// A numeric filter value could not be parsed.
    #[error("Invalid number for {field}: {value}")]
    InvalidNumber { field: String, value: String },

    /// A date filter value could not be parsed.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CatalogError {
    pub(crate) fn invalid_number(field: &str, value: &str) -> Self {
        CatalogError::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::SerializationError(e.to_string())
    }
}

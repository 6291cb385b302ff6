//! Newtype IDs for type-safe identifiers.
//!
//! Using newtypes prevents accidentally mixing up different ID types,
//! e.g., comparing a BrandId against a ColorId filter.
//!
//! The storefront API is inconsistent about id encoding, so every id
//! deserializes from either a JSON string or a JSON integer. Ids always
//! serialize as strings.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Wire representation accepted for ids.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Signed(n) => n.to_string(),
            RawId::Unsigned(n) => n.to_string(),
        }
    }
}

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A unique identifier.
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(BrandId);
define_id!(ColorId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new("prod-123");
        assert_eq!(id.as_str(), "prod-123");
    }

    #[test]
    fn test_id_from_string() {
        let id: BrandId = "nike".into();
        assert_eq!(id.as_str(), "nike");
    }

    #[test]
    fn test_id_display() {
        let id = ColorId::new("red");
        assert_eq!(format!("{}", id), "red");
    }

    #[test]
    fn test_id_deserializes_from_integer() {
        let id: BrandId = serde_json::from_str("42").unwrap();
        assert_eq!(id, BrandId::new("42"));
    }

    #[test]
    fn test_id_deserializes_from_string() {
        let id: ProductId = serde_json::from_str("\"sku-9\"").unwrap();
        assert_eq!(id.as_str(), "sku-9");
    }

    #[test]
    fn test_id_serializes_as_string() {
        let id = ColorId::new("7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
    }
}

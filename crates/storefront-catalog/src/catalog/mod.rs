//! Product catalog module.
//!
//! Contains the product model delivered by the storefront API and the
//! lenient decoders for its loosely-typed fields.

mod product;
pub mod timestamp;

pub use product::{BrandRef, ColorRef, Product};

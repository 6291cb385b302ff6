//! Product filtering, sorting and faceted statistics for the storefront catalog.
//!
//! This crate provides the in-memory catalog pipeline behind the product
//! listing pages:
//!
//! - **Catalog**: Products as delivered by the storefront REST API
//! - **Filter**: Faceted filter state and the predicate engine
//! - **Sort**: Sort keys and the stable sort engine
//! - **Stats**: Derived statistics and facet counts
//! - **Pipeline**: Reactive recompute with last-write-wins publishing
//!
//! # Example
//!
//! ```rust
//! use storefront_catalog::prelude::*;
//!
//! let products = vec![
//!     Product::new("1", "Air Max").with_price(120.0).with_sale_price(90.0),
//!     Product::new("2", "Classic").with_price(80.0),
//! ];
//!
//! let filters = FilterState {
//!     sale_type: Some(SaleType::Discount),
//!     ..FilterState::default()
//! };
//!
//! let filtered = filter_products(&products, &filters);
//! let sorted = sort_products(&filtered, SortKey::PriceAsc);
//! let stats = aggregate(products.len(), &sorted);
//!
//! assert_eq!(sorted.len(), 1);
//! assert_eq!(stats.sale_products, 1);
//! ```

pub mod error;
pub mod ids;

pub mod catalog;
pub mod search;

pub use error::CatalogError;
pub use ids::*;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CatalogError;
    pub use crate::ids::*;

    // Catalog
    pub use crate::catalog::{BrandRef, ColorRef, Product};

    // Search
    pub use crate::search::{
        aggregate, build_facets, filter_products, sort_products, CatalogPipeline, CatalogView,
        DerivedStats, Facet, FacetType, FacetValue, FilterState, FnNotifier, ListingQuery,
        NoopNotifier, PipelineInput, PipelineState, PriceRange, SaleType, SortKey, ViewNotifier,
    };
}

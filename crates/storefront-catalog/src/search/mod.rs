//! Search module.
//!
//! Contains the filter, sort and stats engines and the pipeline that
//! drives them.

mod filter;
mod pipeline;
mod query;
mod sort;
mod stats;

pub use filter::{filter_products, FilterState, SaleType, DEFAULT_DAY_RANGE};
pub use pipeline::{
    CatalogPipeline, CatalogView, FnNotifier, NoopNotifier, PipelineInput, PipelineState,
    ViewNotifier,
};
pub use query::ListingQuery;
pub use sort::{sort_products, SortKey};
pub use stats::{aggregate, build_facets, DerivedStats, Facet, FacetType, FacetValue, PriceRange};

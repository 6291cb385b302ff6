//! Reactive catalog pipeline.
//!
//! Wires filter, sort and stats together and republishes a fresh view
//! whenever the product collection, the filter state or the sort key
//! changes. Every change triggers a full recompute.
//!
//! By default recomputation runs synchronously inside the setter. Callers
//! that debounce or move the work elsewhere disable auto-recompute and
//! drive the cycle themselves:
//!
//! ```rust
//! use storefront_catalog::prelude::*;
//!
//! let mut pipeline = CatalogPipeline::new(Vec::<CatalogView>::new());
//! pipeline.set_auto_recompute(false);
//! pipeline.set_products(vec![Product::new("1", "Air Max").with_price(90.0)]);
//!
//! let input = pipeline.snapshot();
//! let view = input.compute();
//! assert!(pipeline.complete(view));
//! assert_eq!(pipeline.notifier().len(), 1);
//! ```

use crate::catalog::Product;
use crate::search::{
    aggregate, build_facets, filter_products, sort_products, DerivedStats, Facet, FilterState,
    SortKey,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// The rendering boundary that receives each published view.
pub trait ViewNotifier {
    fn publish(&mut self, view: &CatalogView);
}

/// Discards every view.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl ViewNotifier for NoopNotifier {
    fn publish(&mut self, _view: &CatalogView) {}
}

/// Buffers every published view.
impl ViewNotifier for Vec<CatalogView> {
    fn publish(&mut self, view: &CatalogView) {
        self.push(view.clone());
    }
}

/// Adapts a closure into a notifier.
pub struct FnNotifier<F>(pub F);

impl<F> ViewNotifier for FnNotifier<F>
where
    F: FnMut(&CatalogView),
{
    fn publish(&mut self, view: &CatalogView) {
        (self.0)(view)
    }
}

/// Output of one pipeline pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogView {
    /// Input generation this view was computed from.
    pub generation: u64,
    /// Sort key applied.
    pub sort: SortKey,
    /// Filtered and sorted products.
    pub products: Vec<Product>,
    /// Statistics over the filtered products.
    pub stats: DerivedStats,
    /// Facet counts over the filtered products.
    pub facets: Vec<Facet>,
}

/// Immutable snapshot of the pipeline inputs.
#[derive(Debug, Clone)]
pub struct PipelineInput {
    pub generation: u64,
    pub products: Arc<[Product]>,
    pub filters: FilterState,
    pub sort: SortKey,
}

impl PipelineInput {
    /// Run filter, sort, stats and facets over the snapshot.
    pub fn compute(&self) -> CatalogView {
        let start = Instant::now();

        let filtered = filter_products(&self.products, &self.filters);
        let products = sort_products(&filtered, self.sort);
        let stats = aggregate(self.products.len(), &products);
        let facets = build_facets(&products, &self.filters);

        tracing::debug!(
            generation = self.generation,
            total = stats.total,
            filtered = stats.filtered,
            sort = %self.sort,
            elapsed_us = start.elapsed().as_micros() as u64,
            "recomputed catalog view"
        );

        CatalogView {
            generation: self.generation,
            sort: self.sort,
            products,
            stats,
            facets,
        }
    }
}

/// Pipeline lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Holding the last inputs and output.
    Idle,
    /// A snapshot has been taken and its view is pending.
    Recomputing,
    /// A view is being handed to the notifier.
    Published,
}

/// Owns the listing inputs and republishes on change.
pub struct CatalogPipeline<N: ViewNotifier = NoopNotifier> {
    products: Arc<[Product]>,
    filters: FilterState,
    sort: SortKey,
    generation: u64,
    // Generation of the most recent snapshot handed out.
    last_snapshot: Option<u64>,
    state: PipelineState,
    current: Option<CatalogView>,
    auto_recompute: bool,
    notifier: N,
}

impl<N: ViewNotifier> CatalogPipeline<N> {
    /// Create an empty pipeline publishing to `notifier`.
    pub fn new(notifier: N) -> Self {
        Self {
            products: Arc::from(Vec::new()),
            filters: FilterState::default(),
            sort: SortKey::Default,
            generation: 0,
            last_snapshot: None,
            state: PipelineState::Idle,
            current: None,
            auto_recompute: true,
            notifier,
        }
    }

    /// Recompute inside every setter (default) or leave it to the caller.
    pub fn set_auto_recompute(&mut self, enabled: bool) {
        self.auto_recompute = enabled;
    }

    /// Replace the product collection.
    ///
    /// Triggers only when the collection is a different allocation.
    pub fn set_products(&mut self, products: impl Into<Arc<[Product]>>) -> bool {
        let products = products.into();
        if Arc::ptr_eq(&self.products, &products) {
            return false;
        }
        self.products = products;
        self.invalidate();
        true
    }

    /// Replace the filter state. The state is normalized first.
    pub fn set_filters(&mut self, filters: FilterState) -> bool {
        let filters = filters.normalized();
        if filters == self.filters {
            return false;
        }
        self.filters = filters;
        self.invalidate();
        true
    }

    /// Edit a copy of the current filter state and apply it.
    pub fn update_filters(&mut self, edit: impl FnOnce(&mut FilterState)) -> bool {
        let mut filters = self.filters.clone();
        edit(&mut filters);
        self.set_filters(filters)
    }

    /// Change the sort key.
    pub fn set_sort(&mut self, sort: SortKey) -> bool {
        if sort == self.sort {
            return false;
        }
        self.sort = sort;
        self.invalidate();
        true
    }

    /// Force a recompute of the current inputs.
    pub fn refresh(&mut self) {
        self.invalidate();
    }

    /// Take a snapshot of the inputs for an out-of-band recompute.
    pub fn snapshot(&mut self) -> PipelineInput {
        self.state = PipelineState::Recomputing;
        self.last_snapshot = Some(self.generation);
        PipelineInput {
            generation: self.generation,
            products: Arc::clone(&self.products),
            filters: self.filters.clone(),
            sort: self.sort,
        }
    }

    /// Publish a computed view unless newer inputs have arrived since its
    /// snapshot. Returns whether the view was published.
    ///
    /// A stale view returns the pipeline to `Idle` unless a newer snapshot
    /// is still out.
    pub fn complete(&mut self, view: CatalogView) -> bool {
        if view.generation != self.generation {
            tracing::trace!(
                stale = view.generation,
                current = self.generation,
                "discarding stale catalog view"
            );
            if self.last_snapshot.map_or(true, |g| g <= view.generation) {
                self.state = PipelineState::Idle;
            }
            return false;
        }

        self.state = PipelineState::Published;
        self.notifier.publish(&view);
        self.current = Some(view);
        self.state = PipelineState::Idle;
        true
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        if self.auto_recompute {
            let view = self.snapshot().compute();
            self.complete(view);
        }
    }

    /// Check if the published view lags behind the inputs.
    pub fn is_stale(&self) -> bool {
        self.current.as_ref().map(|v| v.generation) != Some(self.generation)
    }

    pub fn products(&self) -> &Arc<[Product]> {
        &self.products
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// The last published view.
    pub fn view(&self) -> Option<&CatalogView> {
        self.current.as_ref()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }
}

impl Default for CatalogPipeline<NoopNotifier> {
    fn default() -> Self {
        Self::new(NoopNotifier)
    }
}

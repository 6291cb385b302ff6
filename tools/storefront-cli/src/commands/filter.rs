//! Filter command - filter and sort a product export.

use anyhow::{Context as _, Result};
use storefront_catalog::catalog::Product;
use storefront_catalog::search::{CatalogPipeline, CatalogView};

use super::FilterCommandArgs;
use crate::context::Context;
use crate::output::{format_price, truncate};

const WIDTHS: [usize; 5] = [10, 32, 10, 10, 16];

/// Run the filter command.
pub fn run(args: FilterCommandArgs, ctx: &Context) -> Result<()> {
    let products = ctx.load_products(args.products.as_deref())?;
    let sort = args.sort.unwrap_or(ctx.config.display.sort);
    let query = args.filter.resolve(&ctx.config.filters, sort)?;

    ctx.output.debug(&format!(
        "{} products, {} active filter(s), sort {}",
        products.len(),
        query.filters.active_count(),
        query.sort
    ));

    let mut pipeline = CatalogPipeline::new(Vec::<CatalogView>::new());
    pipeline.set_auto_recompute(false);
    pipeline.set_products(products);
    pipeline.set_filters(query.filters);
    pipeline.set_sort(query.sort);

    let view = pipeline.snapshot().compute();
    pipeline.complete(view);
    let view = pipeline
        .view()
        .context("Catalog view was not published")?;

    if ctx.output.is_json() {
        ctx.output.json(view);
        return Ok(());
    }

    let limit = args.limit.unwrap_or(ctx.config.display.limit);
    print_table(view, limit, ctx);
    Ok(())
}

fn print_table(view: &CatalogView, limit: usize, ctx: &Context) {
    let stats = &view.stats;
    ctx.output.header(&format!(
        "{} of {} products ({})",
        stats.filtered,
        stats.total,
        view.sort.display_name()
    ));

    if view.products.is_empty() {
        ctx.output.info("No products match the current filters");
        return;
    }

    ctx.output
        .table_row(&["ID", "NAME", "PRICE", "SALE", "BRAND"], &WIDTHS);
    for product in view.products.iter().take(limit) {
        let cols = row(product, &ctx.config.display.currency_symbol);
        let cols: Vec<&str> = cols.iter().map(String::as_str).collect();
        ctx.output.table_row(&cols, &WIDTHS);
    }

    if view.products.len() > limit {
        ctx.output.info(&format!(
            "... {} more (use --limit to show more)",
            view.products.len() - limit
        ));
    }
}

fn row(product: &Product, symbol: &str) -> [String; 5] {
    let price = product
        .price
        .map(|p| format_price(p, symbol))
        .unwrap_or_else(|| "-".to_string());
    let sale = match product.sale_price() {
        Some(sale) if product.has_discount() => format!(
            "{} -{:.0}%",
            format_price(sale, symbol),
            product.discount_percentage()
        ),
        Some(sale) => format_price(sale, symbol),
        None => String::new(),
    };

    [
        truncate(product.id.as_str(), WIDTHS[0]),
        product.name.clone(),
        price,
        sale,
        product.brand_name().unwrap_or("").to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_catalog::catalog::BrandRef;

    #[test]
    fn test_row_with_discount() {
        let product = Product::new("42", "Air Max")
            .with_price(100.0)
            .with_sale_price(75.0)
            .with_brand(BrandRef::new("1", "Nike"));

        let cols = row(&product, "$");
        assert_eq!(cols[0], "42");
        assert_eq!(cols[2], "$100.00");
        assert_eq!(cols[3], "$75.00 -25%");
        assert_eq!(cols[4], "Nike");
    }

    #[test]
    fn test_row_without_prices() {
        let cols = row(&Product::new("7", "Gift Card"), "€");
        assert_eq!(cols[2], "-");
        assert_eq!(cols[3], "");
        assert_eq!(cols[4], "");
    }
}

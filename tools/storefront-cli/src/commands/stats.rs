//! Stats command - summary statistics and facet counts.

use anyhow::Result;
use serde::Serialize;
use storefront_catalog::search::{aggregate, build_facets, filter_products, DerivedStats, Facet};

use super::StatsArgs;
use crate::context::Context;
use crate::output::format_price;

#[derive(Serialize)]
struct StatsReport {
    stats: DerivedStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    facets: Vec<Facet>,
}

/// Run the stats command.
pub fn run(args: StatsArgs, ctx: &Context) -> Result<()> {
    let products = ctx.load_products(args.products.as_deref())?;
    let query = args
        .filter
        .resolve(&ctx.config.filters, ctx.config.display.sort)?;

    let filtered = filter_products(&products, &query.filters);
    let report = StatsReport {
        stats: aggregate(products.len(), &filtered),
        facets: if args.no_facets {
            Vec::new()
        } else {
            build_facets(&filtered, &query.filters)
        },
    };

    if ctx.output.is_json() {
        ctx.output.json(&report);
        return Ok(());
    }

    print_report(&report, ctx);
    Ok(())
}

fn print_report(report: &StatsReport, ctx: &Context) {
    let stats = &report.stats;
    let symbol = &ctx.config.display.currency_symbol;

    ctx.output.header("Listing Statistics");
    ctx.output.kv("total", &stats.total.to_string());
    ctx.output.kv("filtered", &stats.filtered.to_string());
    ctx.output.kv("on sale", &stats.sale_products.to_string());
    ctx.output.kv("new", &stats.new_products.to_string());
    ctx.output.kv(
        "price range",
        &format!(
            "{} - {}",
            format_price(stats.price_range.min, symbol),
            format_price(stats.price_range.max, symbol)
        ),
    );

    for facet in report.facets.iter().filter(|f| !f.values.is_empty()) {
        ctx.output.header(&facet.name);
        for value in &facet.values {
            let label = match &value.label {
                Some(label) => format!("{} ({})", label, value.value),
                None => value.value.clone(),
            };
            let marker = if value.selected { " *" } else { "" };
            ctx.output
                .list_item(&format!("{}: {}{}", label, value.count, marker));
        }
    }
}

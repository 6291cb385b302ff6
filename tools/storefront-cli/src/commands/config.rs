//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CONFIG_FILE_NAMES};
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { products, force } => init_config(products.as_deref(), force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.info("No config file found; showing defaults"),
    }

    ctx.output.info("");
    ctx.output.info("[catalog]");
    ctx.output.kv(
        "products",
        ctx.config.catalog.products.as_deref().unwrap_or("(unset)"),
    );

    let f = &ctx.config.filters;
    ctx.output.info("");
    ctx.output.info("[filters]");
    if let Some(min) = f.min_price {
        ctx.output.kv("min_price", &min.to_string());
    }
    if let Some(max) = f.max_price {
        ctx.output.kv("max_price", &max.to_string());
    }
    if let Some(date) = f.date_from {
        ctx.output.kv("date_from", &date.date_naive().to_string());
    }
    ctx.output.kv("day_range", &f.day_range.to_string());
    if let Some(sale) = f.sale_type {
        ctx.output.kv("sale_type", sale.as_str());
    }
    if !f.categories.is_empty() {
        let categories: Vec<&str> = f.categories.iter().map(String::as_str).collect();
        ctx.output.kv("categories", &categories.join(", "));
    }
    if let Some(brand) = &f.brand_id {
        ctx.output.kv("brand_id", brand.as_str());
    }
    if let Some(color) = &f.color_id {
        ctx.output.kv("color_id", color.as_str());
    }
    if let Some(gender) = &f.gender {
        ctx.output.kv("gender", gender);
    }
    if let Some(search) = &f.search {
        ctx.output.kv("search", search);
    }

    ctx.output.info("");
    ctx.output.info("[display]");
    ctx.output.kv("sort", ctx.config.display.sort.as_str());
    ctx.output.kv("limit", &ctx.config.display.limit.to_string());
    ctx.output
        .kv("currency_symbol", &ctx.config.display.currency_symbol);

    Ok(())
}

fn init_config(products: Option<&str>, force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_FILE_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    if let Some(path) = products {
        if !ctx.resolve_path(path).exists() {
            ctx.output
                .warn(&format!("Product file does not exist yet: {}", path));
        }
    }

    fs::write(&config_path, generate_default_config(products))?;
    tracing::debug!(path = %config_path.display(), "wrote config");

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = ctx.config.validate();

    if ctx.output.is_json() {
        ctx.output.json(&validation_report(&errors, &warnings));
        if !errors.is_empty() {
            bail!("Configuration has {} error(s)", errors.len());
        }
        return Ok(());
    }

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

fn validation_report(errors: &[String], warnings: &[String]) -> serde_json::Value {
    serde_json::json!({
        "valid": errors.is_empty(),
        "errors": errors,
        "warnings": warnings,
    })
}

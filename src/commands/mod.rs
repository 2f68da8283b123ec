//! Command handlers: run one analysis and render its result

use anyhow::{Context as _, Result};

use gold_analytics::analytics::{RankOrder, WarehouseAnalyzer};
use gold_analytics::config::Config;
use gold_analytics::models::{Granularity, Warehouse};
use gold_analytics::report::{self, Overview, ReportFormat};

/// Shared state for every command
pub struct Context<'a> {
    analyzer: WarehouseAnalyzer<'a>,
    format: ReportFormat,
}

impl<'a> Context<'a> {
    pub fn new(warehouse: &'a Warehouse, config: &Config, format: ReportFormat) -> Self {
        Self {
            analyzer: WarehouseAnalyzer::with_config(warehouse, &config.segmentation),
            format,
        }
    }
}

pub fn trends(ctx: &Context<'_>, granularity: Granularity) -> Result<String> {
    let rows = ctx.analyzer.sales_over_time(granularity);
    Ok(report::render_rows(&rows, ctx.format)?)
}

pub fn cumulative(ctx: &Context<'_>) -> Result<String> {
    let rows = ctx.analyzer.cumulative_sales();
    Ok(report::render_rows(&rows, ctx.format)?)
}

pub fn performance(ctx: &Context<'_>) -> Result<String> {
    let rows = ctx.analyzer.product_performance();
    Ok(report::render_rows(&rows, ctx.format)?)
}

pub fn product_segments(ctx: &Context<'_>, detail: bool) -> Result<String> {
    if detail {
        let rows = ctx
            .analyzer
            .product_cost_segments()
            .context("Product cost segmentation failed")?;
        return Ok(report::render_rows(&rows, ctx.format)?);
    }
    let rows = ctx
        .analyzer
        .product_segments()
        .context("Product cost segmentation failed")?;
    Ok(report::render_rows(&rows, ctx.format)?)
}

pub fn customer_segments(ctx: &Context<'_>, detail: bool) -> Result<String> {
    if detail {
        let rows = ctx.analyzer.customer_profiles();
        return Ok(report::render_rows(&rows, ctx.format)?);
    }
    let rows = ctx.analyzer.customer_segments();
    Ok(report::render_rows(&rows, ctx.format)?)
}

pub fn contribution(ctx: &Context<'_>) -> Result<String> {
    let rows = ctx
        .analyzer
        .category_contribution()
        .context("Part-to-whole analysis failed")?;
    Ok(report::render_rows(&rows, ctx.format)?)
}

pub fn explore(ctx: &Context<'_>) -> Result<String> {
    let overview = Overview {
        date_range: ctx.analyzer.date_range(),
        metrics: ctx.analyzer.key_metrics(),
    };
    if overview.date_range.is_none() {
        tracing::warn!("No dated sales rows; date range omitted");
    }
    Ok(report::render_overview(&overview, ctx.format)?)
}

pub fn ranking(ctx: &Context<'_>, limit: usize, bottom: bool) -> Result<String> {
    let order = if bottom { RankOrder::Bottom } else { RankOrder::Top };
    let rows = ctx
        .analyzer
        .rank_products(limit, order)
        .context("Product ranking failed")?;
    Ok(report::render_rows(&rows, ctx.format)?)
}

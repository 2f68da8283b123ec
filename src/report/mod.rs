//! Rendering of analysis results for the terminal
//!
//! Results are printed either as an aligned text table or as pretty JSON.
//! Nothing is written to files.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::analytics::{
    CategoryContribution, CumulativeRow, CustomerProfile, DateRange, KeyMetrics, PeriodAggregate,
    ProductCostSegment, ProductRank, ProductYearPerformance, SegmentCount,
};
use crate::error::{Error, Result};
use crate::models::Granularity;

/// Output format for rendered results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(Error::config(format!("unknown report format: {other}"))),
        }
    }
}

/// A simple column-aligned text table
#[derive(Debug, Clone, Default)]
pub struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

impl fmt::Display for TextTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }

        let write_line = |f: &mut fmt::Formatter<'_>, cells: &[String]| -> fmt::Result {
            let line = cells
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| format!("{cell:<w$}"))
                .collect::<Vec<_>>()
                .join("  ");
            writeln!(f, "{}", line.trim_end())
        };

        write_line(f, &self.headers)?;
        let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
        write_line(f, &rule)?;
        for row in &self.rows {
            write_line(f, row)?;
        }
        Ok(())
    }
}

/// Conversion of a result row into text cells
pub trait TableRow {
    fn headers() -> Vec<&'static str>;
    fn cells(&self) -> Vec<String>;
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

fn or_null<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "NULL".to_string(), |v| v.to_string())
}

/// Period label matching the grouping granularity
pub fn period_label(date: chrono::NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Month => date.format("%Y-%m").to_string(),
        Granularity::Year => date.format("%Y").to_string(),
    }
}

impl TableRow for PeriodAggregate {
    fn headers() -> Vec<&'static str> {
        vec!["period", "total_sales", "total_customers", "total_quantity"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            period_label(self.period_start, self.granularity),
            money(self.total_sales),
            self.total_customers.to_string(),
            self.total_quantity.to_string(),
        ]
    }
}

impl TableRow for CumulativeRow {
    fn headers() -> Vec<&'static str> {
        vec![
            "year",
            "total_sales",
            "running_total_sales",
            "avg_price",
            "moving_average_price",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            period_label(self.period_start, Granularity::Year),
            money(self.total_sales),
            money(self.running_total_sales),
            money(self.avg_price),
            money(self.moving_average_price),
        ]
    }
}

impl TableRow for ProductYearPerformance {
    fn headers() -> Vec<&'static str> {
        vec![
            "year",
            "product_name",
            "current_sales",
            "avg_sales",
            "diff_avg",
            "avg_change",
            "py_sales",
            "diff_py",
            "py_change",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.year.to_string(),
            or_null(self.product_name.as_deref()),
            money(self.current_sales),
            money(self.avg_sales),
            money(self.diff_avg),
            self.avg_change.to_string(),
            or_null(self.py_sales.map(money)),
            or_null(self.diff_py.map(money)),
            self.py_change_label().to_string(),
        ]
    }
}

impl TableRow for SegmentCount {
    fn headers() -> Vec<&'static str> {
        vec!["segment", "total"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.segment.clone(), self.total.to_string()]
    }
}

impl TableRow for ProductCostSegment {
    fn headers() -> Vec<&'static str> {
        vec!["product_key", "product_name", "cost", "segment"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.product_key.to_string(),
            or_null(self.product_name.as_deref()),
            or_null(self.cost.map(money)),
            self.segment.clone(),
        ]
    }
}

impl TableRow for CustomerProfile {
    fn headers() -> Vec<&'static str> {
        vec![
            "customer_key",
            "total_spending",
            "first_order",
            "last_order",
            "lifespan_months",
            "segment",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.customer_key.to_string(),
            money(self.total_spending),
            or_null(self.first_order),
            or_null(self.last_order),
            self.lifespan_months.to_string(),
            self.segment.label().to_string(),
        ]
    }
}

impl TableRow for CategoryContribution {
    fn headers() -> Vec<&'static str> {
        vec!["category", "total_sales", "overall_sales", "percentage_of_total"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            or_null(self.category.as_deref()),
            money(self.total_sales),
            money(self.overall_sales),
            format!("{:.2}%", self.percentage_of_total),
        ]
    }
}

impl TableRow for ProductRank {
    fn headers() -> Vec<&'static str> {
        vec!["rank", "product_key", "product_name", "total_revenue"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.rank.to_string(),
            self.product_key.to_string(),
            or_null(self.product_name.as_deref()),
            money(self.total_revenue),
        ]
    }
}

/// Render rows in the requested format
pub fn render_rows<T>(rows: &[T], format: ReportFormat) -> Result<String>
where
    T: TableRow + Serialize,
{
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        ReportFormat::Text => {
            let mut table = TextTable::new(T::headers());
            for row in rows {
                table.push_row(row.cells());
            }
            Ok(table.to_string())
        }
    }
}

/// Exploration summary shown by the `explore` command
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub date_range: Option<DateRange>,
    pub metrics: KeyMetrics,
}

/// Render the exploration summary as a measure/value listing
pub fn render_overview(overview: &Overview, format: ReportFormat) -> Result<String> {
    if format == ReportFormat::Json {
        return Ok(serde_json::to_string_pretty(overview)?);
    }

    let m = &overview.metrics;
    let mut table = TextTable::new(["measure", "value"]);
    if let Some(range) = &overview.date_range {
        table.push_row(vec!["first_order_date".into(), range.first_order.to_string()]);
        table.push_row(vec!["last_order_date".into(), range.last_order.to_string()]);
        table.push_row(vec!["order_range_months".into(), range.range_months.to_string()]);
    }
    table.push_row(vec!["total_sales".into(), money(m.total_sales)]);
    table.push_row(vec!["total_quantity".into(), m.total_quantity.to_string()]);
    table.push_row(vec!["avg_price".into(), money(m.avg_price)]);
    table.push_row(vec!["total_orders".into(), m.total_orders.to_string()]);
    table.push_row(vec!["total_products".into(), m.total_products.to_string()]);
    table.push_row(vec!["total_customers".into(), m.total_customers.to_string()]);
    table.push_row(vec!["ordering_customers".into(), m.ordering_customers.to_string()]);
    Ok(table.to_string())
}

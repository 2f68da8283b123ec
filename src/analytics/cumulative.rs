//! Cumulative analysis: running totals and running average price per year

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::window::{running_mean, running_sum};
use crate::models::{Granularity, SalesFact};

/// Yearly totals with cumulative fields attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeRow {
    /// First day of the year
    pub period_start: NaiveDate,

    /// Sum of `sales_amount` in the year
    pub total_sales: f64,

    /// Mean of `price` over the year's rows
    pub avg_price: f64,

    /// Sum of `total_sales` for this and every earlier year
    pub running_total_sales: f64,

    /// Mean of `avg_price` for this and every earlier year
    ///
    /// This is a prefix mean, not a fixed-width window.
    pub moving_average_price: f64,
}

/// Compute yearly totals with running total and running average price
pub fn cumulative_sales(sales: &[SalesFact]) -> Vec<CumulativeRow> {
    // year -> (sales sum, price sum, row count)
    let mut years: BTreeMap<NaiveDate, (f64, f64, usize)> = BTreeMap::new();

    for fact in sales {
        let Some(date) = fact.order_date else {
            continue;
        };
        let entry = years.entry(Granularity::Year.truncate(date)).or_default();
        entry.0 += fact.sales_amount;
        entry.1 += fact.price;
        entry.2 += 1;
    }

    let yearly: Vec<(NaiveDate, f64, f64)> = years
        .into_iter()
        .map(|(year, (total, price_sum, n))| (year, total, price_sum / n as f64))
        .collect();

    let running_totals = running_sum(yearly.iter().map(|y| y.1));
    let running_prices = running_mean(yearly.iter().map(|y| y.2));

    tracing::debug!(years = yearly.len(), "Computed cumulative sales");

    yearly
        .into_iter()
        .zip(running_totals.into_iter().zip(running_prices))
        .map(
            |((period_start, total_sales, avg_price), (running_total_sales, moving_average_price))| {
                CumulativeRow {
                    period_start,
                    total_sales,
                    avg_price,
                    running_total_sales,
                    moving_average_price,
                }
            },
        )
        .collect()
}

//! Part-to-whole analysis: each category's share of overall sales

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::{AnalyticsError, AnalyticsResult};
use crate::models::{product_index, Product, SalesFact};

/// One category's contribution to overall sales
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryContribution {
    /// `None` for sales of unknown products or products without a category
    pub category: Option<String>,
    pub total_sales: f64,

    /// Sum of `total_sales` across every category
    pub overall_sales: f64,

    /// Share of overall sales in percent, rounded to 2 decimals
    pub percentage_of_total: f64,
}

/// Round half away from zero to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute each category's share of overall sales, ordered by sales descending
///
/// Returns [`AnalyticsError::DivisionByZero`] when categories exist but overall
/// sales sum to zero.
pub fn category_contribution(
    sales: &[SalesFact],
    products: &[Product],
) -> AnalyticsResult<Vec<CategoryContribution>> {
    let index = product_index(products);
    let mut totals: BTreeMap<Option<String>, f64> = BTreeMap::new();

    for fact in sales {
        let category = index
            .get(&fact.product_key)
            .and_then(|p| p.category.clone());
        *totals.entry(category).or_insert(0.0) += fact.sales_amount;
    }

    if totals.is_empty() {
        return Ok(Vec::new());
    }

    let overall_sales: f64 = totals.values().sum();
    if overall_sales == 0.0 {
        return Err(AnalyticsError::DivisionByZero {
            numerator: totals.values().copied().fold(0.0, f64::max),
        });
    }

    let mut out: Vec<CategoryContribution> = totals
        .into_iter()
        .map(|(category, total_sales)| CategoryContribution {
            category,
            total_sales,
            overall_sales,
            percentage_of_total: round2(total_sales / overall_sales * 100.0),
        })
        .collect();
    // BTreeMap order gives category ascending for ties
    out.sort_by(|a, b| b.total_sales.total_cmp(&a.total_sales));

    tracing::debug!(categories = out.len(), overall_sales, "Computed category contribution");
    Ok(out)
}

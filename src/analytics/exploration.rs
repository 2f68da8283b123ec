//! Exploratory summaries: date coverage, headline measures and product ranking

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::error::{AnalyticsError, AnalyticsResult};
use crate::models::{months_between, product_index, Warehouse};

/// First and last order date in the fact table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub first_order: NaiveDate,
    pub last_order: NaiveDate,
    pub range_months: i64,
}

/// Date coverage of the dated sales rows, `None` when there are none
pub fn order_date_range(warehouse: &Warehouse) -> Option<DateRange> {
    let mut dates = warehouse.sales.iter().filter_map(|f| f.order_date);
    let first = dates.next()?;
    let (first_order, last_order) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));

    Some(DateRange {
        first_order,
        last_order,
        range_months: months_between(first_order, last_order),
    })
}

/// Headline measures of the business
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub total_sales: f64,
    pub total_quantity: i64,

    /// Mean of `price` over all sales rows, 0 when there are none
    pub avg_price: f64,

    /// Distinct order numbers; rows without one are not counted
    pub total_orders: usize,
    pub total_products: usize,
    pub total_customers: usize,

    /// Distinct customers with at least one sales row
    pub ordering_customers: usize,
}

/// Compute headline measures
pub fn key_metrics(warehouse: &Warehouse) -> KeyMetrics {
    let sales = &warehouse.sales;
    let total_sales = sales.iter().map(|f| f.sales_amount).sum();
    let total_quantity = sales.iter().map(|f| f.quantity).sum();
    let avg_price = if sales.is_empty() {
        0.0
    } else {
        sales.iter().map(|f| f.price).sum::<f64>() / sales.len() as f64
    };
    let total_orders = sales
        .iter()
        .filter_map(|f| f.order_number.as_deref())
        .collect::<HashSet<_>>()
        .len();
    let ordering_customers = sales
        .iter()
        .map(|f| f.customer_key)
        .collect::<HashSet<_>>()
        .len();

    KeyMetrics {
        total_sales,
        total_quantity,
        avg_price,
        total_orders,
        total_products: warehouse.products.len(),
        total_customers: warehouse.customers.len(),
        ordering_customers,
    }
}

/// Which end of the ranking to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankOrder {
    /// Highest revenue first
    Top,
    /// Lowest revenue first
    Bottom,
}

/// A product's position in the revenue ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRank {
    pub rank: usize,
    pub product_key: u64,
    pub product_name: Option<String>,
    pub total_revenue: f64,
}

/// Rank products by revenue and keep the first `limit`
///
/// Ties are broken by product name (missing names first), then product key.
pub fn rank_products(warehouse: &Warehouse, limit: usize, order: RankOrder) -> AnalyticsResult<Vec<ProductRank>> {
    if limit == 0 {
        return Err(AnalyticsError::InvalidLimit(limit));
    }

    let mut revenue: BTreeMap<u64, f64> = BTreeMap::new();
    for fact in &warehouse.sales {
        *revenue.entry(fact.product_key).or_insert(0.0) += fact.sales_amount;
    }

    let index = product_index(&warehouse.products);
    let mut ranked: Vec<(u64, Option<String>, f64)> = revenue
        .into_iter()
        .map(|(key, total)| {
            let name = index.get(&key).and_then(|p| p.product_name.clone());
            (key, name, total)
        })
        .collect();

    ranked.sort_by(|a, b| {
        let by_revenue = match order {
            RankOrder::Top => b.2.total_cmp(&a.2),
            RankOrder::Bottom => a.2.total_cmp(&b.2),
        };
        by_revenue.then_with(|| a.1.cmp(&b.1)).then_with(|| a.0.cmp(&b.0))
    });
    ranked.truncate(limit);

    Ok(ranked
        .into_iter()
        .enumerate()
        .map(|(i, (product_key, product_name, total_revenue))| ProductRank {
            rank: i + 1,
            product_key,
            product_name,
            total_revenue,
        })
        .collect())
}

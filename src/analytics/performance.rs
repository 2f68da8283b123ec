//! Year-over-year product performance
//!
//! Yearly product revenue compared against the product's own average across
//! all years and against the immediately preceding year present for it.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::window::{lag, mean, partition_by};
use crate::models::{product_index, Product, SalesFact};

/// Position of a year's sales relative to the product average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AvgChange {
    Above,
    Below,
    Avg,
}

impl AvgChange {
    /// Classify a difference from the average by its sign
    #[must_use]
    pub fn from_diff(diff: f64) -> Self {
        if diff > 0.0 {
            Self::Above
        } else if diff < 0.0 {
            Self::Below
        } else {
            Self::Avg
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Above => "Above Avg",
            Self::Below => "Below Avg",
            Self::Avg => "Avg",
        }
    }
}

impl fmt::Display for AvgChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Direction of change against the previous year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PyChange {
    Increase,
    Decrease,
    NoChange,
}

impl PyChange {
    /// Classify a difference from the previous year by its sign
    #[must_use]
    pub fn from_diff(diff: f64) -> Self {
        if diff > 0.0 {
            Self::Increase
        } else if diff < 0.0 {
            Self::Decrease
        } else {
            Self::NoChange
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Increase => "Increase",
            Self::Decrease => "Decrease",
            Self::NoChange => "No Change",
        }
    }
}

impl fmt::Display for PyChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One product's sales for one year, with comparisons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductYearPerformance {
    pub year: i32,

    /// `None` when the fact row references a product missing from the dimension
    pub product_name: Option<String>,

    pub current_sales: f64,

    /// Mean of `current_sales` over every year of this product
    pub avg_sales: f64,
    pub diff_avg: f64,
    pub avg_change: AvgChange,

    /// Sales of the preceding year present for this product
    pub py_sales: Option<f64>,
    pub diff_py: Option<f64>,
    pub py_change: Option<PyChange>,
}

impl ProductYearPerformance {
    /// Report label for `py_change`; a missing prior year reads as "No Change"
    pub fn py_change_label(&self) -> &'static str {
        self.py_change.map_or(PyChange::NoChange.label(), |c| c.label())
    }
}

/// Compare yearly product sales against the product average and the prior year
///
/// Output is ordered by product name (missing names first), then year.
pub fn product_performance(sales: &[SalesFact], products: &[Product]) -> Vec<ProductYearPerformance> {
    let index = product_index(products);
    let mut yearly: BTreeMap<(Option<String>, i32), f64> = BTreeMap::new();
    let mut unmatched = 0usize;

    for fact in sales {
        let Some(date) = fact.order_date else {
            continue;
        };
        let name = match index.get(&fact.product_key) {
            Some(product) => product.product_name.clone(),
            None => {
                unmatched += 1;
                None
            }
        };
        *yearly.entry((name, date.year())).or_insert(0.0) += fact.sales_amount;
    }

    if unmatched > 0 {
        tracing::warn!(rows = unmatched, "Sales rows reference unknown products");
    }

    let partitions = partition_by(
        yearly.into_iter().collect::<Vec<_>>(),
        |((name, _), _)| name.clone(),
        |((_, year), _)| *year,
    );

    let mut out = Vec::new();
    for (product_name, rows) in partitions {
        let current: Vec<f64> = rows.iter().map(|(_, sales)| *sales).collect();
        let avg_sales = mean(&current).unwrap_or(0.0);
        let previous = lag(&current);

        for (((_, year), current_sales), py_sales) in rows.into_iter().zip(previous) {
            let diff_avg = current_sales - avg_sales;
            let diff_py = py_sales.map(|py| current_sales - py);
            out.push(ProductYearPerformance {
                year,
                product_name: product_name.clone(),
                current_sales,
                avg_sales,
                diff_avg,
                avg_change: AvgChange::from_diff(diff_avg),
                py_sales,
                diff_py,
                py_change: diff_py.map(PyChange::from_diff),
            });
        }
    }

    tracing::debug!(rows = out.len(), "Computed product performance");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fact(year: i32, product_key: u64, amount: f64) -> SalesFact {
        SalesFact::new(NaiveDate::from_ymd_opt(year, 6, 1), 1, product_key, amount, 1, amount)
    }

    #[test]
    fn test_avg_and_prior_year() {
        let products = vec![Product::new(1, "Helmet", "Accessories", Some(10.0))];
        let sales = vec![fact(2012, 1, 100.0), fact(2013, 1, 300.0), fact(2014, 1, 200.0)];

        let rows = product_performance(&sales, &products);

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.avg_sales == 200.0));

        assert_eq!(rows[0].year, 2012);
        assert_eq!(rows[0].avg_change, AvgChange::Below);
        assert_eq!(rows[0].py_sales, None);
        assert_eq!(rows[0].diff_py, None);
        assert_eq!(rows[0].py_change, None);
        assert_eq!(rows[0].py_change_label(), "No Change");

        assert_eq!(rows[1].avg_change, AvgChange::Above);
        assert_eq!(rows[1].py_sales, Some(100.0));
        assert_eq!(rows[1].diff_py, Some(200.0));
        assert_eq!(rows[1].py_change, Some(PyChange::Increase));

        assert_eq!(rows[2].avg_change, AvgChange::Avg);
        assert_eq!(rows[2].py_change, Some(PyChange::Decrease));
    }

    #[test]
    fn test_lag_skips_missing_years() {
        let products = vec![Product::new(1, "Helmet", "Accessories", None)];
        let sales = vec![fact(2011, 1, 50.0), fact(2014, 1, 50.0)];

        let rows = product_performance(&sales, &products);

        assert_eq!(rows[1].year, 2014);
        assert_eq!(rows[1].py_sales, Some(50.0));
        assert_eq!(rows[1].py_change, Some(PyChange::NoChange));
    }

    #[test]
    fn test_unmatched_product_kept_with_null_name() {
        let products = vec![Product::new(1, "Helmet", "Accessories", None)];
        let sales = vec![fact(2012, 1, 10.0), fact(2012, 99, 20.0)];

        let rows = product_performance(&sales, &products);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].product_name, None);
        assert_eq!(rows[0].current_sales, 20.0);
        assert_eq!(rows[1].product_name.as_deref(), Some("Helmet"));
    }

    #[test]
    fn test_ordering_by_name_then_year() {
        let products = vec![
            Product::new(1, "Zeta", "Bikes", None),
            Product::new(2, "Alpha", "Bikes", None),
        ];
        let sales = vec![fact(2013, 1, 1.0), fact(2012, 1, 1.0), fact(2013, 2, 1.0)];

        let rows = product_performance(&sales, &products);
        let keys: Vec<_> = rows
            .iter()
            .map(|r| (r.product_name.clone().unwrap_or_default(), r.year))
            .collect();

        assert_eq!(
            keys,
            vec![
                ("Alpha".to_string(), 2013),
                ("Zeta".to_string(), 2012),
                ("Zeta".to_string(), 2013)
            ]
        );
    }
}

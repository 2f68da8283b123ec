//! Sales change over time
//!
//! Groups dated sales by a truncated period (month or year) and reports
//! revenue, distinct customers and quantity per period.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::models::{Granularity, SalesFact};

/// Aggregated sales for one truncated period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodAggregate {
    /// First day of the period
    pub period_start: NaiveDate,

    /// Truncation the period was built with
    pub granularity: Granularity,

    /// Sum of `sales_amount`
    pub total_sales: f64,

    /// Distinct customers with at least one order in the period
    pub total_customers: usize,

    /// Sum of `quantity`
    pub total_quantity: i64,
}

#[derive(Default)]
struct PeriodAccumulator {
    sales: f64,
    customers: HashSet<u64>,
    quantity: i64,
}

/// Aggregate sales per period, ordered by period ascending
///
/// Rows without an `order_date` are excluded.
pub fn sales_over_time(sales: &[SalesFact], granularity: Granularity) -> Vec<PeriodAggregate> {
    let mut periods: BTreeMap<NaiveDate, PeriodAccumulator> = BTreeMap::new();
    let mut skipped = 0usize;

    for fact in sales {
        let Some(date) = fact.order_date else {
            skipped += 1;
            continue;
        };
        let acc = periods.entry(granularity.truncate(date)).or_default();
        acc.sales += fact.sales_amount;
        acc.customers.insert(fact.customer_key);
        acc.quantity += fact.quantity;
    }

    tracing::debug!(
        rows = sales.len(),
        skipped_null_dates = skipped,
        periods = periods.len(),
        granularity = %granularity,
        "Computed sales over time"
    );

    periods
        .into_iter()
        .map(|(period_start, acc)| PeriodAggregate {
            period_start,
            granularity,
            total_sales: acc.sales,
            total_customers: acc.customers.len(),
            total_quantity: acc.quantity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_monthly_two_rows() {
        let sales = vec![
            SalesFact::new(date(2013, 1, 15), 1, 10, 100.0, 2, 50.0),
            SalesFact::new(date(2013, 2, 20), 1, 10, 200.0, 4, 50.0),
        ];

        let result = sales_over_time(&sales, Granularity::Month);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].period_start, date(2013, 1, 1).unwrap());
        assert_eq!(result[0].total_sales, 100.0);
        assert_eq!(result[0].total_customers, 1);
        assert_eq!(result[0].total_quantity, 2);
        assert_eq!(result[1].period_start, date(2013, 2, 1).unwrap());
        assert_eq!(result[1].total_sales, 200.0);
        assert_eq!(result[1].total_quantity, 4);
    }

    #[test]
    fn test_distinct_customers_and_null_dates() {
        let sales = vec![
            SalesFact::new(date(2012, 3, 1), 1, 10, 10.0, 1, 10.0),
            SalesFact::new(date(2012, 7, 1), 1, 11, 20.0, 1, 20.0),
            SalesFact::new(date(2012, 9, 1), 2, 11, 20.0, 1, 20.0),
            SalesFact::new(None, 3, 11, 999.0, 9, 111.0),
        ];

        let result = sales_over_time(&sales, Granularity::Year);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].total_sales, 50.0);
        assert_eq!(result[0].total_customers, 2);
        assert_eq!(result[0].total_quantity, 3);
    }

    #[test]
    fn test_empty_input() {
        assert!(sales_over_time(&[], Granularity::Month).is_empty());
    }

    #[test]
    fn test_ordered_ascending() {
        let sales = vec![
            SalesFact::new(date(2014, 1, 1), 1, 10, 1.0, 1, 1.0),
            SalesFact::new(date(2011, 1, 1), 1, 10, 1.0, 1, 1.0),
            SalesFact::new(date(2012, 1, 1), 1, 10, 1.0, 1, 1.0),
        ];
        let years: Vec<_> = sales_over_time(&sales, Granularity::Year)
            .iter()
            .map(|p| p.period_start)
            .collect();
        let mut sorted = years.clone();
        sorted.sort();
        assert_eq!(years, sorted);
    }
}

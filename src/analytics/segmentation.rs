//! Data segmentation
//!
//! Products are bucketed by cost and customers by spending and lifespan.
//! Both use ordered first-match rules, so overlapping boundaries resolve to
//! the earlier bucket.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;

use super::classify::Classifier;
use super::error::{AnalyticsError, AnalyticsResult};
use crate::models::{months_between, Customer, Product, SalesFact};

/// Default product cost bucket bounds
pub const DEFAULT_COST_BOUNDS: [f64; 3] = [100.0, 500.0, 1000.0];

/// Default spending above which a long-lived customer is VIP
pub const DEFAULT_VIP_SPENDING: f64 = 5000.0;

/// Default lifespan (months) a customer needs before VIP/Regular
pub const DEFAULT_MIN_LIFESPAN_MONTHS: i64 = 12;

/// Number of items that fell into one segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentCount {
    pub segment: String,
    pub total: usize,
}

/// Build the cost classifier for ascending bounds `b0 < b1 < .. < bn`
///
/// Produces `Below b0`, then `b(i)-b(i+1)` ranges inclusive on both ends,
/// then a fallback `Above bn`. A cost equal to an inner bound matches the
/// lower range first. A missing cost matches no range and lands in the fallback.
pub fn cost_classifier(bounds: &[f64]) -> AnalyticsResult<Classifier<Option<f64>>> {
    validate_bounds(bounds)?;

    let first = bounds[0];
    let last = bounds[bounds.len() - 1];
    let mut classifier = Classifier::new(format!("Above {}", format_bound(last)))
        .rule(format!("Below {}", format_bound(first)), move |cost: &Option<f64>| {
            cost.is_some_and(|c| c < first)
        });

    for pair in bounds.windows(2) {
        let (low, high) = (pair[0], pair[1]);
        classifier = classifier.rule(
            format!("{}-{}", format_bound(low), format_bound(high)),
            move |cost: &Option<f64>| cost.is_some_and(|c| c >= low && c <= high),
        );
    }

    Ok(classifier)
}

fn validate_bounds(bounds: &[f64]) -> AnalyticsResult<()> {
    let invalid = |reason: &str| AnalyticsError::InvalidSegmentBounds {
        bounds: bounds.to_vec(),
        reason: reason.to_string(),
    };

    if bounds.is_empty() {
        return Err(invalid("at least one bound is required"));
    }
    if bounds.iter().any(|b| !b.is_finite()) {
        return Err(invalid("bounds must be finite"));
    }
    if bounds.windows(2).any(|w| w[0] >= w[1]) {
        return Err(invalid("bounds must be strictly ascending"));
    }
    Ok(())
}

fn format_bound(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// Count segment members, ordered by count descending then rule order
fn count_segments<T, L>(classifier: &Classifier<T, L>, labels: impl IntoIterator<Item = L>) -> Vec<SegmentCount>
where
    L: Eq + Hash + fmt::Display,
{
    let mut counts: HashMap<L, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut ranked: Vec<(L, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| classifier.rank(&a.0).cmp(&classifier.rank(&b.0)))
    });
    ranked
        .into_iter()
        .map(|(label, total)| SegmentCount {
            segment: label.to_string(),
            total,
        })
        .collect()
}

/// A product with the cost segment it falls into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCostSegment {
    pub product_key: u64,
    pub product_name: Option<String>,
    pub cost: Option<f64>,
    pub segment: String,
}

/// Label each product with its cost segment, in dimension order
pub fn product_cost_segments(products: &[Product], bounds: &[f64]) -> AnalyticsResult<Vec<ProductCostSegment>> {
    let classifier = cost_classifier(bounds)?;
    Ok(products
        .iter()
        .map(|p| ProductCostSegment {
            product_key: p.product_key,
            product_name: p.product_name.clone(),
            cost: p.cost,
            segment: classifier.classify(&p.cost).clone(),
        })
        .collect())
}

/// Count products per cost segment, ordered by count descending
pub fn segment_products_by_cost(products: &[Product], bounds: &[f64]) -> AnalyticsResult<Vec<SegmentCount>> {
    let classifier = cost_classifier(bounds)?;
    let labels = products.iter().map(|p| classifier.classify(&p.cost).clone());
    let out = count_segments(&classifier, labels);

    tracing::debug!(products = products.len(), segments = out.len(), "Segmented products by cost");
    Ok(out)
}

/// Customer segment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerSegment {
    Vip,
    Regular,
    New,
}

impl CustomerSegment {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Vip => "VIP",
            Self::Regular => "Regular",
            Self::New => "New",
        }
    }
}

impl fmt::Display for CustomerSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Thresholds for customer segmentation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CustomerRules {
    /// Spending must exceed this for VIP
    pub vip_min_spending: f64,

    /// Lifespan in months required for VIP or Regular
    pub min_lifespan_months: i64,
}

impl Default for CustomerRules {
    fn default() -> Self {
        Self {
            vip_min_spending: DEFAULT_VIP_SPENDING,
            min_lifespan_months: DEFAULT_MIN_LIFESPAN_MONTHS,
        }
    }
}

impl CustomerRules {
    fn classifier(&self) -> Classifier<CustomerProfile, CustomerSegment> {
        let Self {
            vip_min_spending,
            min_lifespan_months,
        } = *self;

        Classifier::new(CustomerSegment::New)
            .rule(CustomerSegment::Vip, move |c: &CustomerProfile| {
                c.lifespan_months >= min_lifespan_months && c.total_spending > vip_min_spending
            })
            .rule(CustomerSegment::Regular, move |c: &CustomerProfile| {
                c.lifespan_months >= min_lifespan_months && c.total_spending <= vip_min_spending
            })
    }
}

/// Spending and activity window of one customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub customer_key: u64,
    pub total_spending: f64,
    pub first_order: Option<NaiveDate>,
    pub last_order: Option<NaiveDate>,

    /// Month boundaries between first and last order; 0 without dated orders
    pub lifespan_months: i64,
    pub segment: CustomerSegment,
}

/// Build a profile per customer
///
/// Covers every dimension customer plus customer keys seen only in the fact
/// table. Customers without sales have zero spending and lifespan.
/// Ordered by customer key.
pub fn customer_profiles(
    sales: &[SalesFact],
    customers: &[Customer],
    rules: &CustomerRules,
) -> Vec<CustomerProfile> {
    // key -> (spending, first, last)
    let mut acc: BTreeMap<u64, (f64, Option<NaiveDate>, Option<NaiveDate>)> = customers
        .iter()
        .map(|c| (c.customer_key, (0.0, None, None)))
        .collect();

    for fact in sales {
        let entry = acc.entry(fact.customer_key).or_insert((0.0, None, None));
        entry.0 += fact.sales_amount;
        if let Some(date) = fact.order_date {
            entry.1 = Some(entry.1.map_or(date, |d| d.min(date)));
            entry.2 = Some(entry.2.map_or(date, |d| d.max(date)));
        }
    }

    let classifier = rules.classifier();
    acc.into_iter()
        .map(|(customer_key, (total_spending, first_order, last_order))| {
            let lifespan_months = match (first_order, last_order) {
                (Some(first), Some(last)) => months_between(first, last),
                _ => 0,
            };
            let mut profile = CustomerProfile {
                customer_key,
                total_spending,
                first_order,
                last_order,
                lifespan_months,
                segment: CustomerSegment::New,
            };
            profile.segment = *classifier.classify(&profile);
            profile
        })
        .collect()
}

/// Count customers per segment, ordered by count descending
pub fn segment_customers(
    sales: &[SalesFact],
    customers: &[Customer],
    rules: &CustomerRules,
) -> Vec<SegmentCount> {
    let profiles = customer_profiles(sales, customers, rules);
    let out = count_segments(&rules.classifier(), profiles.iter().map(|p| p.segment));

    tracing::debug!(customers = profiles.len(), segments = out.len(), "Segmented customers");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(key: u64, cost: Option<f64>) -> Product {
        Product::new(key, format!("P{key}"), "Bikes", cost)
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_cost_500_lands_in_lower_bucket() {
        let result = segment_products_by_cost(&[product(1, Some(500.0))], &DEFAULT_COST_BOUNDS).unwrap();
        assert_eq!(
            result,
            vec![SegmentCount {
                segment: "100-500".to_string(),
                total: 1
            }]
        );
    }

    #[test]
    fn test_cost_boundaries() {
        let classifier = cost_classifier(&DEFAULT_COST_BOUNDS).unwrap();
        assert_eq!(classifier.classify(&Some(0.0)), "Below 100");
        assert_eq!(classifier.classify(&Some(99.99)), "Below 100");
        assert_eq!(classifier.classify(&Some(100.0)), "100-500");
        assert_eq!(classifier.classify(&Some(500.01)), "500-1000");
        assert_eq!(classifier.classify(&Some(1000.0)), "500-1000");
        assert_eq!(classifier.classify(&Some(1000.5)), "Above 1000");
        assert_eq!(classifier.classify(&None), "Above 1000");
    }

    #[test]
    fn test_product_cost_labels() {
        let products = vec![product(1, Some(500.0)), product(2, None), product(3, Some(13.0))];
        let labels: Vec<_> = product_cost_segments(&products, &DEFAULT_COST_BOUNDS)
            .unwrap()
            .into_iter()
            .map(|p| (p.product_key, p.segment))
            .collect();

        assert_eq!(
            labels,
            vec![
                (1, "100-500".to_string()),
                (2, "Above 1000".to_string()),
                (3, "Below 100".to_string()),
            ]
        );
    }

    #[test]
    fn test_customer_rank_follows_rule_order() {
        let classifier = CustomerRules::default().classifier();
        assert_eq!(classifier.rank(&CustomerSegment::Vip), 0);
        assert_eq!(classifier.rank(&CustomerSegment::Regular), 1);
        assert_eq!(classifier.rank(&CustomerSegment::New), 2);
    }

    #[test]
    fn test_product_counts_descending() {
        let products = vec![
            product(1, Some(10.0)),
            product(2, Some(20.0)),
            product(3, Some(2000.0)),
            product(4, Some(700.0)),
            product(5, Some(30.0)),
        ];
        let result = segment_products_by_cost(&products, &DEFAULT_COST_BOUNDS).unwrap();
        assert_eq!(result[0].segment, "Below 100");
        assert_eq!(result[0].total, 3);
        assert_eq!(result.iter().map(|s| s.total).sum::<usize>(), 5);
        // ties follow bucket order
        assert_eq!(result[1].segment, "500-1000");
        assert_eq!(result[2].segment, "Above 1000");
    }

    #[test]
    fn test_invalid_bounds() {
        assert!(cost_classifier(&[]).is_err());
        assert!(cost_classifier(&[500.0, 100.0]).is_err());
        assert!(cost_classifier(&[100.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_high_spender_without_lifespan_is_new() {
        let sales = vec![SalesFact::new(date(2013, 3, 1), 1, 1, 6000.0, 1, 6000.0)];
        let profiles = customer_profiles(&sales, &[Customer::new(1)], &CustomerRules::default());

        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].lifespan_months, 0);
        assert_eq!(profiles[0].total_spending, 6000.0);
        assert_eq!(profiles[0].segment, CustomerSegment::New);
    }

    #[test]
    fn test_vip_and_regular() {
        let sales = vec![
            SalesFact::new(date(2011, 1, 10), 1, 1, 3000.0, 1, 3000.0),
            SalesFact::new(date(2012, 1, 5), 1, 1, 2500.0, 1, 2500.0),
            SalesFact::new(date(2011, 1, 10), 2, 1, 2500.0, 1, 2500.0),
            SalesFact::new(date(2012, 2, 1), 2, 1, 2500.0, 1, 2500.0),
        ];
        let profiles = customer_profiles(&sales, &[], &CustomerRules::default());

        assert_eq!(profiles[0].segment, CustomerSegment::Vip);
        assert_eq!(profiles[1].lifespan_months, 13);
        assert_eq!(profiles[1].total_spending, 5000.0);
        assert_eq!(profiles[1].segment, CustomerSegment::Regular);
    }

    #[test]
    fn test_customer_without_orders_is_new() {
        let profiles = customer_profiles(&[], &[Customer::new(42)], &CustomerRules::default());

        assert_eq!(profiles[0].total_spending, 0.0);
        assert_eq!(profiles[0].lifespan_months, 0);
        assert_eq!(profiles[0].first_order, None);
        assert_eq!(profiles[0].segment, CustomerSegment::New);
    }

    #[test]
    fn test_segment_customers_counts() {
        let sales = vec![
            SalesFact::new(date(2011, 1, 1), 1, 1, 9000.0, 1, 1.0),
            SalesFact::new(date(2013, 1, 1), 1, 1, 1.0, 1, 1.0),
        ];
        let customers = vec![Customer::new(1), Customer::new(2), Customer::new(3)];
        let result = segment_customers(&sales, &customers, &CustomerRules::default());

        assert_eq!(
            result,
            vec![
                SegmentCount {
                    segment: "New".to_string(),
                    total: 2
                },
                SegmentCount {
                    segment: "VIP".to_string(),
                    total: 1
                },
            ]
        );
    }
}

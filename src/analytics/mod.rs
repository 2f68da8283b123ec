//! Analytics over the gold-layer sales star schema
//!
//! Every operation is a pure function from the fact/dimension tables to one
//! result table. Nothing is cached between calls.

pub mod classify;
pub mod contribution;
pub mod cumulative;
pub mod error;
pub mod exploration;
pub mod performance;
pub mod segmentation;
pub mod trends;
pub mod window;

pub use classify::Classifier;
pub use contribution::{category_contribution, CategoryContribution};
pub use cumulative::{cumulative_sales, CumulativeRow};
pub use error::{AnalyticsError, AnalyticsResult};
pub use exploration::{
    key_metrics, order_date_range, rank_products, DateRange, KeyMetrics, ProductRank, RankOrder,
};
pub use performance::{product_performance, AvgChange, ProductYearPerformance, PyChange};
pub use segmentation::{
    customer_profiles, product_cost_segments, segment_customers, segment_products_by_cost,
    CustomerProfile, CustomerRules, CustomerSegment, ProductCostSegment, SegmentCount,
    DEFAULT_COST_BOUNDS,
};
pub use trends::{sales_over_time, PeriodAggregate};

use crate::config::SegmentationConfig;
use crate::models::{Granularity, Warehouse};

/// Runs the analyses against one warehouse snapshot with fixed segmentation rules
#[derive(Debug, Clone)]
pub struct WarehouseAnalyzer<'a> {
    warehouse: &'a Warehouse,
    cost_bounds: Vec<f64>,
    customer_rules: CustomerRules,
}

impl<'a> WarehouseAnalyzer<'a> {
    /// Create an analyzer with the default segmentation rules
    #[must_use]
    pub fn new(warehouse: &'a Warehouse) -> Self {
        Self {
            warehouse,
            cost_bounds: DEFAULT_COST_BOUNDS.to_vec(),
            customer_rules: CustomerRules::default(),
        }
    }

    /// Create an analyzer using configured segmentation rules
    #[must_use]
    pub fn with_config(warehouse: &'a Warehouse, config: &SegmentationConfig) -> Self {
        Self {
            warehouse,
            cost_bounds: config.cost_bounds.clone(),
            customer_rules: CustomerRules {
                vip_min_spending: config.vip_min_spending,
                min_lifespan_months: config.min_lifespan_months,
            },
        }
    }

    pub fn sales_over_time(&self, granularity: Granularity) -> Vec<PeriodAggregate> {
        sales_over_time(&self.warehouse.sales, granularity)
    }

    pub fn cumulative_sales(&self) -> Vec<CumulativeRow> {
        cumulative_sales(&self.warehouse.sales)
    }

    pub fn product_performance(&self) -> Vec<ProductYearPerformance> {
        product_performance(&self.warehouse.sales, &self.warehouse.products)
    }

    pub fn product_segments(&self) -> AnalyticsResult<Vec<SegmentCount>> {
        segment_products_by_cost(&self.warehouse.products, &self.cost_bounds)
    }

    pub fn product_cost_segments(&self) -> AnalyticsResult<Vec<ProductCostSegment>> {
        product_cost_segments(&self.warehouse.products, &self.cost_bounds)
    }

    pub fn customer_segments(&self) -> Vec<SegmentCount> {
        segment_customers(
            &self.warehouse.sales,
            &self.warehouse.customers,
            &self.customer_rules,
        )
    }

    pub fn customer_profiles(&self) -> Vec<CustomerProfile> {
        customer_profiles(
            &self.warehouse.sales,
            &self.warehouse.customers,
            &self.customer_rules,
        )
    }

    pub fn category_contribution(&self) -> AnalyticsResult<Vec<CategoryContribution>> {
        category_contribution(&self.warehouse.sales, &self.warehouse.products)
    }

    pub fn date_range(&self) -> Option<DateRange> {
        order_date_range(self.warehouse)
    }

    pub fn key_metrics(&self) -> KeyMetrics {
        key_metrics(self.warehouse)
    }

    pub fn rank_products(&self, limit: usize, order: RankOrder) -> AnalyticsResult<Vec<ProductRank>> {
        rank_products(self.warehouse, limit, order)
    }
}

// Core data structures for the gold-layer star schema

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::analytics::error::AnalyticsError;

/// A row of `gold.fact_sales`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SalesFact {
    pub order_number: Option<String>,
    pub order_date: Option<NaiveDate>, // Rows without a date are skipped by time-based analyses
    pub customer_key: u64,
    pub product_key: u64,
    pub sales_amount: f64,
    pub quantity: i64,
    pub price: f64,
}

impl SalesFact {
    /// Create a fact row with the fields every analysis reads
    pub fn new(
        order_date: Option<NaiveDate>,
        customer_key: u64,
        product_key: u64,
        sales_amount: f64,
        quantity: i64,
        price: f64,
    ) -> Self {
        Self {
            order_number: None,
            order_date,
            customer_key,
            product_key,
            sales_amount,
            quantity,
            price,
        }
    }

    /// Attach an order number
    #[must_use]
    pub fn with_order_number(mut self, order_number: impl Into<String>) -> Self {
        self.order_number = Some(order_number.into());
        self
    }
}

/// A row of `gold.dim_products`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Product {
    pub product_key: u64,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub cost: Option<f64>,
}

impl Product {
    pub fn new(
        product_key: u64,
        product_name: impl Into<String>,
        category: impl Into<String>,
        cost: Option<f64>,
    ) -> Self {
        Self {
            product_key,
            product_name: Some(product_name.into()),
            category: Some(category.into()),
            cost,
        }
    }
}

/// A row of `gold.dim_customers`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Customer {
    pub customer_key: u64,
}

impl Customer {
    pub fn new(customer_key: u64) -> Self {
        Self { customer_key }
    }
}

/// Truncation granularity for period grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Month,
    Year,
}

impl Granularity {
    /// Truncate a date to the first day of its period
    pub fn truncate(&self, date: NaiveDate) -> NaiveDate {
        let month = match self {
            Self::Month => date.month(),
            Self::Year => 1,
        };
        // Day 1 exists in every month, so this never falls back
        NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Create from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "month" | "monthly" | "m" => Some(Self::Month),
            "year" | "yearly" | "y" => Some(Self::Year),
            _ => None,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| AnalyticsError::InvalidGranularity(s.to_string()))
    }
}

/// Calendar months between two dates, counting month boundaries crossed
///
/// The day of month is ignored: 2013-01-31 to 2013-02-01 is one month.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i64 {
    let start_idx = i64::from(start.year()) * 12 + i64::from(start.month());
    let end_idx = i64::from(end.year()) * 12 + i64::from(end.month());
    end_idx - start_idx
}

/// Fully materialized fact and dimension tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Warehouse {
    pub sales: Vec<SalesFact>,
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
}

impl Warehouse {
    pub fn new(sales: Vec<SalesFact>, products: Vec<Product>, customers: Vec<Customer>) -> Self {
        Self {
            sales,
            products,
            customers,
        }
    }

    /// Build a product lookup keyed by `product_key`
    pub fn product_index(&self) -> HashMap<u64, &Product> {
        product_index(&self.products)
    }
}

/// Index products by key for left-join lookups
pub fn product_index(products: &[Product]) -> HashMap<u64, &Product> {
    products.iter().map(|p| (p.product_key, p)).collect()
}

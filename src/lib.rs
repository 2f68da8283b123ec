//! gold-analytics - Sales reporting over a gold-layer star schema
//!
//! Trend, cumulative, performance, segmentation and part-to-whole analyses
//! computed in memory from a sales fact table and its product and customer
//! dimensions.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`models`] - Fact and dimension rows, period granularity
//! - [`analytics`] - The analyses themselves, each a pure function
//! - [`storage`] - CSV loading of the table extracts
//! - [`report`] - Text and JSON rendering of results
//! - [`error`] - Unified error type
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use gold_analytics::analytics::sales_over_time;
//! use gold_analytics::models::{Granularity, SalesFact};
//!
//! let sales = vec![
//!     SalesFact::new(NaiveDate::from_ymd_opt(2013, 1, 15), 1, 10, 100.0, 1, 100.0),
//!     SalesFact::new(NaiveDate::from_ymd_opt(2013, 2, 20), 1, 10, 200.0, 1, 200.0),
//! ];
//! let monthly = sales_over_time(&sales, Granularity::Month);
//! assert_eq!(monthly.len(), 2);
//! ```

pub mod analytics;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod storage;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::analytics::{AnalyticsError, WarehouseAnalyzer};
    pub use crate::config::Config;
    pub use crate::error::{AnalyticsErrorTrait, Error, ErrorCategory, Result};
    pub use crate::models::{Customer, Granularity, Product, SalesFact, Warehouse};
    pub use crate::report::ReportFormat;
    pub use crate::storage::load_warehouse;
}

// Direct re-exports for convenience
pub use models::{Customer, Granularity, Product, SalesFact, Warehouse};

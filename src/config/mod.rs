//! Configuration management for gold-analytics
//!
//! This module handles loading and validating configuration from environment variables
//! and TOML files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::analytics::segmentation::{
    DEFAULT_COST_BOUNDS, DEFAULT_MIN_LIFESPAN_MONTHS, DEFAULT_VIP_SPENDING,
};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Input table locations
    pub data: DataConfig,

    /// Segmentation thresholds
    pub segmentation: SegmentationConfig,

    /// Report rendering options
    pub report: ReportConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Locations of the gold-layer table extracts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// `fact_sales` CSV path
    pub sales_path: PathBuf,

    /// `dim_products` CSV path
    pub products_path: PathBuf,

    /// `dim_customers` CSV path
    pub customers_path: PathBuf,
}

/// Segmentation thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// Ascending product cost bucket bounds
    pub cost_bounds: Vec<f64>,

    /// Spending a long-lived customer must exceed to be VIP
    pub vip_min_spending: f64,

    /// Months between first and last order required for VIP or Regular
    pub min_lifespan_months: i64,
}

/// Report rendering options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Number of products shown by the ranking report
    pub ranking_limit: usize,

    /// Output format (text, json)
    pub format: String,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let data_dir = std::env::var("GOLD_DATA_DIR").ok().map(PathBuf::from);
        let table_path = |var: &str, file: &str, default: &Path| -> PathBuf {
            std::env::var(var)
                .map(PathBuf::from)
                .ok()
                .or_else(|| data_dir.as_ref().map(|dir| dir.join(file)))
                .unwrap_or_else(|| default.to_path_buf())
        };

        let sales_path = table_path("GOLD_SALES_PATH", "fact_sales.csv", &defaults.data.sales_path);
        let products_path = table_path(
            "GOLD_PRODUCTS_PATH",
            "dim_products.csv",
            &defaults.data.products_path,
        );
        let customers_path = table_path(
            "GOLD_CUSTOMERS_PATH",
            "dim_customers.csv",
            &defaults.data.customers_path,
        );

        let cost_bounds = match std::env::var("GOLD_COST_BOUNDS") {
            Ok(raw) => parse_bounds(&raw)
                .with_context(|| format!("Invalid GOLD_COST_BOUNDS: {raw}"))?,
            Err(_) => defaults.segmentation.cost_bounds,
        };

        let vip_min_spending =
            env_parse::<f64>("GOLD_VIP_MIN_SPENDING")?.unwrap_or(DEFAULT_VIP_SPENDING);

        let min_lifespan_months =
            env_parse::<i64>("GOLD_MIN_LIFESPAN_MONTHS")?.unwrap_or(DEFAULT_MIN_LIFESPAN_MONTHS);

        let ranking_limit =
            env_parse::<usize>("GOLD_RANKING_LIMIT")?.unwrap_or(defaults.report.ranking_limit);

        let report_format =
            std::env::var("GOLD_REPORT_FORMAT").unwrap_or_else(|_| String::from("text"));

        let log_level = std::env::var("GOLD_LOG_LEVEL").unwrap_or_else(|_| String::from("info"));

        let log_format = std::env::var("GOLD_LOG_FORMAT").unwrap_or_else(|_| String::from("text"));

        Ok(Self {
            data: DataConfig {
                sales_path,
                products_path,
                customers_path,
            },
            segmentation: SegmentationConfig {
                cost_bounds,
                vip_min_spending,
                min_lifespan_months,
            },
            report: ReportConfig {
                ranking_limit,
                format: report_format,
            },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let bounds = &self.segmentation.cost_bounds;
        if bounds.is_empty() {
            anyhow::bail!("cost_bounds must contain at least one value");
        }

        if bounds.iter().any(|b| !b.is_finite() || *b < 0.0) {
            anyhow::bail!("cost_bounds must be finite and non-negative");
        }

        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            anyhow::bail!("cost_bounds must be strictly ascending");
        }

        if !self.segmentation.vip_min_spending.is_finite() || self.segmentation.vip_min_spending < 0.0 {
            anyhow::bail!("vip_min_spending must be a non-negative number");
        }

        if self.segmentation.min_lifespan_months < 0 {
            anyhow::bail!("min_lifespan_months must not be negative");
        }

        if self.report.ranking_limit == 0 {
            anyhow::bail!("ranking_limit must be greater than 0");
        }

        if !matches!(self.report.format.as_str(), "text" | "json") {
            anyhow::bail!("report format must be text or json, got {}", self.report.format);
        }

        Ok(())
    }
}

/// Parse an optional environment variable; a set but malformed value is an error
fn env_parse<T>(var: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Invalid {var}: {raw}")),
        Err(_) => Ok(None),
    }
}

fn parse_bounds(raw: &str) -> Result<Vec<f64>> {
    raw.split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .with_context(|| format!("Not a number: {part}"))
        })
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                sales_path: PathBuf::from("data/gold/fact_sales.csv"),
                products_path: PathBuf::from("data/gold/dim_products.csv"),
                customers_path: PathBuf::from("data/gold/dim_customers.csv"),
            },
            segmentation: SegmentationConfig::default(),
            report: ReportConfig {
                ranking_limit: 5,
                format: String::from("text"),
            },
            logging: LoggingConfig {
                level: String::from("info"),
                format: String::from("text"),
            },
        }
    }
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            cost_bounds: DEFAULT_COST_BOUNDS.to_vec(),
            vip_min_spending: DEFAULT_VIP_SPENDING,
            min_lifespan_months: DEFAULT_MIN_LIFESPAN_MONTHS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_ranking_limit() {
        let mut config = Config::default();
        config.report.ranking_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsorted_cost_bounds() {
        let mut config = Config::default();
        config.segmentation.cost_bounds = vec![500.0, 100.0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_bounds() {
        assert_eq!(parse_bounds("100, 500,1000").unwrap(), vec![100.0, 500.0, 1000.0]);
        assert!(parse_bounds("100,abc").is_err());
    }

    #[test]
    fn test_env_parse() {
        // Names unique to this test
        std::env::set_var("GOLD_TEST_ENV_PARSE_LIMIT", "7");
        std::env::set_var("GOLD_TEST_ENV_PARSE_SPENDING", "lots");

        assert_eq!(env_parse::<usize>("GOLD_TEST_ENV_PARSE_LIMIT").unwrap(), Some(7));
        assert!(env_parse::<f64>("GOLD_TEST_ENV_PARSE_SPENDING").is_err());
        assert_eq!(env_parse::<i64>("GOLD_TEST_ENV_PARSE_UNSET").unwrap(), None);

        std::env::remove_var("GOLD_TEST_ENV_PARSE_LIMIT");
        std::env::remove_var("GOLD_TEST_ENV_PARSE_SPENDING");
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let text = toml::to_string(&config).unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }
}

//! CSV readers for `fact_sales`, `dim_products` and `dim_customers`

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::DataConfig;
use crate::models::{Customer, Product, SalesFact, Warehouse};

/// Errors that can occur while loading tables
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed row in {source_name} at line {line}: {source}")]
    Csv {
        source_name: String,
        line: usize,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid date '{value}' in {source_name} at line {line}")]
    InvalidDate {
        source_name: String,
        line: usize,
        value: String,
    },

    #[error("Duplicate {table} key: {key}")]
    DuplicateKey { table: &'static str, key: u64 },
}

/// Result type for table loading
pub type LoadResult<T> = Result<T, LoadError>;

#[derive(Debug, Deserialize)]
struct SalesRecord {
    #[serde(default)]
    order_number: Option<String>,
    #[serde(default)]
    order_date: Option<String>,
    customer_key: u64,
    product_key: u64,
    sales_amount: f64,
    quantity: i64,
    price: f64,
}

#[derive(Debug, Deserialize)]
struct ProductRecord {
    product_key: u64,
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    cost: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CustomerRecord {
    customer_key: u64,
}

fn csv_reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input)
}

fn open(path: &Path) -> LoadResult<File> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Deserialize every row, tagging failures with the 1-indexed file line
fn read_records<R, T>(input: R, source_name: &str) -> LoadResult<Vec<(usize, T)>>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut reader = csv_reader(input);
    let records = reader
        .deserialize()
        .enumerate()
        .map(|(i, result)| {
            // +2 for 1-indexed lines and the header row
            let line = i + 2;
            result.map(|record| (line, record)).map_err(|source| LoadError::Csv {
                source_name: source_name.to_string(),
                line,
                source,
            })
        })
        .collect();
    records
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Parse `YYYY-MM-DD`, also accepting a trailing time component
pub fn parse_order_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Read sales facts from CSV
pub fn read_sales<R: Read>(input: R, source_name: &str) -> LoadResult<Vec<SalesFact>> {
    read_records::<_, SalesRecord>(input, source_name)?
        .into_iter()
        .map(|(line, record)| {
            let order_date = match non_empty(record.order_date) {
                Some(raw) => Some(parse_order_date(&raw).ok_or_else(|| LoadError::InvalidDate {
                    source_name: source_name.to_string(),
                    line,
                    value: raw.clone(),
                })?),
                None => None,
            };
            Ok(SalesFact {
                order_number: non_empty(record.order_number),
                order_date,
                customer_key: record.customer_key,
                product_key: record.product_key,
                sales_amount: record.sales_amount,
                quantity: record.quantity,
                price: record.price,
            })
        })
        .collect()
}

/// Read the product dimension from CSV
pub fn read_products<R: Read>(input: R, source_name: &str) -> LoadResult<Vec<Product>> {
    let mut seen = HashSet::new();
    read_records::<_, ProductRecord>(input, source_name)?
        .into_iter()
        .map(|(_, record)| {
            if !seen.insert(record.product_key) {
                return Err(LoadError::DuplicateKey {
                    table: "product",
                    key: record.product_key,
                });
            }
            Ok(Product {
                product_key: record.product_key,
                product_name: non_empty(record.product_name),
                category: non_empty(record.category),
                cost: record.cost,
            })
        })
        .collect()
}

/// Read the customer dimension from CSV
pub fn read_customers<R: Read>(input: R, source_name: &str) -> LoadResult<Vec<Customer>> {
    let mut seen = HashSet::new();
    read_records::<_, CustomerRecord>(input, source_name)?
        .into_iter()
        .map(|(_, record)| {
            if !seen.insert(record.customer_key) {
                return Err(LoadError::DuplicateKey {
                    table: "customer",
                    key: record.customer_key,
                });
            }
            Ok(Customer::new(record.customer_key))
        })
        .collect()
}

pub fn load_sales(path: &Path) -> LoadResult<Vec<SalesFact>> {
    read_sales(open(path)?, &path.display().to_string())
}

pub fn load_products(path: &Path) -> LoadResult<Vec<Product>> {
    read_products(open(path)?, &path.display().to_string())
}

pub fn load_customers(path: &Path) -> LoadResult<Vec<Customer>> {
    read_customers(open(path)?, &path.display().to_string())
}

/// Load all three tables
pub fn load_warehouse(config: &DataConfig) -> LoadResult<Warehouse> {
    let sales = load_sales(&config.sales_path)?;
    let products = load_products(&config.products_path)?;
    let customers = load_customers(&config.customers_path)?;

    let undated = sales.iter().filter(|f| f.order_date.is_none()).count();
    tracing::info!(
        sales = sales.len(),
        undated_sales = undated,
        products = products.len(),
        customers = customers.len(),
        "Loaded warehouse tables"
    );

    Ok(Warehouse::new(sales, products, customers))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALES: &str = "order_number,product_key,customer_key,order_date,sales_amount,quantity,price
SO1,10,1,2013-01-15,100,1,100
SO2,11,2,,200,2,100
SO3,10,1,2013-02-20 00:00:00,50,1,50
";

    #[test]
    fn test_read_sales() {
        let sales = read_sales(SALES.as_bytes(), "fact_sales.csv").unwrap();

        assert_eq!(sales.len(), 3);
        assert_eq!(sales[0].order_date, NaiveDate::from_ymd_opt(2013, 1, 15));
        assert_eq!(sales[0].order_number.as_deref(), Some("SO1"));
        assert_eq!(sales[1].order_date, None);
        assert_eq!(sales[2].order_date, NaiveDate::from_ymd_opt(2013, 2, 20));
        assert_eq!(sales[1].sales_amount, 200.0);
    }

    #[test]
    fn test_invalid_date_reports_line() {
        let input = "customer_key,product_key,order_date,sales_amount,quantity,price\n1,1,15/01/2013,1,1,1\n";
        let err = read_sales(input.as_bytes(), "fact_sales.csv").unwrap_err();
        assert!(matches!(err, LoadError::InvalidDate { line: 2, .. }));
    }

    #[test]
    fn test_read_products_with_nulls() {
        let input = "product_key,product_name,category,subcategory,cost\n1,Road Bike,Bikes,Road,900\n2,Mystery,,,\n";
        let products = read_products(input.as_bytes(), "dim_products.csv").unwrap();

        assert_eq!(products[0].cost, Some(900.0));
        assert_eq!(products[1].category, None);
        assert_eq!(products[1].cost, None);
    }

    #[test]
    fn test_duplicate_customer_key() {
        let input = "customer_key\n1\n1\n";
        let err = read_customers(input.as_bytes(), "dim_customers.csv").unwrap_err();
        assert!(matches!(err, LoadError::DuplicateKey { key: 1, .. }));
    }

    #[test]
    fn test_malformed_amount() {
        let input = "customer_key,product_key,order_date,sales_amount,quantity,price\n1,1,2013-01-01,abc,1,1\n";
        let err = read_sales(input.as_bytes(), "fact_sales.csv").unwrap_err();
        assert!(matches!(err, LoadError::Csv { line: 2, .. }));
    }
}

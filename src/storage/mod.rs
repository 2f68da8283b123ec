//! Table loading for the gold-layer extracts
//!
//! Reads comma-separated files with a header row into the in-memory tables
//! the analytics operate on. Extra columns are ignored; empty cells in
//! nullable columns become `None`.

pub mod loader;

pub use loader::{
    load_customers, load_products, load_sales, load_warehouse, read_customers, read_products,
    read_sales, LoadError, LoadResult,
};

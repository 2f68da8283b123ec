//! Common test utilities

use chrono::NaiveDate;
use gold_analytics::models::{Customer, Product, SalesFact, Warehouse};

/// Build a date, panicking on invalid input
pub fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    Some(NaiveDate::from_ymd_opt(y, m, d).expect("valid date"))
}

/// Small bike-shop warehouse covering every join and null case
///
/// - product 4 has no category and no cost
/// - sales reference product 99, which is not in the dimension
/// - one sale has no order date
/// - customer 5 never ordered
pub fn create_test_warehouse() -> Warehouse {
    let products = vec![
        Product::new(1, "Mountain-200", "Bikes", Some(1200.0)),
        Product::new(2, "Road-650", "Bikes", Some(500.0)),
        Product::new(3, "Sport-100 Helmet", "Accessories", Some(13.0)),
        Product {
            product_key: 4,
            product_name: Some("Mystery Part".to_string()),
            category: None,
            cost: None,
        },
    ];

    let sales = vec![
        SalesFact::new(date(2011, 1, 10), 1, 1, 3400.0, 1, 3400.0).with_order_number("SO1"),
        SalesFact::new(date(2011, 6, 2), 2, 3, 35.0, 1, 35.0).with_order_number("SO2"),
        SalesFact::new(date(2012, 2, 14), 1, 1, 2300.0, 1, 2300.0).with_order_number("SO3"),
        SalesFact::new(date(2012, 2, 14), 1, 3, 70.0, 2, 35.0).with_order_number("SO3"),
        SalesFact::new(date(2012, 8, 30), 3, 2, 700.0, 1, 700.0).with_order_number("SO4"),
        SalesFact::new(date(2013, 3, 3), 2, 2, 700.0, 1, 700.0).with_order_number("SO5"),
        SalesFact::new(date(2013, 3, 3), 4, 99, 20.0, 1, 20.0).with_order_number("SO6"),
        SalesFact::new(None, 3, 4, 5.0, 1, 5.0),
    ];

    let customers = (1..=5).map(Customer::new).collect();

    Warehouse::new(sales, products, customers)
}

/// Write the test warehouse as the three CSV extracts into `dir`
#[allow(dead_code)]
pub fn write_csv_extracts(dir: &std::path::Path) -> std::io::Result<()> {
    std::fs::write(
        dir.join("fact_sales.csv"),
        "order_number,product_key,customer_key,order_date,shipping_date,sales_amount,quantity,price
SO1,1,1,2011-01-10,2011-01-17,3400,1,3400
SO2,3,2,2011-06-02,2011-06-09,35,1,35
SO3,1,1,2012-02-14,2012-02-21,2300,1,2300
SO3,3,1,2012-02-14,2012-02-21,70,2,35
SO4,2,3,2012-08-30,2012-09-06,700,1,700
SO5,2,2,2013-03-03,2013-03-10,700,1,700
SO6,99,4,2013-03-03,2013-03-10,20,1,20
,4,3,,,5,1,5
",
    )?;
    std::fs::write(
        dir.join("dim_products.csv"),
        "product_key,product_id,product_name,category,subcategory,cost
1,BK-M68B-38,Mountain-200,Bikes,Mountain Bikes,1200
2,BK-R50R-44,Road-650,Bikes,Road Bikes,500
3,HL-U509,Sport-100 Helmet,Accessories,Helmets,13
4,XX-0000,Mystery Part,,,
",
    )?;
    std::fs::write(
        dir.join("dim_customers.csv"),
        "customer_key,customer_id,first_name,last_name,country
1,11000,Jon,Yang,Australia
2,11001,Eugene,Huang,Australia
3,11002,Ruben,Torres,Australia
4,11003,Christy,Zhu,Australia
5,11004,Elizabeth,Johnson,Australia
",
    )?;
    Ok(())
}

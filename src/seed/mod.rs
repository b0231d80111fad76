//! Sample-data seeder.
//!
//! Loads a small demonstration dataset: 10 customers, 10 products, a random
//! batch of orders per customer, and one sale per order mirroring the
//! order's total as revenue. Inserts use `INSERT OR REPLACE` so re-seeding
//! an existing database is safe.

use chrono::{Duration as ChronoDuration, Utc};
use rand::Rng;
use tracing::info;

use crate::db::Database;
use crate::error::{InsightlineError, Result};

const CUSTOMERS: &[(i64, &str, &str, &str, &str)] = &[
    (1, "John Smith", "john@email.com", "New York", "2023-01-15"),
    (2, "Jane Doe", "jane@email.com", "Los Angeles", "2023-02-20"),
    (3, "Mike Johnson", "mike@email.com", "Chicago", "2023-03-10"),
    (4, "Sarah Wilson", "sarah@email.com", "Miami", "2023-01-25"),
    (5, "David Brown", "david@email.com", "Seattle", "2023-04-05"),
    (6, "Emily Davis", "emily@email.com", "Boston", "2023-02-28"),
    (7, "Chris Lee", "chris@email.com", "Austin", "2023-03-15"),
    (8, "Amanda Garcia", "amanda@email.com", "Denver", "2023-01-10"),
    (9, "Kevin Miller", "kevin@email.com", "Atlanta", "2023-04-20"),
    (10, "Lisa Martinez", "lisa@email.com", "Phoenix", "2023-03-05"),
];

const PRODUCTS: &[(i64, &str, &str, f64, i64)] = &[
    (1, "Laptop", "Electronics", 999.99, 50),
    (2, "Smartphone", "Electronics", 699.99, 100),
    (3, "Desk Chair", "Furniture", 199.99, 30),
    (4, "Coffee Maker", "Home Appliances", 89.99, 75),
    (5, "Running Shoes", "Sports", 129.99, 60),
    (6, "Backpack", "Accessories", 59.99, 80),
    (7, "Headphones", "Electronics", 149.99, 45),
    (8, "Water Bottle", "Accessories", 24.99, 120),
    (9, "Fitness Tracker", "Electronics", 79.99, 90),
    (10, "Office Desk", "Furniture", 299.99, 20),
];

/// Load the full sample dataset into the database.
pub fn load_sample_data(db: &Database) -> Result<()> {
    let conn = db.open()?;

    for (id, name, email, city, signup_date) in CUSTOMERS {
        conn.execute(
            "INSERT OR REPLACE INTO customers (id, name, email, city, signup_date)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![id, name, email, city, signup_date],
        )
        .map_err(|e| InsightlineError::Query(format!("Seeding customers failed: {}", e)))?;
    }

    for (id, name, category, price, stock) in PRODUCTS {
        conn.execute(
            "INSERT OR REPLACE INTO products (id, name, category, price, stock)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![id, name, category, price, stock],
        )
        .map_err(|e| InsightlineError::Query(format!("Seeding products failed: {}", e)))?;
    }

    let mut rng = rand::thread_rng();
    let today = Utc::now().date_naive();
    let mut order_id: i64 = 1;
    let mut order_count = 0usize;

    for (customer_id, ..) in CUSTOMERS {
        let orders_for_customer = rng.gen_range(3..=8);
        for _ in 0..orders_for_customer {
            let product_idx = rng.gen_range(0..PRODUCTS.len());
            let (product_id, _, _, price, _) = PRODUCTS[product_idx];
            let quantity: i64 = rng.gen_range(1..=3);
            // Spread orders over the last six months so the monthly growth
            // KPI has at least two buckets to work with.
            let order_date = today - ChronoDuration::days(rng.gen_range(0..180));
            let order_date = order_date.format("%Y-%m-%d").to_string();
            let total = quantity as f64 * price;

            conn.execute(
                "INSERT OR REPLACE INTO orders (id, customer_id, product_id, quantity, order_date, total)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![order_id, customer_id, product_id, quantity, order_date, total],
            )
            .map_err(|e| InsightlineError::Query(format!("Seeding orders failed: {}", e)))?;

            // One sale per order: revenue copies the order total, sales date
            // matches the order date.
            let profit_margin: f64 = rng.gen_range(0.15..0.35);
            conn.execute(
                "INSERT OR REPLACE INTO sales (id, order_id, revenue, profit_margin, sales_date)
                 VALUES (?1, ?1, ?2, ?3, ?4)",
                rusqlite::params![order_id, total, profit_margin, order_date],
            )
            .map_err(|e| InsightlineError::Query(format!("Seeding sales failed: {}", e)))?;

            order_id += 1;
            order_count += 1;
        }
    }

    info!(
        customers = CUSTOMERS.len(),
        products = PRODUCTS.len(),
        orders = order_count,
        "Sample data loaded"
    );
    Ok(())
}

//! Relational store and query executor
//!
//! The `Database` owns the path to the SQLite file holding the four business
//! tables (customers, products, orders, sales) and executes read queries
//! against it. Each call opens a fresh connection and closes it when done --
//! a request-per-call model with no pooling and no cross-request transaction.
//!
//! Query results are materialized into a `QueryResult`: column names in
//! query order plus rows of tagged `SqlValue` cells, so callers get typed
//! data instead of stringly-typed dictionaries.

use std::path::{Path, PathBuf};
use std::time::Instant;

use metrics::{counter, histogram};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{InsightlineError, Result};

/// Idempotent schema for the four business tables.
const SCHEMA_SQL: &str = "
    CREATE TABLE IF NOT EXISTS customers (
        id INTEGER PRIMARY KEY,
        name TEXT,
        email TEXT,
        city TEXT,
        signup_date DATE
    );
    CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY,
        name TEXT,
        category TEXT,
        price DECIMAL(10,2),
        stock INTEGER
    );
    CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY,
        customer_id INTEGER,
        product_id INTEGER,
        quantity INTEGER,
        order_date DATE,
        total DECIMAL(10,2),
        FOREIGN KEY (customer_id) REFERENCES customers (id),
        FOREIGN KEY (product_id) REFERENCES products (id)
    );
    CREATE TABLE IF NOT EXISTS sales (
        id INTEGER PRIMARY KEY,
        order_id INTEGER,
        revenue DECIMAL(10,2),
        profit_margin DECIMAL(5,2),
        sales_date DATE,
        FOREIGN KEY (order_id) REFERENCES orders (id)
    );
";

/// A single typed cell in a query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<SqlValue> for serde_json::Value {
    fn from(value: SqlValue) -> Self {
        match value {
            SqlValue::Null => serde_json::Value::Null,
            SqlValue::Integer(n) => serde_json::Value::from(n),
            SqlValue::Real(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            SqlValue::Text(s) => serde_json::Value::String(s),
        }
    }
}

/// Result of a SQL query execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column names in result order.
    pub columns: Vec<String>,
    /// Row data -- each row is a vector of tagged cells, one per column.
    pub rows: Vec<Vec<SqlValue>>,
}

impl QueryResult {
    /// Number of rows in the result.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Render each row as a JSON object keyed by column name,
    /// preserving the column order from the query.
    pub fn to_objects(&self) -> Vec<serde_json::Map<String, serde_json::Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned().map(serde_json::Value::from))
                    .collect()
            })
            .collect()
    }
}

/// The relational store.
///
/// Holds only the database path; every query opens its own connection.
#[derive(Debug, Clone)]
pub struct Database {
    db_path: PathBuf,
}

impl Database {
    /// Create a handle to the database at the given path.
    pub fn new(db_path: impl AsRef<Path>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    /// Path to the underlying SQLite file.
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Create the four business tables if they do not exist yet.
    pub fn init_schema(&self) -> Result<()> {
        let conn = self.open()?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| InsightlineError::Query(format!("Schema creation failed: {}", e)))?;
        debug!(path = %self.db_path.display(), "Database schema initialized");
        Ok(())
    }

    /// Execute a SQL statement and materialize the results.
    ///
    /// Increments the query counter and records execution duration. All
    /// failures surface synchronously as `InsightlineError::Query`; there
    /// are no retries. Read-only enforcement is the caller's responsibility.
    pub fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        counter!("insightline_sql_queries_total").increment(1);
        let start = Instant::now();

        let conn = self.open()?;
        let result = self.run_query(&conn, sql);

        histogram!("insightline_query_duration_seconds").record(start.elapsed().as_secs_f64());
        result
    }

    /// Open a fresh connection to the store.
    pub(crate) fn open(&self) -> Result<Connection> {
        Connection::open(&self.db_path).map_err(|e| {
            InsightlineError::Query(format!(
                "Failed to open database {}: {}",
                self.db_path.display(),
                e
            ))
        })
    }

    fn run_query(&self, conn: &Connection, sql: &str) -> Result<QueryResult> {
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| InsightlineError::Query(format!("SQL error: {}", e)))?;

        let column_count = stmt.column_count();
        let columns: Vec<String> = (0..column_count)
            .map(|i| stmt.column_name(i).unwrap_or("?").to_string())
            .collect();

        let rows_iter = stmt
            .query_map([], |row| {
                let mut values = Vec::with_capacity(column_count);
                for i in 0..column_count {
                    let val = match row.get_ref(i) {
                        Ok(rusqlite::types::ValueRef::Null) => SqlValue::Null,
                        Ok(rusqlite::types::ValueRef::Integer(n)) => SqlValue::Integer(n),
                        Ok(rusqlite::types::ValueRef::Real(f)) => SqlValue::Real(f),
                        Ok(rusqlite::types::ValueRef::Text(s)) => {
                            SqlValue::Text(String::from_utf8_lossy(s).to_string())
                        }
                        Ok(rusqlite::types::ValueRef::Blob(b)) => {
                            SqlValue::Text(String::from_utf8_lossy(b).to_string())
                        }
                        Err(_) => SqlValue::Null,
                    };
                    values.push(val);
                }
                Ok(values)
            })
            .map_err(|e| InsightlineError::Query(format!("SQL error: {}", e)))?;

        let mut rows = Vec::new();
        for row_result in rows_iter {
            let row = row_result.map_err(|e| InsightlineError::Query(format!("SQL error: {}", e)))?;
            rows.push(row);
        }

        Ok(QueryResult { columns, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_db() -> (Database, TempDir) {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("test.db"));
        db.init_schema().unwrap();
        (db, dir)
    }

    #[test]
    fn test_select_one_without_schema() {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("bare.db"));
        // Works regardless of schema state.
        let result = db.execute_query("SELECT 1 as x").unwrap();
        assert_eq!(result.columns, vec!["x".to_string()]);
        assert_eq!(result.rows, vec![vec![SqlValue::Integer(1)]]);
    }

    #[test]
    fn test_init_schema_idempotent() {
        let (db, _dir) = test_db();
        db.init_schema().unwrap();
        db.init_schema().unwrap();
        let result = db.execute_query("SELECT COUNT(*) as n FROM customers").unwrap();
        assert_eq!(result.rows[0][0], SqlValue::Integer(0));
    }

    #[test]
    fn test_invalid_sql_is_query_error() {
        let (db, _dir) = test_db();
        let err = db.execute_query("SELECT * FROM nonexistent").unwrap_err();
        assert!(matches!(err, InsightlineError::Query(_)));
        assert!(err.to_string().contains("nonexistent"));
    }

    #[test]
    fn test_tagged_values_and_column_order() {
        let (db, _dir) = test_db();
        let result = db
            .execute_query("SELECT 42 as n, 1.5 as f, 'hi' as s, NULL as missing")
            .unwrap();
        assert_eq!(result.columns, vec!["n", "f", "s", "missing"]);
        assert_eq!(
            result.rows[0],
            vec![
                SqlValue::Integer(42),
                SqlValue::Real(1.5),
                SqlValue::Text("hi".to_string()),
                SqlValue::Null,
            ]
        );
    }

    #[test]
    fn test_to_objects_preserves_column_order() {
        let (db, _dir) = test_db();
        let result = db.execute_query("SELECT 1 as b, 2 as a").unwrap();
        let objects = result.to_objects();
        assert_eq!(objects.len(), 1);
        let keys: Vec<&String> = objects[0].keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(objects[0]["a"], serde_json::json!(2));
    }
}

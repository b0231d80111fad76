//! Analytics engine: business KPIs and chart aggregates.
//!
//! Stateless read operations over the query executor. Every call re-scans
//! the relevant tables; there is no caching or incremental recomputation.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::db::{Database, QueryResult, SqlValue};
use crate::error::{InsightlineError, Result};

/// Precomputed business KPIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_revenue: f64,
    pub total_orders: i64,
    pub total_customers: i64,
    /// Month-over-month revenue growth percentage, computed from the two
    /// most recent calendar months present in the sales table. 0 when fewer
    /// than two months exist or the previous month's revenue is 0.
    pub revenue_growth: f64,
}

/// The closed set of chart aggregates the dashboard can request.
///
/// Adding a kind is a compile-time-checked change: the query dispatch
/// matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    SalesTrend,
    ProductPerformance,
    CustomerAnalytics,
}

impl ChartKind {
    /// Fixed aggregate query for this chart kind.
    fn query(self) -> &'static str {
        match self {
            ChartKind::SalesTrend => {
                "SELECT strftime('%Y-%m', sales_date) as month,
                        SUM(revenue) as revenue
                 FROM sales
                 GROUP BY month
                 ORDER BY month"
            }
            ChartKind::ProductPerformance => {
                "SELECT p.category, SUM(s.revenue) as revenue
                 FROM sales s
                 JOIN orders o ON s.order_id = o.id
                 JOIN products p ON o.product_id = p.id
                 GROUP BY p.category
                 ORDER BY revenue DESC"
            }
            ChartKind::CustomerAnalytics => {
                "SELECT c.city, COUNT(o.id) as order_count,
                        SUM(s.revenue) as total_revenue
                 FROM customers c
                 JOIN orders o ON c.id = o.customer_id
                 JOIN sales s ON o.id = s.order_id
                 GROUP BY c.city
                 ORDER BY total_revenue DESC
                 LIMIT 10"
            }
        }
    }
}

impl FromStr for ChartKind {
    type Err = InsightlineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sales_trend" => Ok(ChartKind::SalesTrend),
            "product_performance" => Ok(ChartKind::ProductPerformance),
            "customer_analytics" => Ok(ChartKind::CustomerAnalytics),
            other => Err(InsightlineError::InvalidArgument(format!(
                "Invalid chart type: {}",
                other
            ))),
        }
    }
}

/// Computes KPIs and chart series through the query executor.
pub struct AnalyticsEngine {
    db: Arc<Database>,
}

impl AnalyticsEngine {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Calculate the dashboard's business KPIs.
    pub fn kpis(&self) -> Result<Kpis> {
        let revenue = self
            .db
            .execute_query("SELECT SUM(revenue) as total_revenue FROM sales")?;
        let total_revenue = first_cell_f64(&revenue);

        let orders = self
            .db
            .execute_query("SELECT COUNT(*) as total_orders FROM orders")?;
        let total_orders = first_cell_i64(&orders);

        let customers = self
            .db
            .execute_query("SELECT COUNT(*) as total_customers FROM customers")?;
        let total_customers = first_cell_i64(&customers);

        let monthly = self.db.execute_query(
            "SELECT strftime('%Y-%m', sales_date) as month, SUM(revenue) as monthly_revenue
             FROM sales
             GROUP BY month
             ORDER BY month DESC
             LIMIT 2",
        )?;
        let revenue_growth = if monthly.rows.len() >= 2 {
            let current = cell_f64(&monthly.rows[0][1]);
            let previous = cell_f64(&monthly.rows[1][1]);
            if previous != 0.0 {
                (current - previous) / previous * 100.0
            } else {
                0.0
            }
        } else {
            0.0
        };

        Ok(Kpis {
            total_revenue,
            total_orders,
            total_customers,
            revenue_growth,
        })
    }

    /// Run the fixed aggregate query for a chart kind.
    pub fn chart_data(&self, kind: ChartKind) -> Result<QueryResult> {
        self.db.execute_query(kind.query())
    }
}

fn cell_f64(value: &SqlValue) -> f64 {
    match value {
        SqlValue::Integer(n) => *n as f64,
        SqlValue::Real(f) => *f,
        _ => 0.0,
    }
}

fn cell_i64(value: &SqlValue) -> i64 {
    match value {
        SqlValue::Integer(n) => *n,
        SqlValue::Real(f) => *f as i64,
        _ => 0,
    }
}

fn first_cell_f64(result: &QueryResult) -> f64 {
    result.rows.first().and_then(|r| r.first()).map_or(0.0, cell_f64)
}

fn first_cell_i64(result: &QueryResult) -> i64 {
    result.rows.first().and_then(|r| r.first()).map_or(0, cell_i64)
}

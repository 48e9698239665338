//! Reporting service for route analytics, the booking dashboard and CSV export

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{
    summarize_route_performance, summarize_route_stats, summarize_trend, validate_date_range,
    DailyRoutePerformance, DashboardMetrics, DateRange, ReferenceItem, RouteStats, StatusCount,
    StatusSummary, TrendPoint,
};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

type StatusCountRow = (Option<NaiveDate>, i32, String, i64);

fn to_status_counts(rows: Vec<StatusCountRow>) -> Vec<StatusCount> {
    rows.into_iter()
        .map(|(date, route_id, status, orders)| StatusCount {
            date,
            route_id,
            status,
            orders,
        })
        .collect()
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn routes(&self) -> AppResult<Vec<ReferenceItem>> {
        let rows = sqlx::query_as::<_, (i32, String)>("SELECT id, name FROM routes ORDER BY id")
            .fetch_all(&self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| ReferenceItem { id, name })
            .collect())
    }

    /// Per-day, per-route deliveries and efficiency within `range`
    pub async fn get_route_performance(
        &self,
        range: &DateRange,
    ) -> AppResult<Vec<DailyRoutePerformance>> {
        validate_date_range(range)?;

        let routes = self.routes().await?;
        let rows = sqlx::query_as::<_, StatusCountRow>(
            r#"
            SELECT o.created_at::date AS date, o.route_id, os.name AS status, COUNT(o.id) AS orders
            FROM orders o
            JOIN order_status os ON o.status_id = os.id
            WHERE o.created_at::date BETWEEN $1 AND $2
            GROUP BY o.created_at::date, o.route_id, os.name
            "#,
        )
        .bind(range.start_date)
        .bind(range.end_date)
        .fetch_all(&self.db)
        .await?;

        Ok(summarize_route_performance(&routes, &to_status_counts(rows)))
    }

    /// Daily figures for one route, by name. Unknown routes yield no points.
    pub async fn get_route_trend(
        &self,
        route: &str,
        range: &DateRange,
    ) -> AppResult<Vec<TrendPoint>> {
        validate_date_range(range)?;

        let rows = sqlx::query_as::<_, StatusCountRow>(
            r#"
            SELECT o.created_at::date AS date, o.route_id, os.name AS status, COUNT(o.id) AS orders
            FROM orders o
            JOIN routes r ON o.route_id = r.id
            JOIN order_status os ON o.status_id = os.id
            WHERE r.name = $1 AND o.created_at::date BETWEEN $2 AND $3
            GROUP BY o.created_at::date, o.route_id, os.name
            "#,
        )
        .bind(route)
        .bind(range.start_date)
        .bind(range.end_date)
        .fetch_all(&self.db)
        .await?;

        Ok(summarize_trend(&to_status_counts(rows)))
    }

    /// Lifetime order counts and efficiency for every route, best first
    pub async fn get_route_stats(&self) -> AppResult<Vec<RouteStats>> {
        let routes = self.routes().await?;
        let rows = sqlx::query_as::<_, StatusCountRow>(
            r#"
            SELECT NULL::date AS date, o.route_id, os.name AS status, COUNT(o.id) AS orders
            FROM orders o
            JOIN order_status os ON o.status_id = os.id
            GROUP BY o.route_id, os.name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(summarize_route_stats(&routes, &to_status_counts(rows)))
    }

    /// Order count per status and the total of all charges
    pub async fn get_dashboard_metrics(&self) -> AppResult<DashboardMetrics> {
        let by_status = sqlx::query_as::<_, (String, Option<String>, i64)>(
            r#"
            SELECT os.name, os.color, COUNT(o.id)
            FROM order_status os
            LEFT JOIN orders o ON o.status_id = os.id
            GROUP BY os.id, os.name, os.color
            ORDER BY os.id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let (total_orders, total_charges) = sqlx::query_as::<_, (i64, Decimal)>(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(lr_charge + freight_charge + fuel_surcharge + ie_charge
                                + door_delivery_charge + hamali_charge), 0)
            FROM orders
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        Ok(DashboardMetrics {
            total_orders,
            by_status: by_status
                .into_iter()
                .map(|(status, color, orders)| StatusSummary {
                    status,
                    color,
                    orders,
                })
                .collect(),
            total_charges,
        })
    }

    /// Export report data to CSV format
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }
}

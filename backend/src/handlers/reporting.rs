//! Reporting handlers for route analytics, the dashboard and data export

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::{DailyRoutePerformance, DashboardMetrics, DateRange, ExportFormat, TrendPoint};

use crate::error::{AppError, AppResult};
use crate::services::ReportingService;
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendQuery {
    pub route: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Deserialize)]
pub struct StatsQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

fn parse_date(field: &str, value: Option<&str>) -> AppResult<NaiveDate> {
    value
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| AppError::Validation {
            field: field.to_string(),
            message: format!("{} must be an ISO date (YYYY-MM-DD)", field),
        })
}

fn date_range(start: Option<&str>, end: Option<&str>) -> AppResult<DateRange> {
    Ok(DateRange::new(
        parse_date("startDate", start)?,
        parse_date("endDate", end)?,
    ))
}

/// Per-day, per-route deliveries and efficiency
pub async fn get_route_performance(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<Vec<DailyRoutePerformance>>> {
    let range = date_range(query.start_date.as_deref(), query.end_date.as_deref())?;
    let service = ReportingService::new(state.db.clone());
    Ok(Json(service.get_route_performance(&range).await?))
}

/// Daily trend for a single route
pub async fn get_route_trend(
    State(state): State<AppState>,
    Query(query): Query<TrendQuery>,
) -> AppResult<Json<Vec<TrendPoint>>> {
    let route = query
        .route
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::Validation {
            field: "route".to_string(),
            message: "route is required".to_string(),
        })?;
    let range = date_range(query.start_date.as_deref(), query.end_date.as_deref())?;

    let service = ReportingService::new(state.db.clone());
    Ok(Json(service.get_route_trend(route, &range).await?))
}

/// Per-route totals; `?format=csv` downloads them
pub async fn get_route_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new(state.db.clone());
    let data = service.get_route_stats().await?;

    if query.format == ExportFormat::Csv {
        let csv = ReportingService::export_to_csv(&data)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"route_stats.csv\""),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(data).into_response())
    }
}

/// Booking status counts and charge totals
pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardMetrics>> {
    let service = ReportingService::new(state.db.clone());
    Ok(Json(service.get_dashboard_metrics().await?))
}

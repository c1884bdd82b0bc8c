use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use contracts::dashboards::d402_sales_analytics::{
    DashboardData, DrillDownFilter, DrillDownRequest, DrillDownResult,
};
use std::sync::Arc;

use crate::dashboards::d402_sales_analytics::drilldown::build_drilldown_result;
use crate::dashboards::d402_sales_analytics::export::{export_csv, export_file_name};
use crate::shared::sales_source::{LoadedSales, SalesStore};

async fn load_snapshot(store: &SalesStore) -> Result<Arc<LoadedSales>, StatusCode> {
    store.snapshot().await.map_err(|e| {
        tracing::error!("D402 Dashboard: Failed to load sales data: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

fn parse_filter(request: DrillDownRequest) -> Result<DrillDownFilter, StatusCode> {
    DrillDownFilter::try_from(request).map_err(|e| {
        tracing::warn!("D402 Dashboard: Rejected drill-down request: {}", e);
        StatusCode::BAD_REQUEST
    })
}

/// GET /api/d402/dashboard
pub async fn get_dashboard(
    State(store): State<Arc<SalesStore>>,
) -> Result<Json<DashboardData>, StatusCode> {
    let snapshot = load_snapshot(&store).await?;
    tracing::info!(
        "D402 Dashboard: Returning metrics for {} records",
        snapshot.dashboard.summary.total_orders
    );
    Ok(Json(snapshot.dashboard.clone()))
}

/// GET /api/d402/records
pub async fn get_records(
    State(store): State<Arc<SalesStore>>,
) -> Result<Json<DrillDownResult>, StatusCode> {
    let snapshot = load_snapshot(&store).await?;
    Ok(Json(build_drilldown_result(&snapshot.records, None)))
}

/// GET /api/d402/drilldown?dimension=region&value=East&label=Region:%20East
pub async fn get_drilldown(
    State(store): State<Arc<SalesStore>>,
    Query(request): Query<DrillDownRequest>,
) -> Result<Json<DrillDownResult>, StatusCode> {
    let filter = parse_filter(request)?;
    let snapshot = load_snapshot(&store).await?;

    let result = build_drilldown_result(&snapshot.records, Some(filter));
    tracing::info!(
        "D402 Dashboard: Drill-down {} returned {} records",
        result.filter.as_ref().map(|f| f.label.as_str()).unwrap_or_default(),
        result.total_count
    );
    Ok(Json(result))
}

/// GET /api/d402/drilldown/csv?dimension=month&value=2023-02
pub async fn download_drilldown_csv(
    State(store): State<Arc<SalesStore>>,
    Query(request): Query<DrillDownRequest>,
) -> Result<Response, StatusCode> {
    let filter = parse_filter(request)?;
    let snapshot = load_snapshot(&store).await?;

    let file_name = export_file_name(Some(&filter), Utc::now().timestamp_millis());
    let result = build_drilldown_result(&snapshot.records, Some(filter));
    let body = export_csv(&result.records).map_err(|e| {
        tracing::error!("D402 Dashboard: Failed to export CSV: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response())
}

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::api::handlers;
use crate::shared::sales_source::SalesStore;

/// Application routes
pub fn configure_routes(store: Arc<SalesStore>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // D402 SALES ANALYTICS DASHBOARD
        // ========================================
        .route(
            "/api/d402/dashboard",
            get(handlers::d402_sales_analytics::get_dashboard),
        )
        .route(
            "/api/d402/records",
            get(handlers::d402_sales_analytics::get_records),
        )
        .route(
            "/api/d402/drilldown",
            get(handlers::d402_sales_analytics::get_drilldown),
        )
        .route(
            "/api/d402/drilldown/csv",
            get(handlers::d402_sales_analytics::download_drilldown_csv),
        )
        .with_state(store)
}

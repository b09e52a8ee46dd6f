//! Report API router.
//!
//! Returns a composable `Router` wiring the four report endpoints to the
//! shared `ReportService`. Transport concerns stop here; everything behind
//! the handlers is synchronous pipeline code.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::service::ReportService;

/// Build the report API router around a shared service instance.
pub fn report_api_router(service: Arc<ReportService>) -> Router {
    let ctx = ApiContext::new(service);

    Router::new()
        .route("/health", get(health))
        .route("/extract-table", post(endpoints::extract::extract_table))
        .route(
            "/get-normalized-report",
            post(endpoints::report::normalized_report),
        )
        .route("/analyze-report", post(endpoints::analyze::analyze_report))
        .route(
            "/analyze-report/summary",
            post(endpoints::analyze::analyze_report_with_summary),
        )
        .with_state(ctx)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": crate::APP_VERSION }))
}

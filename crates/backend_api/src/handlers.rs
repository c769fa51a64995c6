use axum::{extract::State, response::Html, response::IntoResponse, Json};
use std::sync::Arc;

use crate::{repository::ReportRepository, Result};

pub type RepositoryState = Arc<dyn ReportRepository>;

/// GET /
/// Server-rendered report page. Load failures stay on the page: the
/// message lands in the status region and the raw error is re-raised as
/// a blocking alert, matching the loud failure mode this internal tool
/// has always had.
pub async fn index(State(repo): State<RepositoryState>) -> Html<String> {
    match repo.fetch_report().await {
        Ok(report) => Html(table_render::render_page(&report)),
        Err(err) => {
            tracing::error!(error = %err, "failed to load report");
            Html(table_render::render_error_page(&err.to_string()))
        }
    }
}

/// GET /api/data
/// Returns the raw report document for external consumers.
pub async fn get_report_data(State(repo): State<RepositoryState>) -> Result<impl IntoResponse> {
    let report = repo.fetch_report().await?;
    Ok(Json(report))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "holdings-report-api"
    }))
}

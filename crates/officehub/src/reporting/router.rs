use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use super::domain::ReportRenderer;
use super::service::ReportService;
use crate::applications::ApplicationRepository;
use crate::auth::admin_header;
use crate::identity::{FavoriteRepository, UserRepository};
use crate::offices::OfficeRepository;

/// Router for the admin-only report export.
pub fn report_router<R, W>(service: Arc<ReportService<R, W>>) -> Router
where
    R: UserRepository + FavoriteRepository + OfficeRepository + ApplicationRepository + 'static,
    W: ReportRenderer + 'static,
{
    Router::new()
        .route("/export/report/pdf", get(export_handler::<R, W>))
        .with_state(service)
}

async fn export_handler<R, W>(
    State(service): State<Arc<ReportService<R, W>>>,
    headers: HeaderMap,
) -> Response
where
    R: UserRepository + FavoriteRepository + OfficeRepository + ApplicationRepository + 'static,
    W: ReportRenderer + 'static,
{
    if let Err(err) = service.gate().require_admin(admin_header(&headers)) {
        return err.into_response();
    }

    match service.export() {
        Ok(report) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, report.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename={}", report.file_name),
                ),
            ],
            report.bytes,
        )
            .into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": err.to_string() })),
        )
            .into_response(),
    }
}

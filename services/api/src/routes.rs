use std::sync::Arc;

use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;

use crate::infra::AppState;
use officehub::applications::{application_router, ApplicationRepository, ApplicationService};
use officehub::identity::{
    identity_router, FavoriteRepository, IdentityService, UserRepository,
};
use officehub::offices::{office_router, OfficeRepository, OfficeService, PhotoStore};
use officehub::reporting::{report_router, ReportRenderer, ReportService};

/// Compose the feature routers with photo serving and the operational
/// endpoints.
pub(crate) fn app_router<R, P, W>(
    identity: Arc<IdentityService<R>>,
    offices: Arc<OfficeService<R, P>>,
    applications: Arc<ApplicationService<R>>,
    report: Arc<ReportService<R, W>>,
) -> Router
where
    R: UserRepository + FavoriteRepository + OfficeRepository + ApplicationRepository + 'static,
    P: PhotoStore + 'static,
    W: ReportRenderer + 'static,
{
    identity_router(identity)
        .merge(office_router(offices))
        .merge(application_router(applications))
        .merge(report_router(report))
        .route("/photos/:office_id/:file", get(photo_endpoint))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn photo_endpoint(
    Extension(state): Extension<AppState>,
    Path((office_id, file)): Path<(i64, String)>,
) -> impl IntoResponse {
    // Single path segment; still refuse traversal attempts.
    if file.contains("..") || file.contains('/') {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "photo not found" })),
        )
            .into_response();
    }

    let path = state.photos_dir.join(office_id.to_string()).join(&file);
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                bytes,
            )
                .into_response()
        }
        Err(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "photo not found" })),
        )
            .into_response(),
    }
}

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use super::domain::{OfficeDraft, OfficeId, OfficeSearch};
use super::photos::PhotoStore;
use super::repository::OfficeRepository;
use super::service::{OfficeService, OfficeServiceError};
use crate::auth::admin_header;

/// Router for office CRUD and search.
pub fn office_router<R, P>(service: Arc<OfficeService<R, P>>) -> Router
where
    R: OfficeRepository + 'static,
    P: PhotoStore + 'static,
{
    Router::new()
        .route("/office", get(list_handler::<R, P>).post(create_handler::<R, P>))
        .route("/office/search", post(search_handler::<R, P>))
        .route(
            "/office/:office_id",
            get(get_handler::<R, P>)
                .put(update_handler::<R, P>)
                .delete(delete_handler::<R, P>),
        )
        .route("/offices/search/:query", get(search_by_name_handler::<R, P>))
        .with_state(service)
}

fn detail(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "detail": text }))).into_response()
}

fn message(text: &str) -> Response {
    (StatusCode::OK, Json(json!({ "message": text }))).into_response()
}

fn service_error(err: OfficeServiceError) -> Response {
    match err {
        OfficeServiceError::NotFound => detail(StatusCode::NOT_FOUND, "office not found"),
        OfficeServiceError::PhotoDecode(_) | OfficeServiceError::PhotoStore(_) => {
            detail(StatusCode::INTERNAL_SERVER_ERROR, "error saving photos")
        }
    }
}

async fn list_handler<R, P>(State(service): State<Arc<OfficeService<R, P>>>) -> Response
where
    R: OfficeRepository + 'static,
    P: PhotoStore + 'static,
{
    let offices = service.list();
    if offices.is_empty() {
        message("no offices available")
    } else {
        (StatusCode::OK, Json(offices)).into_response()
    }
}

async fn get_handler<R, P>(
    State(service): State<Arc<OfficeService<R, P>>>,
    Path(office_id): Path<i64>,
) -> Response
where
    R: OfficeRepository + 'static,
    P: PhotoStore + 'static,
{
    match service.get(OfficeId(office_id)) {
        Some(office) => (StatusCode::OK, Json(office)).into_response(),
        None => detail(StatusCode::NOT_FOUND, "office not found"),
    }
}

async fn create_handler<R, P>(
    State(service): State<Arc<OfficeService<R, P>>>,
    headers: HeaderMap,
    Json(draft): Json<OfficeDraft>,
) -> Response
where
    R: OfficeRepository + 'static,
    P: PhotoStore + 'static,
{
    if let Err(err) = service.gate().require_admin(admin_header(&headers)) {
        return err.into_response();
    }
    match service.create(draft) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => service_error(err),
    }
}

async fn update_handler<R, P>(
    State(service): State<Arc<OfficeService<R, P>>>,
    Path(office_id): Path<i64>,
    headers: HeaderMap,
    Json(draft): Json<OfficeDraft>,
) -> Response
where
    R: OfficeRepository + 'static,
    P: PhotoStore + 'static,
{
    if let Err(err) = service.gate().require_admin(admin_header(&headers)) {
        return err.into_response();
    }
    match service.update(OfficeId(office_id), draft) {
        Ok(()) => message("office updated"),
        Err(err) => service_error(err),
    }
}

async fn delete_handler<R, P>(
    State(service): State<Arc<OfficeService<R, P>>>,
    Path(office_id): Path<i64>,
    headers: HeaderMap,
) -> Response
where
    R: OfficeRepository + 'static,
    P: PhotoStore + 'static,
{
    if let Err(err) = service.gate().require_admin(admin_header(&headers)) {
        return err.into_response();
    }
    match service.delete(OfficeId(office_id)) {
        Ok(()) => message("office and associated photos deleted"),
        Err(err) => service_error(err),
    }
}

async fn search_handler<R, P>(
    State(service): State<Arc<OfficeService<R, P>>>,
    Json(criteria): Json<OfficeSearch>,
) -> Response
where
    R: OfficeRepository + 'static,
    P: PhotoStore + 'static,
{
    let offices = service.search(&criteria);
    if offices.is_empty() {
        message("no offices match the given criteria")
    } else {
        (StatusCode::OK, Json(offices)).into_response()
    }
}

async fn search_by_name_handler<R, P>(
    State(service): State<Arc<OfficeService<R, P>>>,
    Path(query): Path<String>,
) -> Response
where
    R: OfficeRepository + 'static,
    P: PhotoStore + 'static,
{
    (StatusCode::OK, Json(service.search_by_name(&query))).into_response()
}

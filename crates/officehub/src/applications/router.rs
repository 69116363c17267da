use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::json;

use super::domain::ApplicationId;
use super::repository::ApplicationRepository;
use super::service::{ApplicationService, StatusOutcome, SubmitOutcome};
use crate::auth::admin_header;
use crate::identity::{AuthToken, UserRepository};
use crate::offices::OfficeId;

/// Router for the application lifecycle. POST and PUT share one two-segment
/// template (the route tree requires matching parameter names): the POST
/// handler reads the segments as (user token, office id), the PUT handler as
/// (application id, status code).
pub fn application_router<R>(service: Arc<ApplicationService<R>>) -> Router
where
    R: ApplicationRepository + UserRepository + 'static,
{
    Router::new()
        .route("/applications", get(list_all_handler::<R>))
        .route("/applications/:app_id", delete(delete_handler::<R>))
        .route(
            "/applications/:app_id/:status_id",
            post(submit_handler::<R>).put(set_status_handler::<R>),
        )
        .route("/user/:token/applications", get(user_applications_handler::<R>))
        .with_state(service)
}

fn detail(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "detail": text }))).into_response()
}

fn message(text: &str) -> Response {
    (StatusCode::OK, Json(json!({ "message": text }))).into_response()
}

async fn list_all_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    headers: HeaderMap,
) -> Response
where
    R: ApplicationRepository + UserRepository + 'static,
{
    if let Err(err) = service.gate().require_admin(admin_header(&headers)) {
        return err.into_response();
    }
    let applications = service.list_all();
    if applications.is_empty() {
        message("no applications")
    } else {
        (StatusCode::OK, Json(applications)).into_response()
    }
}

async fn user_applications_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Path(token): Path<String>,
) -> Response
where
    R: ApplicationRepository + UserRepository + 'static,
{
    match service.list_for_user(&AuthToken::from(token)) {
        None => detail(StatusCode::NOT_FOUND, "user not found"),
        Some(applications) if applications.is_empty() => message("no applications"),
        Some(applications) => (StatusCode::OK, Json(applications)).into_response(),
    }
}

async fn submit_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Path((token, office_id)): Path<(String, i64)>,
) -> Response
where
    R: ApplicationRepository + UserRepository + 'static,
{
    match service.submit(&AuthToken::from(token), OfficeId(office_id)) {
        SubmitOutcome::Submitted => detail(StatusCode::OK, "application submitted"),
        SubmitOutcome::UserNotFound => detail(StatusCode::OK, "user not found"),
        SubmitOutcome::AdminRefused => {
            detail(StatusCode::OK, "the administrator cannot submit an application")
        }
        SubmitOutcome::AlreadySubmitted => detail(StatusCode::OK, "application already submitted"),
    }
}

// Deliberately ungated, unlike deletion: any caller holding an application
// id may re-point its status.
async fn set_status_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Path((app_id, status_id)): Path<(i64, i32)>,
) -> Response
where
    R: ApplicationRepository + UserRepository + 'static,
{
    match service.set_status(ApplicationId(app_id), status_id) {
        Some(StatusOutcome::Cancelled) => message("application cancelled"),
        Some(StatusOutcome::Accepted) => message("application accepted"),
        None => detail(StatusCode::NOT_FOUND, "application not found"),
    }
}

async fn delete_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Path(app_id): Path<i64>,
    headers: HeaderMap,
) -> Response
where
    R: ApplicationRepository + UserRepository + 'static,
{
    if let Err(err) = service.gate().require_admin(admin_header(&headers)) {
        return err.into_response();
    }
    if service.delete(ApplicationId(app_id)) {
        message("application deleted")
    } else {
        message("application not found")
    }
}

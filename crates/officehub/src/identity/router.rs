use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::domain::{AuthToken, NewUserProfile, UserId, UserUpdate};
use super::repository::{FavoriteRepository, UserRepository};
use super::service::{
    FavoriteAddOutcome, FavoriteRemoveOutcome, IdentityError, IdentityService, LoginOutcome,
    RegistrationOutcome,
};
use crate::auth::admin_header;
use crate::offices::{OfficeId, OfficeRepository};

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) email: String,
    pub(crate) password: String,
}

/// Router for registration, login, user administration, and favorites.
pub fn identity_router<R>(service: Arc<IdentityService<R>>) -> Router
where
    R: UserRepository + FavoriteRepository + OfficeRepository + 'static,
{
    Router::new()
        .route("/reg", post(register_handler::<R>))
        .route("/login", post(login_handler::<R>))
        .route("/users", get(list_users_handler::<R>))
        .route("/users/search/:phone", get(search_users_handler::<R>))
        .route(
            "/users/id/:user_id",
            get(user_by_id_handler::<R>)
                .put(update_by_id_handler::<R>)
                .delete(delete_by_id_handler::<R>),
        )
        .route(
            "/users/:token",
            get(profile_handler::<R>)
                .put(update_profile_handler::<R>)
                .delete(delete_by_token_handler::<R>),
        )
        .route("/user/:token/favorite", get(favorites_handler::<R>))
        .route(
            "/user/:token/favorite/:office_id",
            post(add_favorite_handler::<R>).delete(remove_favorite_handler::<R>),
        )
        .with_state(service)
}

fn detail(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "detail": text }))).into_response()
}

fn message(text: &str) -> Response {
    (StatusCode::OK, Json(json!({ "message": text }))).into_response()
}

fn internal(err: IdentityError) -> Response {
    detail(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
}

async fn register_handler<R>(
    State(service): State<Arc<IdentityService<R>>>,
    Json(profile): Json<NewUserProfile>,
) -> Response
where
    R: UserRepository + FavoriteRepository + OfficeRepository + 'static,
{
    match service.register(profile) {
        Ok(RegistrationOutcome::Created(view)) => (StatusCode::OK, Json(view)).into_response(),
        Ok(RegistrationOutcome::DuplicateEmail) => detail(
            StatusCode::OK,
            "a user with this email address is already registered",
        ),
        Ok(RegistrationOutcome::DuplicatePhone) => detail(
            StatusCode::OK,
            "a user with this phone number is already registered",
        ),
        Err(err) => internal(err),
    }
}

async fn login_handler<R>(
    State(service): State<Arc<IdentityService<R>>>,
    Json(request): Json<LoginRequest>,
) -> Response
where
    R: UserRepository + FavoriteRepository + OfficeRepository + 'static,
{
    match service.login(&request.email, &request.password) {
        LoginOutcome::Authenticated { token, role } => (
            StatusCode::OK,
            Json(json!({ "token": token, "role": role })),
        )
            .into_response(),
        LoginOutcome::NotFound => detail(StatusCode::OK, "user not found"),
        LoginOutcome::Blocked => detail(StatusCode::OK, "user is blocked"),
        LoginOutcome::BadPassword => detail(StatusCode::OK, "incorrect password"),
    }
}

async fn profile_handler<R>(
    State(service): State<Arc<IdentityService<R>>>,
    Path(token): Path<String>,
) -> Response
where
    R: UserRepository + FavoriteRepository + OfficeRepository + 'static,
{
    match service.profile(&AuthToken::from(token)) {
        Some(view) => (StatusCode::OK, Json(view)).into_response(),
        None => detail(StatusCode::OK, "user not found"),
    }
}

async fn update_profile_handler<R>(
    State(service): State<Arc<IdentityService<R>>>,
    Path(token): Path<String>,
    Json(update): Json<UserUpdate>,
) -> Response
where
    R: UserRepository + FavoriteRepository + OfficeRepository + 'static,
{
    match service.update_by_token(&AuthToken::from(token), update) {
        Ok(true) => message("profile updated"),
        Ok(false) => detail(StatusCode::OK, "user not found"),
        Err(err) => internal(err),
    }
}

async fn delete_by_token_handler<R>(
    State(service): State<Arc<IdentityService<R>>>,
    Path(token): Path<String>,
    headers: HeaderMap,
) -> Response
where
    R: UserRepository + FavoriteRepository + OfficeRepository + 'static,
{
    if let Err(err) = service.gate().require_admin(admin_header(&headers)) {
        return err.into_response();
    }
    if service.delete_by_token(&AuthToken::from(token)) {
        message("user deleted")
    } else {
        detail(StatusCode::OK, "user not found")
    }
}

async fn list_users_handler<R>(
    State(service): State<Arc<IdentityService<R>>>,
    headers: HeaderMap,
) -> Response
where
    R: UserRepository + FavoriteRepository + OfficeRepository + 'static,
{
    if let Err(err) = service.gate().require_admin(admin_header(&headers)) {
        return err.into_response();
    }
    let users = service.list_users();
    if users.is_empty() {
        message("no users found")
    } else {
        (StatusCode::OK, Json(users)).into_response()
    }
}

async fn user_by_id_handler<R>(
    State(service): State<Arc<IdentityService<R>>>,
    Path(user_id): Path<i64>,
    headers: HeaderMap,
) -> Response
where
    R: UserRepository + FavoriteRepository + OfficeRepository + 'static,
{
    if let Err(err) = service.gate().require_admin(admin_header(&headers)) {
        return err.into_response();
    }
    match service.user_view_by_id(UserId(user_id)) {
        Some(view) => (StatusCode::OK, Json(view)).into_response(),
        None => message("user not found"),
    }
}

async fn update_by_id_handler<R>(
    State(service): State<Arc<IdentityService<R>>>,
    Path(user_id): Path<i64>,
    headers: HeaderMap,
    Json(update): Json<UserUpdate>,
) -> Response
where
    R: UserRepository + FavoriteRepository + OfficeRepository + 'static,
{
    if let Err(err) = service.gate().require_admin(admin_header(&headers)) {
        return err.into_response();
    }
    // Unlike the by-token update, a missing id on this path is a 404.
    match service.update_by_id(UserId(user_id), update) {
        Ok(true) => message("profile updated"),
        Ok(false) => detail(StatusCode::NOT_FOUND, "user not found"),
        Err(err) => internal(err),
    }
}

async fn delete_by_id_handler<R>(
    State(service): State<Arc<IdentityService<R>>>,
    Path(user_id): Path<i64>,
    headers: HeaderMap,
) -> Response
where
    R: UserRepository + FavoriteRepository + OfficeRepository + 'static,
{
    if let Err(err) = service.gate().require_admin(admin_header(&headers)) {
        return err.into_response();
    }
    if service.delete_by_id(UserId(user_id)) {
        message("user deleted")
    } else {
        message("user not found")
    }
}

async fn search_users_handler<R>(
    State(service): State<Arc<IdentityService<R>>>,
    Path(phone): Path<String>,
) -> Response
where
    R: UserRepository + FavoriteRepository + OfficeRepository + 'static,
{
    (StatusCode::OK, Json(service.search_by_phone(&phone))).into_response()
}

async fn favorites_handler<R>(
    State(service): State<Arc<IdentityService<R>>>,
    Path(token): Path<String>,
) -> Response
where
    R: UserRepository + FavoriteRepository + OfficeRepository + 'static,
{
    match service.favorites(&AuthToken::from(token)) {
        Ok(favorites) if favorites.is_empty() => message("no favorite offices"),
        Ok(favorites) => (StatusCode::OK, Json(favorites)).into_response(),
        Err(err) => detail(StatusCode::NOT_FOUND, &err.to_string()),
    }
}

async fn add_favorite_handler<R>(
    State(service): State<Arc<IdentityService<R>>>,
    Path((token, office_id)): Path<(String, i64)>,
) -> Response
where
    R: UserRepository + FavoriteRepository + OfficeRepository + 'static,
{
    match service.add_favorite(&AuthToken::from(token), OfficeId(office_id)) {
        Ok(FavoriteAddOutcome::Added) => message("office added to favorites"),
        Ok(FavoriteAddOutcome::AlreadyFavorite) => message("office is already in favorites"),
        Ok(FavoriteAddOutcome::AdminRefused) => {
            message("the administrator cannot add an office to favorites")
        }
        Err(err) => detail(StatusCode::NOT_FOUND, &err.to_string()),
    }
}

async fn remove_favorite_handler<R>(
    State(service): State<Arc<IdentityService<R>>>,
    Path((token, office_id)): Path<(String, i64)>,
) -> Response
where
    R: UserRepository + FavoriteRepository + OfficeRepository + 'static,
{
    match service.remove_favorite(&AuthToken::from(token), OfficeId(office_id)) {
        FavoriteRemoveOutcome::Removed => message("office removed from favorites"),
        FavoriteRemoveOutcome::NotFavorite => message("office is not in favorites"),
        FavoriteRemoveOutcome::UserNotFound => message("user not found"),
    }
}

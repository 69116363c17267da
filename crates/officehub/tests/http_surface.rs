//! HTTP surface tests: route shapes, the admin-token gate, and the split
//! between 200 outcome messages and transport-level errors, driven through
//! the composed routers with `tower::ServiceExt::oneshot`.

mod common {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, Response, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    use officehub::applications::{application_router, ApplicationService};
    use officehub::auth::AdminGate;
    use officehub::config::AdminConfig;
    use officehub::identity::{bootstrap_admin, identity_router, IdentityService, UserRecord};
    use officehub::offices::{
        office_router, OfficeId, OfficeService, PhotoPayload, PhotoStore, PhotoStoreError,
    };
    use officehub::reporting::{
        report_router, RenderError, RenderedReport, ReportRenderer, ReportService, ReportSnapshot,
    };
    use officehub::store::MemoryStore;

    #[derive(Default)]
    pub(super) struct NullPhotoStore;

    impl PhotoStore for NullPhotoStore {
        fn replace(
            &self,
            office: OfficeId,
            photos: &[PhotoPayload],
        ) -> Result<Vec<String>, PhotoStoreError> {
            Ok(photos
                .iter()
                .enumerate()
                .map(|(i, photo)| format!("photos/{}/{}.{}", office.0, i, photo.extension))
                .collect())
        }

        fn remove_all(&self, _office: OfficeId) -> Result<(), PhotoStoreError> {
            Ok(())
        }
    }

    pub(super) struct StubRenderer;

    impl ReportRenderer for StubRenderer {
        fn render(&self, snapshot: &ReportSnapshot) -> Result<RenderedReport, RenderError> {
            Ok(RenderedReport {
                file_name: "report_stub.txt".to_string(),
                content_type: "text/plain; charset=utf-8",
                bytes: format!("applications: {}", snapshot.application_count).into_bytes(),
            })
        }
    }

    pub(super) struct TestApp {
        pub(super) router: Router,
        pub(super) admin: UserRecord,
    }

    pub(super) fn app() -> TestApp {
        let store = Arc::new(MemoryStore::default());
        let seed = AdminConfig {
            email: "admin@example.com".to_string(),
            password: "Pppp2005".to_string(),
        };
        let admin = bootstrap_admin(store.as_ref(), &seed).expect("admin bootstraps");
        let gate = Arc::new(AdminGate::new(admin.token.clone()));

        let identity = Arc::new(IdentityService::new(store.clone(), gate.clone()));
        let offices = Arc::new(OfficeService::new(
            store.clone(),
            Arc::new(NullPhotoStore),
            gate.clone(),
        ));
        let applications = Arc::new(ApplicationService::new(store.clone(), gate.clone()));
        let report = Arc::new(ReportService::new(store, Arc::new(StubRenderer), gate));

        let router = identity_router(identity)
            .merge(office_router(offices))
            .merge(application_router(applications))
            .merge(report_router(report));

        TestApp { router, admin }
    }

    pub(super) async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
        router
            .clone()
            .oneshot(request)
            .await
            .expect("router dispatch")
    }

    pub(super) fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    pub(super) fn send_json(method: &str, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
            .expect("request")
    }

    pub(super) fn bare(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    pub(super) fn bare_admin(method: &str, uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("x-admin-token", token)
            .body(Body::empty())
            .expect("request")
    }

    pub(super) async fn json_body(response: Response<Body>) -> Value {
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    pub(super) async fn register(router: &Router, email: &str, tel: &str) -> String {
        let response = send(
            router,
            send_json(
                "POST",
                "/reg",
                &serde_json::json!({
                    "lastName": "Doe",
                    "firstName": "Jane",
                    "tel": tel,
                    "age": 28,
                    "email": email,
                    "password": "hunter2hunter2",
                }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        body.get("token")
            .and_then(Value::as_str)
            .expect("token in registration response")
            .to_string()
    }
}

mod auth_gate {
    use super::common::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn delete_user_by_id_without_token_is_403_with_fixed_message() {
        let app = app();
        let response = send(&app.router, bare("DELETE", "/users/id/5")).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = json_body(response).await;
        assert_eq!(body, json!({ "detail": "invalid administrator token" }));
    }

    #[tokio::test]
    async fn wrong_token_is_rejected_same_as_missing() {
        let app = app();
        let response = send(&app.router, bare_admin("GET", "/users", "nope")).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_token_passes_the_gate() {
        let app = app();
        let response = send(
            &app.router,
            bare_admin("DELETE", "/users/id/5", app.admin.token.as_str()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body.get("message").and_then(|v| v.as_str()), Some("user not found"));
    }

    #[tokio::test]
    async fn office_mutations_are_admin_only() {
        let app = app();
        let draft = json!({
            "name": "Loft",
            "address": "Pier 4",
            "options": "",
            "description": "",
            "area": 50.0,
            "price": 1200.0,
            "photos": [],
        });
        let response = send(&app.router, send_json("POST", "/office", &draft)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

mod registration_and_login {
    use super::common::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn duplicate_email_is_a_200_detail_message() {
        let app = app();
        register(&app.router, "a@example.com", "111").await;

        let response = send(
            &app.router,
            send_json(
                "POST",
                "/reg",
                &json!({
                    "lastName": "Doe",
                    "firstName": "Jane",
                    "tel": "222",
                    "age": 28,
                    "email": "a@example.com",
                    "password": "hunter2hunter2",
                }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(
            body.get("detail").and_then(|v| v.as_str()),
            Some("a user with this email address is already registered")
        );
    }

    #[tokio::test]
    async fn login_returns_token_and_role() {
        let app = app();
        register(&app.router, "a@example.com", "111").await;

        let response = send(
            &app.router,
            send_json(
                "POST",
                "/login",
                &json!({ "email": "a@example.com", "password": "hunter2hunter2" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body.get("token").is_some());
        assert_eq!(body.get("role").and_then(|v| v.as_str()), Some("User"));
    }

    #[tokio::test]
    async fn unknown_profile_token_is_a_200_detail() {
        let app = app();
        let response = send(&app.router, get("/users/ghost-token")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body.get("detail").and_then(|v| v.as_str()), Some("user not found"));
    }
}

mod applications_flow {
    use super::common::*;
    use axum::http::StatusCode;
    use serde_json::Value;

    #[tokio::test]
    async fn submit_twice_then_cancel_and_accept() {
        let app = app();
        let token = register(&app.router, "a@example.com", "111").await;

        let response = send(&app.router, bare("POST", &format!("/applications/{token}/3"))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(
            body.get("detail").and_then(Value::as_str),
            Some("application submitted")
        );

        let response = send(&app.router, bare("POST", &format!("/applications/{token}/3"))).await;
        let body = json_body(response).await;
        assert_eq!(
            body.get("detail").and_then(Value::as_str),
            Some("application already submitted")
        );

        // Status updates take no admin token at all.
        let response = send(&app.router, bare("PUT", "/applications/1/0")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("application cancelled")
        );

        let response = send(&app.router, bare("PUT", "/applications/1/2")).await;
        let body = json_body(response).await;
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("application accepted")
        );
    }

    #[tokio::test]
    async fn admin_submission_is_refused_with_a_detail() {
        let app = app();
        let response = send(
            &app.router,
            bare(
                "POST",
                &format!("/applications/{}/3", app.admin.token.as_str()),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(
            body.get("detail").and_then(Value::as_str),
            Some("the administrator cannot submit an application")
        );
    }

    #[tokio::test]
    async fn listing_is_admin_only_and_deletion_is_gated() {
        let app = app();
        let token = register(&app.router, "a@example.com", "111").await;
        send(&app.router, bare("POST", &format!("/applications/{token}/3"))).await;

        let response = send(&app.router, bare("GET", "/applications")).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = send(
            &app.router,
            bare_admin("GET", "/applications", app.admin.token.as_str()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));

        let response = send(&app.router, bare("DELETE", "/applications/1")).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = send(
            &app.router,
            bare_admin("DELETE", "/applications/1", app.admin.token.as_str()),
        )
        .await;
        let body = json_body(response).await;
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("application deleted")
        );
    }

    #[tokio::test]
    async fn missing_application_status_update_is_404() {
        let app = app();
        let response = send(&app.router, bare("PUT", "/applications/404/1")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn user_application_listing_404s_for_unknown_token() {
        let app = app();
        let response = send(&app.router, get("/user/ghost/applications")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let token = register(&app.router, "a@example.com", "111").await;
        let response = send(&app.router, get(&format!("/user/{token}/applications"))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("no applications")
        );
    }
}

mod offices_and_favorites {
    use super::common::*;
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn missing_office_lookup_is_a_404() {
        let app = app();
        let response = send(&app.router, get("/office/99")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body.get("detail").and_then(Value::as_str), Some("office not found"));
    }

    #[tokio::test]
    async fn empty_office_listing_is_a_message() {
        let app = app();
        let response = send(&app.router, get("/office")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("no offices available")
        );
    }

    #[tokio::test]
    async fn created_office_shows_up_in_listing_and_lookup() {
        let app = app();
        let draft = json!({
            "name": "Harbor Loft",
            "address": "Pier 4",
            "options": "open plan",
            "description": "corner unit",
            "area": 64.0,
            "price": 1800.0,
            "photos": ["data:image/png;base64,aGVsbG8="],
        });
        let mut request = send_json("POST", "/office", &draft);
        request
            .headers_mut()
            .insert("x-admin-token", app.admin.token.as_str().parse().expect("header"));
        let response = send(&app.router, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body.get("active"), Some(&Value::Bool(true)));
        assert_eq!(
            body.get("photos").and_then(Value::as_array).map(Vec::len),
            Some(1)
        );

        let response = send(&app.router, get("/office/1")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn favorite_add_404s_for_unknown_user_but_remove_does_not() {
        let app = app();
        let response = send(&app.router, bare("POST", "/user/ghost/favorite/1")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app.router, bare("DELETE", "/user/ghost/favorite/1")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body.get("message").and_then(Value::as_str), Some("user not found"));
    }

    #[tokio::test]
    async fn admin_favorite_gets_the_refusal_message() {
        let app = app();
        let response = send(
            &app.router,
            bare(
                "POST",
                &format!("/user/{}/favorite/1", app.admin.token.as_str()),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("the administrator cannot add an office to favorites")
        );
    }

    #[tokio::test]
    async fn empty_favorite_listing_is_a_message_and_unknown_user_404s() {
        let app = app();
        let token = register(&app.router, "a@example.com", "111").await;

        let response = send(&app.router, get(&format!("/user/{token}/favorite"))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("no favorite offices")
        );

        let response = send(&app.router, get("/user/ghost/favorite")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

mod report_export {
    use super::common::*;
    use axum::body::to_bytes;
    use axum::http::{header, StatusCode};

    #[tokio::test]
    async fn export_is_admin_only() {
        let app = app();
        let response = send(&app.router, get("/export/report/pdf")).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn export_streams_an_attachment() {
        let app = app();
        let token = register(&app.router, "a@example.com", "111").await;
        send(&app.router, bare("POST", &format!("/applications/{token}/3"))).await;

        let response = send(
            &app.router,
            bare_admin("GET", "/export/report/pdf", app.admin.token.as_str()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .expect("content disposition")
            .to_string();
        assert!(disposition.contains("attachment"));
        assert!(disposition.contains("report_stub.txt"));

        let bytes = to_bytes(response.into_body(), 1024).await.expect("body");
        assert_eq!(&bytes[..], b"applications: 1");
    }
}

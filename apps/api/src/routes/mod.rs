pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::auth::handlers as auth;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts & sessions
        .route("/", get(auth::handle_landing))
        .route(
            "/login",
            get(auth::handle_login_page).post(auth::handle_login),
        )
        .route("/register", post(auth::handle_register))
        .route("/logout", get(auth::handle_logout))
        // Review API
        .route(
            "/upload",
            post(analysis::handle_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/profile", get(analysis::handle_profile))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::parser::HeaderSectionParser;
    use crate::analysis::pipeline::tests::RecordingGenerator;
    use crate::config::Config;

    /// State whose pool never connects; only routes that stay off the database are exercised.
    fn offline_state() -> AppState {
        let config = Config::for_tests();
        AppState {
            db: PgPoolOptions::new()
                .connect_lazy(&config.database_url)
                .unwrap(),
            config,
            generator: Arc::new(RecordingGenerator::replying("Score: 50/100")),
            parser: Arc::new(HeaderSectionParser),
        }
    }

    async fn send(request: Request<Body>) -> axum::response::Response {
        build_router(offline_state()).oneshot(request).await.unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(get_req("/health")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_page_is_public() {
        let response = send(get_req("/login")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_landing_without_session_goes_to_login() {
        let response = send(get_req("/")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }

    #[tokio::test]
    async fn test_protected_routes_redirect_to_login() {
        for uri in ["/profile", "/logout"] {
            let response = send(get_req(uri)).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
            assert_eq!(response.headers()[header::LOCATION], "/login", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_upload_without_session_redirects_before_reading_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=X")
            .body(Body::from("--X--\r\n"))
            .unwrap();
        let response = send(request).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_malformed_session_cookie_redirects() {
        let request = Request::builder()
            .uri("/profile")
            .header(header::COOKIE, "session=not-a-token")
            .body(Body::empty())
            .unwrap();
        let response = send(request).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_register_rejects_empty_fields_before_touching_db() {
        let request = Request::builder()
            .method("POST")
            .uri("/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"username": "", "password": ""}"#))
            .unwrap();
        let response = send(request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

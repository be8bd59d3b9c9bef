use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::request_id::MakeRequestUuid;
use tower_http::request_id::PropagateRequestIdLayer;
use tower_http::request_id::SetRequestIdLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::change_password::change_password;
use super::handlers::delete_current_user::delete_current_user;
use super::handlers::get_current_user::get_current_user;
use super::handlers::get_user::get_user;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::refresh::refresh;
use super::handlers::register::register;
use super::handlers::update_current_user::update_current_user;
use super::middleware::authenticate;
use super::middleware::scope_request_id;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::ports::UserServicePort;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub auth_service: Arc<dyn AuthServicePort>,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    auth_service: Arc<dyn AuthServicePort>,
) -> Router {
    let state = AppState {
        user_service,
        auth_service,
    };

    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh));

    let protected_routes = Router::new()
        .route("/api/auth/logout", post(logout))
        .route(
            "/api/users/me",
            get(get_current_user)
                .patch(update_current_user)
                .delete(delete_current_user),
        )
        .route("/api/users/me/password", patch(change_password))
        .route("/api/users/:user_id", get(get_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();

            tracing::info_span!(
                "http_request",
                request_id = %request_id,
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(scope_request_id))
        .layer(trace_layer)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use auth::TokenService;
    use auth::TokenServiceConfig;
    use auth::TokenSettings;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::user::errors::UserError;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::User;
    use crate::domain::user::models::UserChanges;
    use crate::domain::user::models::UserId;
    use crate::domain::user::models::Username;
    use crate::domain::user::ports::UserRepository;
    use crate::domain::user::service::UserService;
    use crate::outbound::repositories::InMemoryUserRepository;
    use crate::outbound::tokens::JwtAuthService;

    /// Repository whose database is down.
    struct UnavailableRepository;

    fn unavailable<T>() -> Result<T, UserError> {
        Err(UserError::DatabaseError("connection refused".to_string()))
    }

    #[async_trait]
    impl UserRepository for UnavailableRepository {
        async fn create(&self, _user: User) -> Result<User, UserError> {
            unavailable()
        }

        async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserError> {
            unavailable()
        }

        async fn find_by_username(&self, _username: &Username) -> Result<Option<User>, UserError> {
            unavailable()
        }

        async fn find_by_email(&self, _email: &EmailAddress) -> Result<Option<User>, UserError> {
            unavailable()
        }

        async fn update(&self, _id: &UserId, _changes: UserChanges) -> Result<User, UserError> {
            unavailable()
        }

        async fn delete(&self, _id: &UserId) -> Result<(), UserError> {
            unavailable()
        }
    }

    fn auth_service() -> Arc<JwtAuthService> {
        let tokens = TokenService::new(TokenServiceConfig {
            issuer: "account-service".to_string(),
            audience: "account-api".to_string(),
            access: TokenSettings::new("router-access-secret", Duration::from_secs(900)),
            refresh: TokenSettings::new("router-refresh-secret", Duration::from_secs(3600)),
        })
        .unwrap();
        Arc::new(JwtAuthService::new(tokens))
    }

    fn login_request() -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"username": "alice", "password": "alice-password"}"#,
            ))
            .unwrap()
    }

    #[tokio::test]
    async fn test_responses_carry_generated_request_id() {
        let app = create_router(
            Arc::new(UserService::new(Arc::new(InMemoryUserRepository::new()))),
            auth_service(),
        );

        let response = app.oneshot(login_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .expect("missing x-request-id");
        assert!(uuid::Uuid::parse_str(request_id).is_ok());
    }

    #[tokio::test]
    async fn test_internal_error_reports_request_id() {
        let app = create_router(
            Arc::new(UserService::new(Arc::new(UnavailableRepository))),
            auth_service(),
        );
        let mut request = login_request();
        request
            .headers_mut()
            .insert(REQUEST_ID_HEADER, "req-7f3a".parse().unwrap());

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-7f3a");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let message = body["data"]["message"].as_str().unwrap();
        assert!(message.contains("req-7f3a"));
        assert!(!message.contains("connection refused"));
    }
}

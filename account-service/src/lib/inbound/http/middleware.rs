use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use tower_http::request_id::RequestId;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

const BEARER_PREFIX: &str = "Bearer ";

tokio::task_local! {
    static REQUEST_ID: String;
}

/// Id of the request being served, if called from inside one.
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

/// Middleware that exposes the `x-request-id` assigned by `SetRequestIdLayer`
/// to everything the request runs, so internal errors report the same id.
pub async fn scope_request_id(req: Request, next: Next) -> Response {
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    REQUEST_ID.scope(request_id, next.run(req)).await
}

/// Identity attached to a request by the access gate.
///
/// Only the gate constructs it; handlers take it as an extractor argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    user_id: UserId,
}

impl AuthenticatedUser {
    pub(crate) fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}

/// Resolve the `Authorization: Bearer <token>` header to an identity.
///
/// # Errors
/// * `MissingCredential` - No Authorization header
/// * `MalformedCredential` - Header is not visible ASCII or lacks the Bearer prefix
/// * `TokenInvalid` / `TokenExpired` - Access token rejected
pub fn authorize(
    headers: &HeaderMap,
    auth_service: &dyn AuthServicePort,
) -> Result<AuthenticatedUser, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?;

    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MalformedCredential)?;

    auth_service
        .validate_access_token(token)
        .map(AuthenticatedUser::new)
}

/// Middleware that validates access tokens and adds the identity to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authorize(req.headers(), state.auth_service.as_ref()).map_err(|e| {
        tracing::warn!(
            method = %req.method(),
            uri = %req.uri(),
            reason = %e,
            "Request rejected by access gate"
        );
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or_else(|| {
                tracing::error!(uri = %parts.uri, "Route reached without the access gate");
                ApiError::from(AuthError::MissingCredential)
            })
    }
}

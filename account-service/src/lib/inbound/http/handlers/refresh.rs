use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::TokensData;
use super::ValidJson;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

#[derive(Deserialize)]
pub struct RefreshRequestBody {
    refresh_token: String,
}

/// Exchange a refresh token for a new token pair.
///
/// Nothing is stored server-side, so the presented refresh token stays
/// valid until it expires.
pub async fn refresh(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<RefreshRequestBody>,
) -> Result<ApiSuccess<TokensData>, ApiError> {
    let user_id = state
        .auth_service
        .validate_refresh_token(&body.refresh_token)
        .map_err(|e| {
            tracing::warn!(reason = %e, "Refresh token rejected");
            ApiError::Unauthorized("Invalid or expired refresh token".to_string())
        })?;

    let tokens = state.auth_service.issue_tokens(&user_id)?;
    tracing::debug!(user_id = %user_id, "Tokens refreshed");

    Ok(ApiSuccess::new(StatusCode::OK, tokens.into()))
}

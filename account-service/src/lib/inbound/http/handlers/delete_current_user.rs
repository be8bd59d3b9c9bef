use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use super::ValidJson;
use crate::domain::user::models::Password;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::ports::UserServicePort;

#[derive(Deserialize)]
pub struct DeleteAccountRequest {
    password: String,
}

/// Delete the caller's account after re-checking their password.
pub async fn delete_current_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidJson(req): ValidJson<DeleteAccountRequest>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let user_id = user.user_id();

    state
        .user_service
        .verify_password(&user_id, &Password::candidate(req.password))
        .await?;
    state.user_service.delete_user(&user_id).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData::new("account deleted"),
    ))
}

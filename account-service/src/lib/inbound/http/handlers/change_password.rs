use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use super::ValidJson;
use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::Password;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}

impl ChangePasswordRequest {
    fn try_into_command(self) -> Result<ChangePasswordCommand, UserError> {
        Ok(ChangePasswordCommand {
            current_password: Password::candidate(self.current_password),
            new_password: Password::new(self.new_password)?,
        })
    }
}

/// Rotate the caller's password. Existing tokens stay valid until expiry.
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidJson(req): ValidJson<ChangePasswordRequest>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let command = req.try_into_command()?;

    state
        .user_service
        .change_password(&user.user_id(), command)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData::new("password changed"),
    ))
}

use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::AuthResponseData;
use super::ValidJson;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::Password;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

#[derive(Deserialize)]
pub struct LoginRequestBody {
    username: String,
    password: String,
}

pub async fn login(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<LoginRequestBody>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    let command = LoginCommand {
        username: body.username,
        password: Password::candidate(body.password),
    };

    let user = state.user_service.login(command).await?;
    let tokens = state.auth_service.issue_tokens(&user.id)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        AuthResponseData::new(tokens, &user),
    ))
}

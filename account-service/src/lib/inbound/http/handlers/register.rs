use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::DisplayName;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::Username;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::AuthResponseData;
use crate::inbound::http::handlers::ValidJson;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;

/// HTTP request body for registration (raw JSON)
#[derive(Deserialize)]
pub struct RegisterRequestBody {
    name: String,
    username: String,
    #[serde(default)]
    email: Option<String>,
    password: String,
}

impl RegisterRequestBody {
    fn try_into_command(self) -> Result<RegisterUserCommand, UserError> {
        Ok(RegisterUserCommand {
            name: DisplayName::new(self.name)?,
            username: Username::new(self.username)?,
            email: EmailAddress::optional(self.email)?,
            password: Password::new(self.password)?,
        })
    }
}

pub async fn register(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<RegisterRequestBody>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    let command = body.try_into_command()?;

    let user = state.user_service.register(command).await?;
    let tokens = state.auth_service.issue_tokens(&user.id)?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        AuthResponseData::new(tokens, &user),
    ))
}

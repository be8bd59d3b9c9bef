use axum::http::StatusCode;

use super::ApiSuccess;
use super::MessageData;
use crate::inbound::http::middleware::AuthenticatedUser;

/// Tokens are not revoked; clients discard them.
pub async fn logout(user: AuthenticatedUser) -> ApiSuccess<MessageData> {
    tracing::info!(user_id = %user.user_id(), "User logged out");

    ApiSuccess::new(StatusCode::OK, MessageData::new("logged out"))
}

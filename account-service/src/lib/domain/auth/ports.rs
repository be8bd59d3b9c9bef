use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AuthTokens;
use crate::domain::user::models::UserId;

/// Port for minting and checking session tokens.
pub trait AuthServicePort: Send + Sync + 'static {
    /// Issue a fresh access/refresh pair bound to `user_id`.
    ///
    /// # Errors
    /// * `Signing` - Token encoding failed
    fn issue_tokens(&self, user_id: &UserId) -> Result<AuthTokens, AuthError>;

    /// Resolve an access token to the identity it was issued for.
    ///
    /// # Errors
    /// * `TokenInvalid` - Bad signature, wrong purpose, or malformed token
    /// * `TokenExpired` - Token is outside its validity window
    fn validate_access_token(&self, token: &str) -> Result<UserId, AuthError>;

    /// Resolve a refresh token to the identity it was issued for.
    ///
    /// # Errors
    /// * `TokenInvalid` - Bad signature, wrong purpose, or malformed token
    /// * `TokenExpired` - Token is outside its validity window
    fn validate_refresh_token(&self, token: &str) -> Result<UserId, AuthError>;
}

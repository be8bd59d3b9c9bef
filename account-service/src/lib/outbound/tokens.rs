use auth::JwtError;
use auth::TokenPurpose;
use auth::TokenService;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AuthTokens;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::UserId;

/// AuthServicePort backed by signed JWTs.
pub struct JwtAuthService {
    tokens: TokenService,
}

impl JwtAuthService {
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }

    fn validate(&self, token: &str, purpose: TokenPurpose) -> Result<UserId, AuthError> {
        self.tokens
            .validate(token, purpose)
            .map(UserId)
            .map_err(|e| {
                tracing::debug!(%purpose, error = %e, "Token rejected");
                AuthError::from(e)
            })
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::TokenExpired => AuthError::TokenExpired,
            JwtError::InvalidToken(reason) => AuthError::TokenInvalid(reason),
            JwtError::EncodingFailed(reason) => AuthError::Signing(reason),
        }
    }
}

impl AuthServicePort for JwtAuthService {
    fn issue_tokens(&self, user_id: &UserId) -> Result<AuthTokens, AuthError> {
        let pair = self.tokens.issue_pair(user_id.0)?;

        Ok(AuthTokens {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }

    fn validate_access_token(&self, token: &str) -> Result<UserId, AuthError> {
        self.validate(token, TokenPurpose::Access)
    }

    fn validate_refresh_token(&self, token: &str) -> Result<UserId, AuthError> {
        self.validate(token, TokenPurpose::Refresh)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use auth::FixedClock;
    use auth::TokenServiceConfig;
    use auth::TokenSettings;
    use chrono::Utc;

    use super::*;

    fn config() -> TokenServiceConfig {
        TokenServiceConfig {
            issuer: "account-service".to_string(),
            audience: "account-api".to_string(),
            access: TokenSettings::new("access-secret", Duration::from_secs(900)),
            refresh: TokenSettings::new("refresh-secret", Duration::from_secs(3600)),
        }
    }

    #[test]
    fn test_issue_and_validate() {
        let service = JwtAuthService::new(TokenService::new(config()).unwrap());
        let user_id = UserId::new();

        let tokens = service.issue_tokens(&user_id).unwrap();

        assert_eq!(service.validate_access_token(&tokens.access_token), Ok(user_id));
        assert_eq!(service.validate_refresh_token(&tokens.refresh_token), Ok(user_id));
    }

    #[test]
    fn test_purposes_are_not_interchangeable() {
        let service = JwtAuthService::new(TokenService::new(config()).unwrap());
        let tokens = service.issue_tokens(&UserId::new()).unwrap();

        assert!(matches!(
            service.validate_access_token(&tokens.refresh_token),
            Err(AuthError::TokenInvalid(_))
        ));
        assert!(matches!(
            service.validate_refresh_token(&tokens.access_token),
            Err(AuthError::TokenInvalid(_))
        ));
    }

    #[test]
    fn test_expired_access_token() {
        let issued_at = Utc::now() - chrono::Duration::hours(1);
        let past = TokenService::with_clock(config(), Arc::new(FixedClock(issued_at))).unwrap();
        let token = past.issue(UserId::new().0, TokenPurpose::Access).unwrap();

        let service = JwtAuthService::new(TokenService::new(config()).unwrap());
        assert_eq!(
            service.validate_access_token(&token),
            Err(AuthError::TokenExpired)
        );
    }
}

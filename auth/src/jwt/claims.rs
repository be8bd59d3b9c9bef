use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::errors::JwtError;

/// Registered JWT claims carried by every token.
///
/// All fields are required: a token missing any of them is rejected at
/// decode time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// JWT ID (unique token identifier)
    pub jti: String,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims valid from `now` for `ttl`.
    ///
    /// # Arguments
    /// * `subject` - Identity the token is bound to
    /// * `issuer` - Issuing service name
    /// * `audience` - Intended consumer of the token
    /// * `ttl` - Lifetime of the token
    /// * `now` - Issuance instant
    ///
    /// # Returns
    /// Claims with a fresh `jti`, `iat = nbf = now` and `exp = now + ttl`
    ///
    /// # Errors
    /// * `EncodingFailed` - `now + ttl` is not a representable instant
    pub fn new(
        subject: impl ToString,
        issuer: impl ToString,
        audience: impl ToString,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<Self, JwtError> {
        let issued_at = now.timestamp();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| JwtError::EncodingFailed("Token expiry is out of range".to_string()))?;

        Ok(Self {
            sub: subject.to_string(),
            jti: Uuid::new_v4().to_string(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            iat: issued_at,
            nbf: issued_at,
            exp: expires_at.timestamp(),
        })
    }

    /// Check if token is expired. A token is expired from `exp` onwards.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }

    /// Check if token is not valid yet.
    pub fn is_premature(&self, current_timestamp: i64) -> bool {
        current_timestamp < self.nbf
    }

    /// Check if `current_timestamp` lies within `[nbf, exp)`.
    pub fn is_active(&self, current_timestamp: i64) -> bool {
        !self.is_premature(current_timestamp) && !self.is_expired(current_timestamp)
    }
}

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::jwt::Claims;
use crate::jwt::Clock;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::SystemClock;

/// Role a token plays. Each purpose is signed with its own secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenPurpose {
    Access,
    Refresh,
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenPurpose::Access => f.write_str("access"),
            TokenPurpose::Refresh => f.write_str("refresh"),
        }
    }
}

/// Signing secret and lifetime for one token purpose.
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: Vec<u8>,
    pub ttl: Duration,
}

impl TokenSettings {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"[redacted]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Everything the token service needs, built once at startup.
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    pub issuer: String,
    pub audience: String,
    pub access: TokenSettings,
    pub refresh: TokenSettings,
}

/// Matched access/refresh tokens issued for the same subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Rejected token service configuration.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TokenConfigError {
    #[error("The {0} token secret is empty")]
    EmptySecret(TokenPurpose),

    #[error("The {0} token TTL must be at least one second and representable")]
    InvalidTtl(TokenPurpose),

    #[error("Access and refresh tokens must be signed with different secrets")]
    SharedSecret,
}

struct PurposeSigner {
    handler: JwtHandler,
    ttl: chrono::Duration,
}

/// Issues and validates access/refresh token pairs.
///
/// Stateless: nothing is stored per token, so tokens cannot be revoked
/// before they expire.
pub struct TokenService {
    issuer: String,
    audience: String,
    access: PurposeSigner,
    refresh: PurposeSigner,
}

impl TokenService {
    /// Create a token service backed by the wall clock.
    ///
    /// # Errors
    /// * `EmptySecret` - A purpose has no secret
    /// * `InvalidTtl` - A purpose has a TTL under one second or one that
    ///   overflows the calendar
    /// * `SharedSecret` - Both purposes use the same secret
    pub fn new(config: TokenServiceConfig) -> Result<Self, TokenConfigError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a token service reading time from `clock`.
    pub fn with_clock(
        config: TokenServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TokenConfigError> {
        if config.access.secret == config.refresh.secret {
            return Err(TokenConfigError::SharedSecret);
        }

        let access = Self::signer(&config, TokenPurpose::Access, Arc::clone(&clock))?;
        let refresh = Self::signer(&config, TokenPurpose::Refresh, clock)?;

        Ok(Self {
            issuer: config.issuer,
            audience: config.audience,
            access,
            refresh,
        })
    }

    fn signer(
        config: &TokenServiceConfig,
        purpose: TokenPurpose,
        clock: Arc<dyn Clock>,
    ) -> Result<PurposeSigner, TokenConfigError> {
        let settings = match purpose {
            TokenPurpose::Access => &config.access,
            TokenPurpose::Refresh => &config.refresh,
        };

        if settings.secret.is_empty() {
            return Err(TokenConfigError::EmptySecret(purpose));
        }

        // Claims carry whole seconds, so anything shorter has an empty window
        let ttl = chrono::Duration::from_std(settings.ttl)
            .ok()
            .filter(|ttl| *ttl >= chrono::Duration::seconds(1))
            .filter(|ttl| clock.now().checked_add_signed(*ttl).is_some())
            .ok_or(TokenConfigError::InvalidTtl(purpose))?;

        Ok(PurposeSigner {
            handler: JwtHandler::with_clock(
                &settings.secret,
                &config.issuer,
                &config.audience,
                clock,
            ),
            ttl,
        })
    }

    fn signer_for(&self, purpose: TokenPurpose) -> &PurposeSigner {
        match purpose {
            TokenPurpose::Access => &self.access,
            TokenPurpose::Refresh => &self.refresh,
        }
    }

    /// Issue a single token for `subject`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed or the expiry is out of range
    pub fn issue(&self, subject: Uuid, purpose: TokenPurpose) -> Result<String, JwtError> {
        let signer = self.signer_for(purpose);
        let claims = Claims::new(
            subject,
            &self.issuer,
            &self.audience,
            signer.ttl,
            signer.handler.clock().now(),
        )?;

        signer.handler.encode(&claims)
    }

    /// Issue an access and a refresh token for `subject`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing either token failed
    pub fn issue_pair(&self, subject: Uuid) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access_token: self.issue(subject, TokenPurpose::Access)?,
            refresh_token: self.issue(subject, TokenPurpose::Refresh)?,
        })
    }

    /// Validate a token for `purpose` and return its subject.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature does not match this purpose's secret, the
    ///   token is malformed, or the subject is not a valid identifier
    /// * `TokenExpired` - Token is outside its validity window
    pub fn validate(&self, token: &str, purpose: TokenPurpose) -> Result<Uuid, JwtError> {
        let claims = self.signer_for(purpose).handler.decode(token)?;

        Uuid::parse_str(&claims.sub)
            .map_err(|e| JwtError::InvalidToken(format!("Invalid subject: {}", e)))
    }
}

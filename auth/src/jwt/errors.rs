use thiserror::Error;

/// Error type for JWT operations.
///
/// Callers authenticating a request must treat `InvalidToken` and
/// `TokenExpired` the same way; the distinction exists for server-side logs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is invalid: {0}")]
    InvalidToken(String),

    #[error("Token is expired")]
    TokenExpired,
}

use thiserror::Error;

/// Reasons a request credential or token operation failed.
///
/// Variants never carry the token itself.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing credential")]
    MissingCredential,

    #[error("Malformed credential")]
    MalformedCredential,

    #[error("Invalid token: {0}")]
    TokenInvalid(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Token signing failed: {0}")]
    Signing(String),
}

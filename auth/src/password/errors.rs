use thiserror::Error;

/// Error type for password operations.
///
/// Verification never fails with an error: a mismatch and a corrupt digest
/// both surface as `false` from `PasswordHasher::verify`.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

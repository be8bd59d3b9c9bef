use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Password hashing implementation.
///
/// Provides cryptographic password hashing (internally uses Argon2id).
/// Argon2 is deliberately slow: async callers should run `hash` and `verify`
/// on a blocking thread pool.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    ///
    /// # Returns
    /// PasswordHasher instance configured with secure defaults
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext secret.
    ///
    /// Every call draws a fresh salt from the OS RNG, so hashing the same
    /// secret twice yields two different digests.
    ///
    /// # Arguments
    /// * `secret` - Plaintext secret bytes
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Salt generation or parameter setup failed
    pub fn hash(&self, secret: impl AsRef<[u8]>) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(secret.as_ref(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a secret against a stored digest.
    ///
    /// Parameters and salt are taken from the digest itself and the final
    /// comparison is constant-time. A digest that cannot be parsed is treated
    /// like a wrong secret.
    ///
    /// # Arguments
    /// * `secret` - Plaintext secret bytes
    /// * `digest` - Stored hash in PHC string format
    ///
    /// # Returns
    /// True if the secret matches, false otherwise
    pub fn verify(&self, secret: impl AsRef<[u8]>, digest: &str) -> bool {
        let parsed_hash = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!(error = %e, "Stored password digest is malformed");
                return false;
            }
        };

        Argon2::default()
            .verify_password(secret.as_ref(), &parsed_hash)
            .is_ok()
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

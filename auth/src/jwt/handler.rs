use std::sync::Arc;

use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::clock::Clock;
use super::clock::SystemClock;
use super::errors::JwtError;

/// JWT token handler for encoding and decoding tokens.
///
/// Uses HS256 (HMAC with SHA-256). One handler owns one secret; tokens signed
/// under any other secret fail signature verification.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl JwtHandler {
    /// Create a new JWT handler backed by the wall clock.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    /// * `issuer` - Expected `iss` claim
    /// * `audience` - Expected `aud` claim
    ///
    /// # Returns
    /// JwtHandler instance configured with HS256 algorithm
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], issuer: &str, audience: &str) -> Self {
        Self::with_clock(secret, issuer, audience, Arc::new(SystemClock))
    }

    /// Create a new JWT handler reading time from `clock`.
    pub fn with_clock(secret: &[u8], issuer: &str, audience: &str, clock: Arc<dyn Clock>) -> Self {
        let algorithm = Algorithm::HS256;

        let mut validation = Validation::new(algorithm);
        // The time window is checked against our own clock after decoding
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "nbf", "sub", "iss", "aud"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            validation,
            clock,
        }
    }

    /// Clock used for issuance and validation.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Sign claims into a compact, URL-safe JWT.
    ///
    /// # Errors
    /// * `EncodingFailed` - Serialization or signing failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a JWT token.
    ///
    /// The signature is verified before the claims are deserialized. Issuer
    /// and audience are checked next, and the `[nbf, exp)` window last.
    ///
    /// # Errors
    /// * `InvalidToken` - Bad signature, malformed token, or unexpected claims
    /// * `TokenExpired` - Valid signature but outside the validity window
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature | ErrorKind::ImmatureSignature => {
                        JwtError::TokenExpired
                    }
                    _ => JwtError::InvalidToken(e.to_string()),
                }
            })?;

        let claims = token_data.claims;
        if !claims.is_active(self.clock.now().timestamp()) {
            return Err(JwtError::TokenExpired);
        }

        Ok(claims)
    }
}

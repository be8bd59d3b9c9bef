//! Authentication utilities library
//!
//! Provides the credential primitives the account service builds on:
//! - Password hashing (Argon2id)
//! - JWT encoding and validation with an injectable clock
//! - Access/refresh token pairs signed with per-purpose secrets
//!
//! Services define their own authentication traits and adapt these
//! implementations.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("not_my_password", &hash));
//! ```
//!
//! ## Token Pairs
//! ```
//! use std::time::Duration;
//!
//! use auth::{TokenPurpose, TokenService, TokenServiceConfig, TokenSettings};
//! use uuid::Uuid;
//!
//! let service = TokenService::new(TokenServiceConfig {
//!     issuer: "accounts".to_string(),
//!     audience: "api".to_string(),
//!     access: TokenSettings::new("access_secret_at_least_32_bytes_long!", Duration::from_secs(900)),
//!     refresh: TokenSettings::new("refresh_secret_at_least_32_bytes_long", Duration::from_secs(86400)),
//! })
//! .unwrap();
//!
//! let user_id = Uuid::now_v7();
//! let pair = service.issue_pair(user_id).unwrap();
//!
//! assert_eq!(service.validate(&pair.access_token, TokenPurpose::Access).unwrap(), user_id);
//! assert!(service.validate(&pair.access_token, TokenPurpose::Refresh).is_err());
//! ```

pub mod jwt;
pub mod password;
pub mod tokens;

// Re-export commonly used items
pub use jwt::Claims;
pub use jwt::Clock;
pub use jwt::FixedClock;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::SystemClock;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use tokens::TokenConfigError;
pub use tokens::TokenPair;
pub use tokens::TokenPurpose;
pub use tokens::TokenService;
pub use tokens::TokenServiceConfig;
pub use tokens::TokenSettings;

use std::env;
use std::time::Duration;

use auth::TokenServiceConfig;
use auth::TokenSettings;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// Token signing configuration.
///
/// Secrets and TTLs have no defaults: a missing key aborts startup.
#[derive(Deserialize, Clone)]
pub struct AuthConfig {
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub access_token_ttl_seconds: u64,
    pub refresh_token_ttl_seconds: u64,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_audience")]
    pub audience: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_token_secret", &"[redacted]")
            .field("refresh_token_secret", &"[redacted]")
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field("refresh_token_ttl_seconds", &self.refresh_token_ttl_seconds)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_issuer() -> String {
    "account-service".to_string()
}

fn default_audience() -> String {
    "account-api".to_string()
}

impl AuthConfig {
    /// Build the token service configuration.
    pub fn token_service_config(&self) -> TokenServiceConfig {
        TokenServiceConfig {
            issuer: self.issuer.clone(),
            audience: self.audience.clone(),
            access: TokenSettings::new(
                self.access_token_secret.as_bytes(),
                Duration::from_secs(self.access_token_ttl_seconds),
            ),
            refresh: TokenSettings::new(
                self.refresh_token_secret.as_bytes(),
                Duration::from_secs(self.refresh_token_ttl_seconds),
            ),
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, AUTH__ACCESS_TOKEN_SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: AUTH__ACCESS_TOKEN_TTL_SECONDS=900 overrides auth.access_token_ttl_seconds
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;

        configuration.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_config() -> AuthConfig {
        AuthConfig {
            access_token_secret: "access-secret-at-least-32-bytes-long".to_string(),
            refresh_token_secret: "refresh-secret-at-least-32-bytes-long".to_string(),
            access_token_ttl_seconds: 900,
            refresh_token_ttl_seconds: 604_800,
            issuer: default_issuer(),
            audience: default_audience(),
        }
    }

    #[test]
    fn test_token_service_config_from_auth_config() {
        let config = auth_config().token_service_config();

        assert_eq!(config.issuer, "account-service");
        assert_eq!(config.audience, "account-api");
        assert_eq!(config.access.ttl, Duration::from_secs(900));
        assert_eq!(config.refresh.ttl, Duration::from_secs(604_800));
        assert_eq!(config.access.secret, b"access-secret-at-least-32-bytes-long".to_vec());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", auth_config());

        assert!(!rendered.contains("access-secret"));
        assert!(!rendered.contains("refresh-secret"));
    }

    #[test]
    fn test_missing_secret_fails_deserialization() {
        let result = ConfigBuilder::builder()
            .set_override("auth.access_token_secret", "a")
            .and_then(|b| b.set_override("auth.access_token_ttl_seconds", 900_i64))
            .and_then(|b| b.set_override("auth.refresh_token_ttl_seconds", 3600_i64))
            .and_then(|b| b.build())
            .and_then(|c| c.get::<AuthConfig>("auth"));

        assert!(result.is_err());
    }
}

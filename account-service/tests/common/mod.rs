use std::sync::Arc;
use std::time::Duration;

use account_service::config::AuthConfig;
use account_service::domain::user::service::UserService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryUserRepository;
use account_service::outbound::tokens::JwtAuthService;
use auth::FixedClock;
use auth::TokenPurpose;
use auth::TokenService;
use serde_json::json;
use uuid::Uuid;

/// Test application that spawns a real server over an in-memory store
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub auth_config: AuthConfig,
}

/// Tokens and identity returned by a successful registration
pub struct RegisteredUser {
    pub id: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let auth_config = AuthConfig {
            access_token_secret: "test-access-secret-at-least-32-bytes!".to_string(),
            refresh_token_secret: "test-refresh-secret-at-least-32-bytes".to_string(),
            access_token_ttl_seconds: 900,
            refresh_token_ttl_seconds: 3600,
            issuer: "account-service".to_string(),
            audience: "account-api".to_string(),
        };

        let token_service = TokenService::new(auth_config.token_service_config())
            .expect("Failed to build token service");

        let user_service = Arc::new(UserService::new(Arc::new(InMemoryUserRepository::new())));
        let auth_service = Arc::new(JwtAuthService::new(token_service));

        let router = create_router(user_service, auth_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to create reqwest client"),
            auth_config,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a user and return its id and tokens
    pub async fn register(&self, username: &str, password: &str) -> RegisteredUser {
        let response = self
            .post("/api/auth/register")
            .json(&json!({
                "name": "Test User",
                "username": username,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        RegisteredUser {
            id: body["data"]["user"]["id"].as_str().unwrap().to_string(),
            access_token: body["data"]["access_token"].as_str().unwrap().to_string(),
            refresh_token: body["data"]["refresh_token"].as_str().unwrap().to_string(),
        }
    }

    /// Sign a token with the server's secrets but a clock set `age` in the past
    pub fn token_issued_ago(&self, user_id: &str, purpose: TokenPurpose, age: Duration) -> String {
        let issued_at = chrono::Utc::now() - chrono::Duration::from_std(age).unwrap();
        let service = TokenService::with_clock(
            self.auth_config.token_service_config(),
            Arc::new(FixedClock(issued_at)),
        )
        .unwrap();

        service
            .issue(Uuid::parse_str(user_id).unwrap(), purpose)
            .unwrap()
    }
}

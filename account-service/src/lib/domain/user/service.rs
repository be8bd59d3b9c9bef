use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use auth::PasswordHasher;
use chrono::Utc;

use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserChanges;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Well-formed Argon2id digest that matches no password. Login checks
/// against it when the username is unknown so both failure paths pay for
/// one full verification.
const DECOY_PASSWORD_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Domain service implementation for credential lifecycle operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
/// Argon2 work runs on the blocking pool.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    ///
    /// # Returns
    /// Configured user service instance
    pub fn new(repository: Arc<UR>) -> Self {
        Self {
            repository,
            password_hasher: PasswordHasher::new(),
        }
    }

    async fn hash_password(&self, password: &Password) -> Result<String, UserError> {
        let hasher = self.password_hasher;
        let password = password.clone();

        let digest = tokio::task::spawn_blocking(move || hasher.hash(password.expose()))
            .await
            .context("Password hashing task failed")??;

        Ok(digest)
    }

    async fn password_matches(
        &self,
        password: &Password,
        digest: String,
    ) -> Result<bool, UserError> {
        let hasher = self.password_hasher;
        let password = password.clone();

        let matches =
            tokio::task::spawn_blocking(move || hasher.verify(password.expose(), &digest))
                .await
                .context("Password verification task failed")?;

        Ok(matches)
    }

    async fn find_existing(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        let password_hash = self.hash_password(&command.password).await?;
        let now = Utc::now();

        let user = User {
            id: UserId::new(),
            name: command.name,
            username: command.username,
            email: command.email,
            password_hash,
            created_at: now,
            updated_at: now,
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(created_user)
    }

    async fn login(&self, command: LoginCommand) -> Result<User, UserError> {
        let user = match Username::new(command.username) {
            Ok(username) => self.repository.find_by_username(&username).await?,
            Err(_) => None,
        };

        let Some(user) = user else {
            self.password_matches(&command.password, DECOY_PASSWORD_HASH.to_string())
                .await?;
            tracing::warn!("Login rejected: unknown username");
            return Err(UserError::InvalidCredentials);
        };

        if !self
            .password_matches(&command.password, user.password_hash.clone())
            .await?
        {
            tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(UserError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.find_existing(id).await
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let changes = UserChanges::from(command);
        if changes.is_empty() {
            return self.find_existing(id).await;
        }

        let updated_user = self.repository.update(id, changes).await?;
        tracing::info!(user_id = %id, "User profile updated");

        Ok(updated_user)
    }

    async fn verify_password(&self, id: &UserId, password: &Password) -> Result<(), UserError> {
        let user = self.find_existing(id).await?;

        if !self.password_matches(password, user.password_hash).await? {
            return Err(UserError::Validation("wrong password".to_string()));
        }

        Ok(())
    }

    async fn change_password(
        &self,
        id: &UserId,
        command: ChangePasswordCommand,
    ) -> Result<(), UserError> {
        let user = self.find_existing(id).await?;

        if !self
            .password_matches(&command.current_password, user.password_hash)
            .await?
        {
            return Err(UserError::Validation("wrong current password".to_string()));
        }

        let password_hash = self.hash_password(&command.new_password).await?;
        self.repository
            .update(
                id,
                UserChanges {
                    password_hash: Some(password_hash),
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(user_id = %id, "Password changed");
        Ok(())
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");

        Ok(())
    }
}

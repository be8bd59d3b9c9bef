use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserChanges;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local UserRepository backed by a map.
///
/// Enforces the same uniqueness rules as the users table. The lock is held
/// for one operation at a time, so check-and-write is atomic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn ensure_unique(
    users: &HashMap<UserId, User>,
    id: &UserId,
    username: Option<&Username>,
    email: Option<&EmailAddress>,
) -> Result<(), UserError> {
    for other in users.values().filter(|other| other.id != *id) {
        if let Some(username) = username {
            if other.username == *username {
                return Err(UserError::UsernameAlreadyExists(username.to_string()));
            }
        }
        if let Some(email) = email {
            if other.email.as_ref() == Some(email) {
                return Err(UserError::EmailAlreadyExists(email.as_str().to_string()));
            }
        }
    }
    Ok(())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        ensure_unique(&users, &user.id, Some(&user.username), user.email.as_ref())?;
        users.insert(user.id, user.clone());

        tracing::debug!(user_id = %user.id, "User stored in memory");
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.username == *username)
            .cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email.as_ref() == Some(email))
            .cloned())
    }

    async fn update(&self, id: &UserId, changes: UserChanges) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if !users.contains_key(id) {
            return Err(UserError::NotFound(id.to_string()));
        }
        ensure_unique(&users, id, changes.username.as_ref(), changes.email.as_ref())?;

        let user = users
            .get_mut(id)
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;
        changes.apply_to(user, Utc::now());

        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.users
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::models::DisplayName;

    fn user(username: &str, email: Option<&str>) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(),
            name: DisplayName::new("Someone".to_string()).unwrap(),
            username: Username::new(username.to_string()).unwrap(),
            email: email.map(|e| EmailAddress::new(e.to_string()).unwrap()),
            password_hash: "$argon2id$placeholder".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repository = InMemoryUserRepository::new();
        let created = repository
            .create(user("carol", Some("carol@example.com")))
            .await
            .unwrap();

        let by_id = repository.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.username.as_str(), "carol");

        let by_username = repository
            .find_by_username(&Username::new("carol".to_string()).unwrap())
            .await
            .unwrap();
        assert!(by_username.is_some());

        let by_email = repository
            .find_by_email(&EmailAddress::new("carol@example.com".to_string()).unwrap())
            .await
            .unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(created.id));
    }

    #[tokio::test]
    async fn test_create_conflicts() {
        let repository = InMemoryUserRepository::new();
        repository
            .create(user("carol", Some("carol@example.com")))
            .await
            .unwrap();

        let same_username = repository.create(user("carol", None)).await;
        assert!(matches!(
            same_username,
            Err(UserError::UsernameAlreadyExists(_))
        ));

        let same_email = repository
            .create(user("dave", Some("carol@example.com")))
            .await;
        assert!(matches!(same_email, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_taken_username() {
        let repository = InMemoryUserRepository::new();
        repository.create(user("carol", None)).await.unwrap();
        let dave = repository.create(user("dave", None)).await.unwrap();

        let result = repository
            .update(
                &dave.id,
                UserChanges {
                    username: Some(Username::new("carol".to_string()).unwrap()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(UserError::UsernameAlreadyExists(_))));

        let renamed = repository
            .update(
                &dave.id,
                UserChanges {
                    username: Some(Username::new("david".to_string()).unwrap()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.username.as_str(), "david");
    }

    #[tokio::test]
    async fn test_missing_user() {
        let repository = InMemoryUserRepository::new();
        let id = UserId::new();

        assert!(repository.find_by_id(&id).await.unwrap().is_none());
        assert!(matches!(
            repository.update(&id, UserChanges::default()).await,
            Err(UserError::NotFound(_))
        ));
        assert!(matches!(
            repository.delete(&id).await,
            Err(UserError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_missing_user_with_taken_username() {
        let repository = InMemoryUserRepository::new();
        repository.create(user("carol", None)).await.unwrap();

        let result = repository
            .update(
                &UserId::new(),
                UserChanges {
                    username: Some(Username::new("carol".to_string()).unwrap()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }
}

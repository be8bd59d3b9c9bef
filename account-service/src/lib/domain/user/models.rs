use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::NameError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::UserIdError;
use crate::user::errors::UsernameError;

/// User aggregate entity.
///
/// Represents a registered user together with the only persisted form of
/// their password: an Argon2id PHC string.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: DisplayName,
    pub username: Username,
    pub email: Option<EmailAddress>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User unique identifier type
///
/// UUIDv7, so identifiers sort by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new time-ordered user ID.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Human readable name shown on a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    const MAX_LENGTH: usize = 100;

    /// # Errors
    /// * `Empty` - Name is blank
    /// * `TooLong` - Name longer than 100 characters
    pub fn new(name: String) -> Result<Self, NameError> {
        let trimmed = name.trim();
        let length = trimmed.chars().count();

        if length == 0 {
            Err(NameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(NameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Username value type
///
/// Ensures username is 3-32 characters and contains only alphanumeric, underscore, and hyphen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 32;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 32 characters
    /// * `InvalidCharacters` - Contains non-alphanumeric characters (except _ and -)
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = Self::with_valid_length(username)?;
        let username = Self::with_valid_chars(username)?;
        Ok(Self(username))
    }

    fn with_valid_length(username: String) -> Result<String, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(username)
        }
    }

    fn with_valid_chars(username: String) -> Result<String, UsernameError> {
        if username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            Ok(username)
        } else {
            Err(UsernameError::InvalidCharacters)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Parse an optional email where an empty string means "no email".
    pub fn optional(email: Option<String>) -> Result<Option<Self>, EmailError> {
        email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .map(Self::new)
            .transpose()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Plaintext password in transit.
///
/// Never persisted and never formatted: `Debug` prints a placeholder and
/// there is no `Display`.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 8;

    /// Accept a new password, enforcing the password policy.
    ///
    /// # Errors
    /// * `TooShort` - Password shorter than 8 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        Ok(Self(password))
    }

    /// Wrap a password presented for verification.
    ///
    /// No policy is applied: a candidate that could never have been set
    /// simply fails verification.
    pub fn candidate(password: String) -> Self {
        Self(password)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(********)")
    }
}

/// Command to register a new user with domain types
#[derive(Debug)]
pub struct RegisterUserCommand {
    pub name: DisplayName,
    pub username: Username,
    pub email: Option<EmailAddress>,
    pub password: Password,
}

/// Credentials presented at login.
///
/// The username stays raw: a malformed username must fail exactly like an
/// unknown one.
#[derive(Debug)]
pub struct LoginCommand {
    pub username: String,
    pub password: Password,
}

/// Command to update profile fields. Only provided fields are changed.
#[derive(Debug, Default)]
pub struct UpdateUserCommand {
    pub name: Option<DisplayName>,
    pub username: Option<Username>,
    pub email: Option<EmailAddress>,
}

#[derive(Debug)]
pub struct ChangePasswordCommand {
    pub current_password: Password,
    pub new_password: Password,
}

/// Partial update handed to the repository.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<DisplayName>,
    pub username: Option<Username>,
    pub email: Option<EmailAddress>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.username.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
    }

    /// Apply the changes to `user`, bumping `updated_at`.
    pub fn apply_to(self, user: &mut User, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(username) = self.username {
            user.username = username;
        }
        if let Some(email) = self.email {
            user.email = Some(email);
        }
        if let Some(password_hash) = self.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = now;
    }
}

impl From<UpdateUserCommand> for UserChanges {
    fn from(command: UpdateUserCommand) -> Self {
        Self {
            name: command.name,
            username: command.username,
            email: command.email,
            password_hash: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_ids_are_v7() {
        let first = UserId::new();
        let second = UserId::new();

        assert_eq!(first.0.get_version_num(), 7);
        assert_ne!(first, second);
        assert!(first.0.get_timestamp().is_some());
    }

    #[test]
    fn test_username_validation() {
        assert!(Username::new("ada".to_string()).is_ok());
        assert!(Username::new("ada_lovelace-1815".to_string()).is_ok());
        assert_eq!(
            Username::new("ad".to_string()),
            Err(UsernameError::TooShort { min: 3, actual: 2 })
        );
        assert_eq!(
            Username::new("a".repeat(33)),
            Err(UsernameError::TooLong { max: 32, actual: 33 })
        );
        assert_eq!(
            Username::new("ada lovelace".to_string()),
            Err(UsernameError::InvalidCharacters)
        );
    }

    #[test]
    fn test_optional_email() {
        assert_eq!(EmailAddress::optional(None), Ok(None));
        assert_eq!(EmailAddress::optional(Some("  ".to_string())), Ok(None));
        assert_eq!(
            EmailAddress::optional(Some("ada@example.com".to_string()))
                .unwrap()
                .map(|e| e.as_str().to_string()),
            Some("ada@example.com".to_string())
        );
        assert!(EmailAddress::optional(Some("not-an-email".to_string())).is_err());
    }

    #[test]
    fn test_display_name_is_trimmed_and_required() {
        assert_eq!(
            DisplayName::new("  Ada  ".to_string()).unwrap().as_str(),
            "Ada"
        );
        assert_eq!(DisplayName::new("   ".to_string()), Err(NameError::Empty));
    }

    #[test]
    fn test_password_policy_and_redaction() {
        assert_eq!(
            Password::new("short".to_string()).err(),
            Some(PasswordPolicyError::TooShort { min: 8, actual: 5 })
        );

        let password = Password::new("longenough1".to_string()).unwrap();
        assert_eq!(password.expose(), "longenough1");
        assert!(!format!("{:?}", password).contains("longenough1"));

        let command = LoginCommand {
            username: "ada".to_string(),
            password: Password::candidate("hunter2".to_string()),
        };
        assert!(!format!("{:?}", command).contains("hunter2"));
    }

    #[test]
    fn test_user_changes_apply() {
        let now = Utc::now();
        let mut user = User {
            id: UserId::new(),
            name: DisplayName::new("Ada".to_string()).unwrap(),
            username: Username::new("ada".to_string()).unwrap(),
            email: None,
            password_hash: "$argon2id$old".to_string(),
            created_at: now,
            updated_at: now,
        };

        let later = now + chrono::Duration::seconds(5);
        UserChanges {
            email: Some(EmailAddress::new("ada@example.com".to_string()).unwrap()),
            password_hash: Some("$argon2id$new".to_string()),
            ..Default::default()
        }
        .apply_to(&mut user, later);

        assert_eq!(user.username.as_str(), "ada");
        assert_eq!(user.email.unwrap().as_str(), "ada@example.com");
        assert_eq!(user.password_hash, "$argon2id$new");
        assert_eq!(user.updated_at, later);
        assert!(UserChanges::default().is_empty());
    }
}

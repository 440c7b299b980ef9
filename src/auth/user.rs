//! # Users
//!
//! User model and repository for dashboard accounts.

use std::fmt;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::crypto::{hash_password, verify_password, PasswordPolicy};
use super::errors::{AuthError, AuthResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,

    /// Unique, case-sensitive
    pub username: String,

    /// Argon2id password hash (never plaintext)
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role: Role,

    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a user with the default role
    pub fn new(username: impl Into<String>, password: &str, policy: &PasswordPolicy) -> AuthResult<Self> {
        let username: String = username.into();
        let username = username.trim().to_string();
        if username.is_empty() {
            return Err(AuthError::MissingUsername);
        }

        policy.validate(password)?;
        let password_hash = hash_password(password)?;

        Ok(Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            role: Role::User,
            created_at: Utc::now(),
        })
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Verify a password against this user's stored hash
    pub fn verify_password(&self, password: &str) -> AuthResult<bool> {
        verify_password(password, &self.password_hash)
    }
}

/// Signup request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// User repository trait
///
/// Abstracts storage operations for users.
pub trait UserRepository: Send + Sync {
    fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>>;

    fn find_by_username(&self, username: &str) -> AuthResult<Option<User>>;

    fn username_exists(&self, username: &str) -> AuthResult<bool>;

    /// Fails with [`AuthError::UsernameTaken`] on a duplicate username
    fn create(&self, user: &User) -> AuthResult<()>;

    fn delete(&self, id: Uuid) -> AuthResult<()>;
}

/// In-memory user repository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> AuthError {
    AuthError::StorageError("Lock poisoned".to_string())
}

impl UserRepository for InMemoryUserRepository {
    fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    fn find_by_username(&self, username: &str) -> AuthResult<Option<User>> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    fn username_exists(&self, username: &str) -> AuthResult<bool> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.iter().any(|u| u.username == username))
    }

    fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().map_err(poisoned)?;

        if users.iter().any(|u| u.username == user.username) {
            return Err(AuthError::UsernameTaken);
        }

        users.push(user.clone());
        Ok(())
    }

    fn delete(&self, id: Uuid) -> AuthResult<()> {
        let mut users = self.users.write().map_err(poisoned)?;

        let len_before = users.len();
        users.retain(|u| u.id != id);

        if users.len() == len_before {
            Err(AuthError::UserNotFound)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn farmer() -> User {
        User::new("farmer", "password123", &PasswordPolicy::default()).unwrap()
    }

    #[test]
    fn test_user_creation() {
        let user = farmer();
        assert_eq!(user.username, "farmer");
        assert_eq!(user.role, Role::User);
        assert_ne!(user.password_hash, "password123");
        assert!(user.verify_password("password123").unwrap());
        assert!(!user.verify_password("wrong_password").unwrap());
    }

    #[test]
    fn test_blank_username_rejected() {
        let result = User::new("   ", "password123", &PasswordPolicy::default());
        assert!(matches!(result, Err(AuthError::MissingUsername)));
    }

    #[test]
    fn test_weak_password_rejected() {
        let result = User::new("farmer", "abc", &PasswordPolicy::default());
        assert!(matches!(result, Err(AuthError::WeakPassword(_))));
    }

    #[test]
    fn test_in_memory_repository() {
        let repo = InMemoryUserRepository::new();
        let user = farmer();
        let user_id = user.id;

        repo.create(&user).unwrap();
        assert!(repo.find_by_id(user_id).unwrap().is_some());
        assert!(repo.find_by_username("farmer").unwrap().is_some());
        assert!(repo.username_exists("farmer").unwrap());
        assert!(!repo.username_exists("Farmer").unwrap());

        assert_eq!(repo.create(&farmer()), Err(AuthError::UsernameTaken));

        repo.delete(user_id).unwrap();
        assert!(repo.find_by_id(user_id).unwrap().is_none());
        assert_eq!(repo.delete(user_id), Err(AuthError::UserNotFound));
    }

    #[test]
    fn test_user_serialization_omits_password() {
        let user = farmer().with_role(Role::Admin);
        let json = serde_json::to_value(&user).unwrap();

        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains(&user.password_hash));
        assert_eq!(json["role"], "admin");
        assert!(json.get("createdAt").is_some());
    }
}

//! # Auth Service
//!
//! Signup, login, token authentication and account deletion on top of a
//! [`UserRepository`] and a [`JwtManager`].

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use super::crypto::PasswordPolicy;
use super::errors::{AuthError, AuthResult};
use super::jwt::{JwtClaims, JwtConfig, JwtManager};
use super::user::{LoginRequest, Role, SignupRequest, User, UserRepository};
use crate::observability::{log_event_with_fields, Event};

/// Public view of a user in auth responses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// A freshly issued token and the user it belongs to
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: UserSummary,
}

pub struct AuthService<U: UserRepository> {
    user_repo: Arc<U>,
    jwt_manager: JwtManager,
    password_policy: PasswordPolicy,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(user_repo: U, jwt_config: JwtConfig, password_policy: PasswordPolicy) -> Self {
        Self {
            user_repo: Arc::new(user_repo),
            jwt_manager: JwtManager::new(jwt_config),
            password_policy,
        }
    }

    /// Register a new user and issue a token
    pub fn signup(&self, request: SignupRequest) -> AuthResult<Session> {
        let username = request.username.trim();
        if username.is_empty() {
            return Err(AuthError::MissingUsername);
        }
        if self.user_repo.username_exists(username)? {
            return Err(AuthError::UsernameTaken);
        }

        let user = User::new(username, &request.password, &self.password_policy)?;
        self.user_repo.create(&user)?;

        log_event_with_fields(Event::AuthSignup, &[("username", user.username.as_str())]);
        self.issue(&user)
    }

    /// Check credentials and issue a token
    ///
    /// Unknown users and wrong passwords fail identically.
    pub fn login(&self, request: LoginRequest) -> AuthResult<Session> {
        let user = match self.user_repo.find_by_username(request.username.trim())? {
            Some(user) if user.verify_password(&request.password)? => user,
            _ => {
                log_event_with_fields(Event::AuthRejected, &[("reason", "invalid credentials")]);
                return Err(AuthError::InvalidCredentials);
            }
        };

        log_event_with_fields(Event::AuthLogin, &[("username", user.username.as_str())]);
        self.issue(&user)
    }

    /// Validate a token and load its user
    ///
    /// A well-formed token whose user has since been deleted is rejected.
    pub fn authenticate(&self, token: &str) -> AuthResult<(JwtClaims, User)> {
        let claims = self.jwt_manager.validate_token(token).map_err(|e| {
            log_event_with_fields(Event::AuthRejected, &[("reason", e.to_string().as_str())]);
            e
        })?;
        let user = self
            .user_repo
            .find_by_id(claims.id)?
            .ok_or(AuthError::UserNotFound)?;
        Ok((claims, user))
    }

    pub fn delete_account(&self, user_id: Uuid) -> AuthResult<()> {
        self.user_repo.delete(user_id)?;
        log_event_with_fields(Event::AccountDeleted, &[("user_id", user_id.to_string().as_str())]);
        Ok(())
    }

    fn issue(&self, user: &User) -> AuthResult<Session> {
        Ok(Session {
            token: self.jwt_manager.generate_token(user)?,
            user: UserSummary::from(user),
        })
    }
}

//! # Auth Errors
//!
//! Error types for the authentication module.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    // ==================
    // Signup / Login
    // ==================

    /// Unknown username or wrong password; deliberately indistinguishable
    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Username is required")]
    MissingUsername,

    #[error("Password does not meet requirements: {0}")]
    WeakPassword(String),

    // ==================
    // Tokens
    // ==================

    #[error("No token provided")]
    MissingToken,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token was valid but its user no longer exists
    #[error("User not found")]
    UserNotFound,

    // ==================
    // Internal Errors
    // ==================

    #[error("Internal error: password hashing failed")]
    HashingFailed,

    #[error("Internal error: token generation failed")]
    TokenGenerationFailed,

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            AuthError::UsernameTaken => 400,
            AuthError::MissingUsername => 400,
            AuthError::WeakPassword(_) => 400,

            // 401 Unauthorized
            AuthError::InvalidCredentials => 401,
            AuthError::MissingToken => 401,
            AuthError::MalformedToken => 401,
            AuthError::TokenExpired => 401,
            AuthError::InvalidSignature => 401,
            AuthError::UserNotFound => 401,

            // 500 Internal Server Error
            AuthError::HashingFailed => 500,
            AuthError::TokenGenerationFailed => 500,
            AuthError::StorageError(_) => 500,
        }
    }

    /// Returns whether this error should be logged at warn level
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthError::UsernameTaken.status_code(), 400);
        assert_eq!(AuthError::TokenExpired.status_code(), 401);
        assert_eq!(AuthError::HashingFailed.status_code(), 500);
        assert!(!AuthError::StorageError("x".into()).is_client_error());
    }

    #[test]
    fn test_login_failure_does_not_leak_which_part_was_wrong() {
        let err = AuthError::InvalidCredentials;
        assert_eq!(err.to_string(), "Incorrect username or password");
    }
}

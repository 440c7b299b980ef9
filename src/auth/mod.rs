//! # Auth Module
//!
//! Username/password accounts with Argon2id hashes and HS256 bearer
//! tokens. Mutating data routes require a valid token.

pub mod crypto;
pub mod errors;
pub mod jwt;
pub mod service;
pub mod user;

pub use crypto::PasswordPolicy;
pub use errors::{AuthError, AuthResult};
pub use jwt::{bearer_token, JwtClaims, JwtConfig, JwtManager};
pub use service::{AuthService, Session, UserSummary};
pub use user::{InMemoryUserRepository, LoginRequest, Role, SignupRequest, User, UserRepository};

//! Auth HTTP Routes
//!
//! Signup, login and token-protected account endpoints on top of the
//! shared [`AuthService`](crate::auth::AuthService).

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use super::errors::{ApiError, ApiResult};
use super::state::AppState;
use crate::auth::{LoginRequest, Session, SignupRequest, User, UserSummary};

/// Auth routes with shared state
pub fn auth_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/signup", post(signup_handler))
        .route("/login", post(login_handler))
        .route("/profile", get(profile_handler))
        .route("/verify-token", get(verify_token_handler))
        .route("/delete-account", delete(delete_account_handler))
        .with_state(state)
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub token: String,
    pub user: UserSummary,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            success: true,
            token: session.token,
            user: session.user,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUser {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for ProfileUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: ProfileUser,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub message: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

/// Parse a JSON request body, keeping malformed input on the JSON error path
fn parse_request<T: DeserializeOwned>(body: &Bytes) -> ApiResult<T> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))
}

// ==================
// Handlers
// ==================

async fn signup_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    let request: SignupRequest = parse_request(&body)?;
    let session = state.auth.signup(request)?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

async fn login_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<SessionResponse>> {
    let request: LoginRequest = parse_request(&body)?;
    let session = state.auth.login(request)?;
    Ok(Json(session.into()))
}

async fn profile_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<ProfileResponse>> {
    let (_, user) = state.authorize(&headers)?;
    Ok(Json(ProfileResponse {
        success: true,
        user: ProfileUser::from(&user),
    }))
}

async fn verify_token_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<VerifyResponse>> {
    let (_, user) = state.authorize(&headers)?;
    Ok(Json(VerifyResponse {
        success: true,
        message: "Token is valid".to_string(),
        user: UserSummary::from(&user),
    }))
}

async fn delete_account_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<StatusResponse>> {
    let (_, user) = state.authorize(&headers)?;
    state.auth.delete_account(user.id)?;
    Ok(Json(StatusResponse {
        success: true,
        message: "Account deleted successfully".to_string(),
    }))
}

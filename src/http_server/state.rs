//! Shared handler state

use std::sync::Arc;

use axum::http::{header, HeaderMap};

use super::errors::ApiResult;
use crate::auth::{bearer_token, AuthService, InMemoryUserRepository, JwtClaims, User};
use crate::config::{AppConfig, IngestionConfig};
use crate::observability::{log_event_with_fields, Event};
use crate::records::{InMemoryRecordStore, JsonFileRecordStore, RecordStore, StoreResult};
use crate::sources::Ingestor;

/// Everything a handler can reach
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub ingestor: Ingestor,
    pub auth: AuthService<InMemoryUserRepository>,
    pub ingestion: IngestionConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecordStore>,
        ingestor: Ingestor,
        auth: AuthService<InMemoryUserRepository>,
        ingestion: IngestionConfig,
    ) -> Self {
        Self {
            store,
            ingestor,
            auth,
            ingestion,
        }
    }

    /// Open the configured store and wire the standard sources
    pub fn from_config(config: &AppConfig) -> StoreResult<Self> {
        let store = open_store(config)?;
        let ingestor = Ingestor::standard(config.ingestion.source_config());
        let auth = AuthService::new(
            InMemoryUserRepository::new(),
            config.auth.jwt_config(),
            config.auth.password_policy(),
        );
        Ok(Self::new(store, ingestor, auth, config.ingestion.clone()))
    }

    /// Resolve the bearer token in `headers` to a live user
    pub fn authorize(&self, headers: &HeaderMap) -> ApiResult<(JwtClaims, User)> {
        let header = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let token = bearer_token(header)?;
        Ok(self.auth.authenticate(token)?)
    }
}

/// Open the record store named by the config
///
/// No data file means an in-memory store.
pub fn open_store(config: &AppConfig) -> StoreResult<Arc<dyn RecordStore>> {
    match &config.store.data_file {
        Some(path) => {
            let store = JsonFileRecordStore::open(path).map_err(|e| {
                log_event_with_fields(
                    Event::StoreOpenFailed,
                    &[
                        ("path", path.display().to_string().as_str()),
                        ("error", e.to_string().as_str()),
                    ],
                );
                e
            })?;
            log_event_with_fields(
                Event::StoreOpened,
                &[
                    ("kind", "file"),
                    ("path", store.path().display().to_string().as_str()),
                    ("records", store.len()?.to_string().as_str()),
                ],
            );
            Ok(Arc::new(store))
        }
        None => {
            log_event_with_fields(Event::StoreOpened, &[("kind", "memory")]);
            Ok(Arc::new(InMemoryRecordStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SignupRequest;
    use axum::http::HeaderValue;

    #[test]
    fn test_memory_store_by_default() {
        let state = AppState::from_config(&AppConfig::default()).unwrap();
        assert!(state.store.is_empty().unwrap());
        assert_eq!(state.ingestor.keys().count(), 3);
    }

    #[test]
    fn test_file_store_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.store.data_file = Some(dir.path().join("records.json"));
        let state = AppState::from_config(&config).unwrap();
        assert!(state.store.is_empty().unwrap());
    }

    #[test]
    fn test_authorize() {
        let state = AppState::from_config(&AppConfig::default()).unwrap();
        let session = state
            .auth
            .signup(SignupRequest {
                username: "farmer".into(),
                password: "secret1".into(),
            })
            .unwrap();

        let mut headers = HeaderMap::new();
        assert!(state.authorize(&headers).is_err());

        let value = format!("Bearer {}", session.token);
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&value).unwrap());
        let (claims, user) = state.authorize(&headers).unwrap();
        assert_eq!(claims.username, "farmer");
        assert_eq!(user.id, session.user.id);
    }
}

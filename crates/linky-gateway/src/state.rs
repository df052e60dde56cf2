use crate::auth::{bearer_token, secret_matches, super_secret};
use crate::error::{AppError, Result};
use axum::http::HeaderMap;
use linky_engine::LinkEngine;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct AppState {
    engine: Arc<dyn LinkEngine>,
    api_key: Option<Arc<str>>,
    super_secret: Option<Arc<str>>,
}

impl AppState {
    /// Creates a state with no API key, which disables every `/api` route.
    pub fn new(engine: Arc<dyn LinkEngine>) -> Self {
        Self {
            engine,
            api_key: None,
            super_secret: None,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = non_empty(api_key);
        self
    }

    /// Sets the privileged secret. Without one, the secret kept under the
    /// store's reserved key is used instead.
    pub fn with_super_secret(mut self, super_secret: Option<String>) -> Self {
        self.super_secret = non_empty(super_secret);
        self
    }

    pub fn engine(&self) -> &dyn LinkEngine {
        self.engine.as_ref()
    }

    /// Checks the API key on an administrative request.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<()> {
        let Some(expected) = self.api_key.as_deref() else {
            debug!("Rejected API call: no API key configured");
            return Err(AppError::Unauthorized);
        };

        match bearer_token(headers) {
            Some(presented) if secret_matches(expected, presented) => Ok(()),
            _ => Err(AppError::Unauthorized),
        }
    }

    /// Whether the request carries the privileged secret.
    pub async fn is_privileged(&self, headers: &HeaderMap) -> Result<bool> {
        let Some(presented) = super_secret(headers) else {
            return Ok(false);
        };

        let expected = match self.super_secret.as_deref() {
            Some(configured) => configured.to_string(),
            None => match self.engine.stored_secret().await? {
                Some(stored) => stored,
                None => return Ok(false),
            },
        };

        Ok(secret_matches(&expected, presented))
    }
}

fn non_empty(value: Option<String>) -> Option<Arc<str>> {
    value.filter(|value| !value.is_empty()).map(Arc::from)
}

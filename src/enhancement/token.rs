use std::time::{Duration, Instant};
use log::{debug, error, info};
use reqwest::{header, Client, StatusCode};
use tokio::sync::Mutex;

use crate::app_config::{ApiConfig, CredentialsConfig};
use crate::enhancement::models::{TokenRequest, TokenResponse};
use crate::enhancement::service_url;
use crate::errors::EnhancementError;

const GRANT_TYPE: &str = "client_credentials";

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    /// None when the identity endpoint did not report a lifetime
    expires_at: Option<Instant>,
}

impl CachedToken {
    fn is_expired(&self, margin: Duration) -> bool {
        match self.expires_at {
            Some(expires_at) => Instant::now() + margin >= expires_at,
            None => false,
        }
    }
}

/// Lazily acquires and caches the bearer token of one client.
///
/// The exchange runs on first use and again only after `reset` or once a
/// token with a reported lifetime has expired. Callers of the same manager
/// wait on each other, so concurrent first calls exchange credentials once.
#[derive(Debug)]
pub struct TokenManager {
    credentials: CredentialsConfig,
    slot: Mutex<Option<CachedToken>>,
}

impl TokenManager {
    pub fn new(credentials: CredentialsConfig) -> Self {
        Self {
            credentials,
            slot: Mutex::new(None),
        }
    }

    /// Return the cached token, exchanging credentials first when needed
    pub async fn get_token(&self, http: &Client, api: &ApiConfig) -> Result<String, EnhancementError> {
        let mut slot = self.slot.lock().await;

        if let Some(token) = slot.as_ref() {
            if !token.is_expired(api.token_expiry_margin()) {
                return Ok(token.value.clone());
            }
            debug!("Cached token expired, requesting a new one");
        }

        let token = self.exchange(http, api).await?;
        let value = token.value.clone();
        *slot = Some(token);
        Ok(value)
    }

    /// Forget the cached token
    pub async fn reset(&self) {
        *self.slot.lock().await = None;
    }

    /// Forget the cached token only if it is still `stale`, so a token another
    /// caller already refreshed is kept
    pub async fn invalidate(&self, stale: &str) {
        let mut slot = self.slot.lock().await;
        if slot.as_ref().is_some_and(|token| token.value == stale) {
            *slot = None;
        }
    }

    /// Whether a token is currently cached
    pub async fn has_token(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    async fn exchange(&self, http: &Client, api: &ApiConfig) -> Result<CachedToken, EnhancementError> {
        let url = service_url(api, &["token"])?;
        let body = TokenRequest {
            grant_type: GRANT_TYPE,
            client_id: &self.credentials.client_id,
            client_secret: &self.credentials.client_secret,
        };

        let response = http
            .post(url)
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Token request failed: {}", e);
                EnhancementError::Transport(e.to_string())
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = response.text().await.unwrap_or_default();
            error!("Token endpoint error ({}): {}", status, message);
            return Err(EnhancementError::Authentication(format!(
                "token endpoint answered {}",
                status.as_u16()
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            EnhancementError::Authentication(format!("invalid token response: {}", e))
        })?;

        info!("Obtained access token for client {}", self.credentials.client_id);
        Ok(CachedToken {
            value: token.access_token,
            expires_at: token
                .expires_in
                .map(|secs| Instant::now() + Duration::from_secs(secs)),
        })
    }
}

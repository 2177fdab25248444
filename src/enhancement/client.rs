use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::{header, Client, RequestBuilder, StatusCode};
use serde_json::Value;
use url::Url;

use crate::app_config::{ApiConfig, CredentialsConfig};
use crate::catalog::DisciplineCatalog;
use crate::enhancement::extract::try_extract_json;
use crate::enhancement::models::EnhancementRequest;
use crate::enhancement::token::TokenManager;
use crate::enhancement::{service_url, EnhancementApi};
use crate::errors::EnhancementError;

/// Client for the enhancement REST API
///
/// Each client owns its token cache; clients built from the same
/// configuration share nothing.
#[derive(Debug)]
pub struct EnhancementClient {
    /// HTTP client for API requests
    http: Client,
    /// Service location and behaviour
    api: ApiConfig,
    /// Bearer token cache
    tokens: TokenManager,
}

impl EnhancementClient {
    /// Create a new client. No timeout is applied unless `api.timeout_secs` is set.
    pub fn new(api: ApiConfig, credentials: CredentialsConfig) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = api.timeout() {
            builder = builder.timeout(timeout);
        }

        Self {
            http: builder.build().unwrap_or_default(),
            api,
            tokens: TokenManager::new(credentials),
        }
    }

    /// Current bearer token, exchanging credentials if none is cached
    pub async fn get_token(&self) -> Result<String, EnhancementError> {
        self.tokens.get_token(&self.http, &self.api).await
    }

    /// Drop the cached token so the next call exchanges credentials again
    pub async fn reset_token(&self) {
        self.tokens.reset().await;
    }

    /// Whether a bearer token is currently cached
    pub async fn has_token(&self) -> bool {
        self.tokens.has_token().await
    }

    /// `{base}/{version}/enhancements/{segments...}`
    ///
    /// The version may span several path segments (`api/v2`).
    fn enhancements_url(&self, segments: &[&str]) -> Result<Url, EnhancementError> {
        let mut all: Vec<&str> = self
            .api
            .api_version
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        all.push("enhancements");
        all.extend_from_slice(segments);
        service_url(&self.api, &all)
    }

    /// Send an authenticated request and return the body of an HTTP 200.
    ///
    /// `build` is called once per attempt. On 401 the rejected token is dropped
    /// and the request is sent once more when `refresh_on_unauthorized` is set.
    async fn execute<F>(&self, build: F) -> Result<String, EnhancementError>
    where
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        let token = self.get_token().await?;
        match self.send_once(&build, &token).await {
            Err(EnhancementError::HttpStatus { status_code: 401, .. })
                if self.api.refresh_on_unauthorized =>
            {
                warn!("Enhancement API answered 401, refreshing the token and retrying once");
                self.tokens.invalidate(&token).await;
                let token = self.get_token().await?;
                self.send_once(&build, &token).await
            }
            other => other,
        }
    }

    async fn send_once<F>(&self, build: &F, token: &str) -> Result<String, EnhancementError>
    where
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        let response = build()
            .header(header::ACCEPT, "application/json")
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                error!("Request Exception: {}", e);
                EnhancementError::Transport(e.to_string())
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Enhancement API error ({}): {}", status, message);
            return Err(EnhancementError::HttpStatus {
                status_code: status.as_u16(),
                message,
            });
        }

        Ok(response.text().await?)
    }

    /// Shared read path
    async fn get_json(&self, url: Url) -> Result<Value, EnhancementError> {
        debug!("GET {}", url);
        let body = self.execute(|| self.http.get(url.clone())).await?;
        serde_json::from_str(&body).map_err(|e| EnhancementError::Decode(e.to_string()))
    }
}

#[async_trait]
impl EnhancementApi for EnhancementClient {
    async fn list_enhancements(&self) -> Result<Value, EnhancementError> {
        let url = self.enhancements_url(&[])?;
        self.get_json(url).await
    }

    async fn get_enhancement(&self, enhancement_id: &str) -> Result<Value, EnhancementError> {
        let url = self.enhancements_url(&[enhancement_id])?;
        self.get_json(url).await
    }

    async fn create_from_url(
        &self,
        request: &EnhancementRequest,
        catalog: &dyn DisciplineCatalog,
    ) -> Result<Option<Value>, EnhancementError> {
        let disciplines = catalog.titles();
        if disciplines.is_empty() {
            return Err(EnhancementError::NoDisciplineConfigured);
        }

        let url = self.enhancements_url(&["url"])?;
        let body = request.to_body(disciplines);
        debug!("POST {} for {}", url, request.source_url);

        let text = self
            .execute(|| self.http.post(url.clone()).json(&body))
            .await?;

        if text.is_empty() {
            return Ok(None);
        }
        try_extract_json(&text).map(Some)
    }

    async fn get_latest_version(&self, enhancement_id: &str) -> Result<Value, EnhancementError> {
        let url = self.enhancements_url(&[enhancement_id, "versions", "latest"])?;
        self.get_json(url).await
    }

    async fn list_versions(
        &self,
        enhancement_id: &str,
        with_transcript: bool,
    ) -> Result<Value, EnhancementError> {
        let mut url = self.enhancements_url(&[enhancement_id, "versions"])?;
        url.query_pairs_mut()
            .append_pair("withTranscript", if with_transcript { "True" } else { "False" });
        self.get_json(url).await
    }

    async fn get_version(
        &self,
        enhancement_id: &str,
        version_id: &str,
    ) -> Result<Value, EnhancementError> {
        let url = self.enhancements_url(&[enhancement_id, "versions", version_id])?;
        self.get_json(url).await
    }
}

/*!
 * Client for the remote AI enhancement service.
 *
 * - `token`: client-credentials exchange and bearer token cache
 * - `client`: REST façade over the enhancement endpoints
 * - `extract`: recovery of a JSON object from a noisy response body
 * - `models`: request and response bodies
 */

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::app_config::ApiConfig;
use crate::catalog::DisciplineCatalog;
use crate::errors::EnhancementError;

pub mod client;
pub mod extract;
pub mod models;
pub mod token;

pub use client::EnhancementClient;
pub use models::EnhancementRequest;

/// Operations offered by the enhancement service
///
/// Every call authenticates with the cached bearer token. Reads answer the
/// decoded JSON body of an HTTP 200 and fail with a typed error otherwise.
#[async_trait]
pub trait EnhancementApi: Send + Sync {
    /// `GET /{version}/enhancements`
    async fn list_enhancements(&self) -> Result<Value, EnhancementError>;

    /// `GET /{version}/enhancements/{id}`
    async fn get_enhancement(&self, enhancement_id: &str) -> Result<Value, EnhancementError>;

    /// `POST /{version}/enhancements/url`
    ///
    /// Every discipline of `catalog` is sent along. Fails with
    /// `NoDisciplineConfigured` before touching the network when the catalog
    /// is empty. Answers `None` when the service replies 200 with no body.
    async fn create_from_url(
        &self,
        request: &EnhancementRequest,
        catalog: &dyn DisciplineCatalog,
    ) -> Result<Option<Value>, EnhancementError>;

    /// `GET /{version}/enhancements/{id}/versions/latest`
    async fn get_latest_version(&self, enhancement_id: &str) -> Result<Value, EnhancementError>;

    /// `GET /{version}/enhancements/{id}/versions?withTranscript=...`
    async fn list_versions(
        &self,
        enhancement_id: &str,
        with_transcript: bool,
    ) -> Result<Value, EnhancementError>;

    /// `GET /{version}/enhancements/{id}/versions/{version_id}`
    async fn get_version(
        &self,
        enhancement_id: &str,
        version_id: &str,
    ) -> Result<Value, EnhancementError>;
}

/// Build `{base_url}/{segments...}`, percent-encoding each segment
pub(crate) fn service_url(api: &ApiConfig, segments: &[&str]) -> Result<Url, EnhancementError> {
    let mut url = Url::parse(api.trimmed_base_url())
        .map_err(|e| EnhancementError::InvalidUrl(format!("{}: {}", api.base_url, e)))?;

    url.path_segments_mut()
        .map_err(|_| EnhancementError::InvalidUrl(format!("{} cannot be a base URL", api.base_url)))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

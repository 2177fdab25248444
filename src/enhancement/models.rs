use serde::{Deserialize, Serialize};

/// Caller-supplied part of a creation request
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancementRequest {
    /// Publicly reachable media URL
    pub source_url: String,
    /// Media types the service should process (e.g. "video/mp4"), in the
    /// order they were added, without duplicates
    pub media_types: Vec<String>,
    /// Identifier of the end user on whose behalf the request is made
    pub end_user_identifier: String,
    /// Webhook the service calls once the enhancement is ready
    pub notification_webhook_url: String,
}

impl EnhancementRequest {
    pub fn new(
        source_url: impl Into<String>,
        end_user_identifier: impl Into<String>,
        notification_webhook_url: impl Into<String>,
    ) -> Self {
        Self {
            source_url: source_url.into(),
            media_types: Vec::new(),
            end_user_identifier: end_user_identifier.into(),
            notification_webhook_url: notification_webhook_url.into(),
        }
    }

    /// Add a media type; repeats are ignored
    pub fn media_type(mut self, media_type: impl Into<String>) -> Self {
        let media_type = media_type.into();
        if !self.media_types.contains(&media_type) {
            self.media_types.push(media_type);
        }
        self
    }

    /// Wire body for `POST /enhancements/url`
    pub fn to_body(&self, disciplines: Vec<String>) -> CreateEnhancementBody {
        CreateEnhancementBody {
            url: self.source_url.clone(),
            notification_webhook_url: self.notification_webhook_url.clone(),
            enhancement_parameters: EnhancementParameters {
                media_types: self.media_types.clone(),
                disciplines,
            },
            enduser_identifier: self.end_user_identifier.clone(),
        }
    }
}

/// Body of the creation request
#[derive(Debug, Serialize)]
pub struct CreateEnhancementBody {
    pub url: String,
    #[serde(rename = "notificationWebhookUrl")]
    pub notification_webhook_url: String,
    #[serde(rename = "enhancementParameters")]
    pub enhancement_parameters: EnhancementParameters,
    #[serde(rename = "enduserIdentifier")]
    pub enduser_identifier: String,
}

#[derive(Debug, Serialize)]
pub struct EnhancementParameters {
    #[serde(rename = "mediaTypes")]
    pub media_types: Vec<String>,
    pub disciplines: Vec<String>,
}

/// Body of the client-credentials exchange
#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    pub grant_type: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

/// Identity endpoint answer
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Lifetime in seconds, when the service reports one
    #[serde(default)]
    pub expires_in: Option<u64>,
}

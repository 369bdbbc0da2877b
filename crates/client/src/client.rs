//! HTTP client for the gateway.

use {
    aistudio_protocol::{
        API_HEALTH_PATH, BackendHealth, ErrorBody, WEBHOOK_HEALTH_PATH, WebhookHealth,
        WebhookRequest, channels, legacy_path, messages, webhook_path,
    },
    reqwest::StatusCode,
    serde_json::Value,
    tracing::debug,
};

use crate::{
    error::{ClientError, Result},
    normalize::{extract_audio_file, extract_image_url},
};

pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:5000";

/// Check that `pin` is exactly six ASCII digits.
///
/// This runs before any request is sent and is independent of whatever the
/// gateway accepts.
pub fn check_pin_format(pin: &str) -> Result<()> {
    if pin.len() == 6 && pin.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ClientError::InvalidPinFormat)
    }
}

#[derive(Debug, Clone)]
pub struct GatewayClient {
    base_url: String,
    http: reqwest::Client,
}

impl Default for GatewayClient {
    fn default() -> Self {
        Self::new(DEFAULT_GATEWAY_URL)
    }
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate social media posts from a URL or text. Requires the PIN.
    pub async fn social_media(&self, text: &str, pin: &str) -> Result<Value> {
        check_pin_format(pin)?;
        let request = WebhookRequest::new(text).with_pin(pin);
        match self
            .post(&webhook_path(channels::SOCIAL_MEDIA), &request)
            .await
        {
            Err(ClientError::Rejected { status, body })
                if status == StatusCode::UNAUTHORIZED.as_u16()
                    || status == StatusCode::FORBIDDEN.as_u16() =>
            {
                let body = if body.message.is_some() {
                    body
                } else {
                    body.with_message(messages::PIN_INVALID)
                };
                Err(ClientError::Rejected { status, body })
            },
            other => other,
        }
    }

    /// Generate a podcast episode and return the audio file URL.
    pub async fn podcast(&self, topic: &str) -> Result<String> {
        let body = self
            .post(&legacy_path(channels::PODCAST), &WebhookRequest::new(topic))
            .await?;
        extract_audio_file(&body)
    }

    /// Generate a thumbnail and return the image URL.
    pub async fn thumbnail(&self, prompt: &str) -> Result<String> {
        let body = self
            .post(&legacy_path(channels::THUMBNAIL), &WebhookRequest::new(prompt))
            .await?;
        extract_image_url(&body)
    }

    pub async fn health(&self) -> Result<BackendHealth> {
        let resp = self
            .http
            .get(self.url(API_HEALTH_PATH))
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json().await?)
    }

    pub async fn webhook_health(&self) -> Result<WebhookHealth> {
        let resp = self
            .http
            .get(self.url(WEBHOOK_HEALTH_PATH))
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json().await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post(&self, path: &str, request: &WebhookRequest) -> Result<Value> {
        debug!(path, "posting to gateway");
        let resp = self.http.post(self.url(path)).json(request).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let body = serde_json::from_str::<ErrorBody>(&text)
                .unwrap_or_else(|_| ErrorBody::new(messages::GENERIC_FAILURE).with_details(text));
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&text).map_err(|_| ClientError::Rejected {
            status: status.as_u16(),
            body: ErrorBody::new(messages::GENERIC_FAILURE)
                .with_details("gateway returned a non-JSON body"),
        })
    }
}

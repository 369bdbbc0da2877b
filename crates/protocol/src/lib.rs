//! HTTP wire contract shared by the gateway and its callers.
//!
//! All bodies are JSON. Request bodies carry the prompt text (and, for the
//! PIN-protected channel, the PIN). Error bodies use a single shape so the
//! calling side can render any failure the same way.

use serde::{Deserialize, Serialize};

// ── Routes ───────────────────────────────────────────────────────────────────

pub const API_HEALTH_PATH: &str = "/api/health";
pub const WEBHOOK_HEALTH_PATH: &str = "/api/webhook/health";
pub const WEBHOOK_PREFIX: &str = "/api/webhook";

/// Pre-`/api/webhook` paths still served for older frontends. Each one
/// forwards to `/api/webhook/<name>` unchanged.
pub const LEGACY_ALIASES: &[&str] = &["social-media", "podcast", "thumbnail"];

/// Canonical proxy path for a channel.
#[must_use]
pub fn webhook_path(channel: &str) -> String {
    format!("{WEBHOOK_PREFIX}/{channel}")
}

/// Legacy alias path for a channel.
#[must_use]
pub fn legacy_path(channel: &str) -> String {
    format!("/api/{channel}")
}

// ── Well-known channels ─────────────────────────────────────────────────────

pub mod channels {
    pub const SOCIAL_MEDIA: &str = "social-media";
    pub const PODCAST: &str = "podcast";
    pub const THUMBNAIL: &str = "thumbnail";
}

// ── Messages ─────────────────────────────────────────────────────────────────

pub mod messages {
    pub const TEXT_REQUIRED: &str = "Text is required";
    pub const AUTH_FAILED: &str = "Authentication failed";
    pub const PIN_REQUIRED: &str = "PIN is required";
    pub const PIN_INVALID: &str = "Invalid PIN. Please try again.";
    pub const INVALID_WEBHOOK_TYPE: &str = "Invalid webhook type";
    pub const VALIDATION_ERROR: &str = "Validation error";
    pub const ROUTE_NOT_FOUND: &str = "Route not found";
    pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";
    pub const INTERNAL_ERROR: &str = "Internal server error";
    pub const WEBHOOK_HEALTHY: &str = "Webhook service is healthy";
    pub const BACKEND_HEALTHY: &str = "Backend server is healthy";
}

// ── Bodies ───────────────────────────────────────────────────────────────────

/// Body accepted by every proxy route.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
}

impl WebhookRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pin: None,
        }
    }

    #[must_use]
    pub fn with_pin(mut self, pin: impl Into<String>) -> Self {
        self.pin = Some(pin.into());
        self
    }
}

/// Uniform error body returned for every non-2xx gateway response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(
        default,
        rename = "requiresAuth",
        skip_serializing_if = "Option::is_none"
    )]
    pub requires_auth: Option<bool>,
    /// Only set on 404 responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            details: None,
            requires_auth: None,
            path: None,
            method: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    #[must_use]
    pub fn requiring_auth(mut self) -> Self {
        self.requires_auth = Some(true);
        self
    }

    #[must_use]
    pub fn for_route(mut self, method: impl Into<String>, path: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self.path = Some(path.into());
        self
    }
}

/// `GET /api/webhook/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookHealth {
    pub status: String,
    pub timestamp: String,
}

/// `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendHealth {
    pub status: String,
    pub environment: String,
    pub timestamp: String,
}

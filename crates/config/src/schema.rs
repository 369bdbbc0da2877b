/// Config schema types (server, cors, auth, channels).
use std::{collections::BTreeMap, fmt, str::FromStr};

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Placeholder frontend origin used until an operator sets `FRONTEND_URL`.
pub const DEFAULT_FRONTEND_URL: &str = "https://your-app.vercel.app";

/// Default request body limit (10 MiB).
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub auth: AuthConfig,
    /// Channel table keyed by channel name. A `[channels]` section in a
    /// config file replaces the built-in table entirely.
    pub channels: BTreeMap<String, ChannelEntry>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            cors: CorsConfig::default(),
            auth: AuthConfig::default(),
            channels: default_channels(),
        }
    }
}

/// Gateway server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "0.0.0.0".
    pub bind: String,
    /// Port to listen on. Defaults to 5000.
    pub port: u16,
    pub mode: RuntimeMode,
    /// Maximum accepted request body, in bytes.
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 5000,
            mode: RuntimeMode::default(),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

/// Runtime mode. Production narrows CORS and hides failure details.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    #[default]
    Development,
    Production,
}

impl RuntimeMode {
    #[must_use]
    pub fn is_production(self) -> bool {
        self == Self::Production
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuntimeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("unknown runtime mode: {other}")),
        }
    }
}

/// Cross-origin settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Trusted frontend origin, allowed in production mode.
    pub frontend_url: String,
    /// Additional origins allowed in production mode.
    pub extra_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            frontend_url: DEFAULT_FRONTEND_URL.into(),
            extra_origins: Vec::new(),
        }
    }
}

impl CorsConfig {
    /// Origins trusted in production mode, frontend first.
    #[must_use]
    pub fn production_origins(&self) -> Vec<String> {
        std::iter::once(self.frontend_url.clone())
            .chain(self.extra_origins.iter().cloned())
            .filter(|o| !o.trim().is_empty())
            .collect()
    }
}

/// Shared-secret settings for PIN-protected channels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Expected PIN. When absent, PIN-protected channels reject every
    /// request with a configuration error.
    #[serde(
        default,
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub pin: Option<Secret<String>>,
}

impl AuthConfig {
    #[must_use]
    pub fn has_pin(&self) -> bool {
        self.pin
            .as_ref()
            .is_some_and(|p| !p.expose_secret().is_empty())
    }
}

/// One upstream automation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEntry {
    pub url: String,
    #[serde(default)]
    pub description: String,
    /// Whether callers must present the shared PIN.
    #[serde(default)]
    pub requires_pin: bool,
    /// Hint returned alongside "Text is required".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ChannelEntry {
    pub fn new(url: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: description.into(),
            requires_pin: false,
            hint: None,
        }
    }

    #[must_use]
    pub fn with_pin(mut self) -> Self {
        self.requires_pin = true;
        self
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Built-in channel table.
pub fn default_channels() -> BTreeMap<String, ChannelEntry> {
    BTreeMap::from([
        (
            "social-media".to_string(),
            ChannelEntry::new(
                "https://workflow.ccbp.in/webhook-test/effd5adb-e750-4d4b-8fc9-03def3e32aa8",
                "Social Media Post Generator",
            )
            .with_pin()
            .with_hint("Please provide a URL or content text"),
        ),
        (
            "podcast".to_string(),
            ChannelEntry::new(
                "https://workflow.ccbp.in/webhook-test/aea3b229-b06c-454d-9b8c-4ecfd18c899f",
                "Podcast Generator",
            )
            .with_hint("Please provide a podcast topic"),
        ),
        (
            "thumbnail".to_string(),
            ChannelEntry::new(
                "https://workflow.ccbp.in/webhook-test/b0415874-6381-4d46-8a31-015828436686",
                "Thumbnail Generator",
            )
            .with_hint("Please provide a thumbnail description/prompt"),
        ),
    ])
}

// ── Serde helpers for Secret<String> ────────────────────────────────────────

fn serialize_option_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_three_channels() {
        let cfg = StudioConfig::default();
        assert_eq!(cfg.channels.len(), 3);
        assert!(cfg.channels["social-media"].requires_pin);
        assert!(!cfg.channels["podcast"].requires_pin);
        assert!(!cfg.channels["thumbnail"].requires_pin);
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.server.mode, RuntimeMode::Development);
    }

    #[test]
    fn runtime_mode_parses_loosely() {
        assert_eq!("PRODUCTION".parse::<RuntimeMode>(), Ok(RuntimeMode::Production));
        assert_eq!(" dev ".parse::<RuntimeMode>(), Ok(RuntimeMode::Development));
        assert!("staging".parse::<RuntimeMode>().is_err());
    }

    #[test]
    fn empty_pin_counts_as_unset() {
        let auth = AuthConfig {
            pin: Some(Secret::new(String::new())),
        };
        assert!(!auth.has_pin());
        assert!(!AuthConfig::default().has_pin());
    }

    #[test]
    fn production_origins_skip_blank_entries() {
        let cors = CorsConfig {
            frontend_url: "https://studio.example".into(),
            extra_origins: vec![" ".into(), "https://admin.example".into()],
        };
        assert_eq!(cors.production_origins(), vec![
            "https://studio.example".to_string(),
            "https://admin.example".to_string(),
        ]);
    }
}

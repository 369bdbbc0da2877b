//! Semantic validation of a resolved configuration.
//!
//! Nothing here prevents the gateway from starting: a PIN-protected channel
//! without a configured PIN still boots and fails per request. The report is
//! what `aistudio config check` prints.

use {secrecy::ExposeSecret, url::Url};

use crate::schema::{DEFAULT_FRONTEND_URL, StudioConfig};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Category: "channel", "auth", "cors", "server"
    pub category: &'static str,
    /// Dotted path, e.g. "channels.podcast.url"
    pub path: String,
    pub message: String,
}

/// Result of validating a configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    fn push(
        &mut self,
        severity: Severity,
        category: &'static str,
        path: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(Diagnostic {
            severity,
            category,
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Check a resolved config for operator mistakes.
pub fn validate(config: &StudioConfig) -> ValidationResult {
    let mut result = ValidationResult::default();

    if config.channels.is_empty() {
        result.push(
            Severity::Error,
            "channel",
            "channels",
            "no channels configured; every proxy request will be rejected",
        );
    }

    for (name, entry) in &config.channels {
        let path = format!("channels.{name}.url");
        match Url::parse(&entry.url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {},
            Ok(url) => result.push(
                Severity::Error,
                "channel",
                path,
                format!("unsupported scheme \"{}\"", url.scheme()),
            ),
            Err(e) => result.push(Severity::Error, "channel", path, format!("invalid url: {e}")),
        }

        if entry.requires_pin && !config.auth.has_pin() {
            result.push(
                Severity::Error,
                "auth",
                format!("channels.{name}.requires_pin"),
                "channel requires a PIN but auth.pin is not set (AISTUDIO_PIN)",
            );
        }
    }

    if let Some(pin) = config.auth.pin.as_ref().map(|p| p.expose_secret())
        && !pin.is_empty()
        && !(pin.len() == 6 && pin.bytes().all(|b| b.is_ascii_digit()))
    {
        result.push(
            Severity::Warning,
            "auth",
            "auth.pin",
            "PIN is not 6 digits; the web client only accepts 6-digit PINs",
        );
    }

    if config.server.mode.is_production() && config.cors.frontend_url == DEFAULT_FRONTEND_URL {
        result.push(
            Severity::Warning,
            "cors",
            "cors.frontend_url",
            "production mode with the placeholder frontend origin (set FRONTEND_URL)",
        );
    }

    for (i, origin) in config.cors.production_origins().iter().enumerate() {
        if Url::parse(origin).is_err() {
            result.push(
                Severity::Warning,
                "cors",
                format!("cors.origins[{i}]"),
                format!("\"{origin}\" is not a valid origin"),
            );
        }
    }

    if config.server.port == 0 {
        result.push(
            Severity::Info,
            "server",
            "server.port",
            "port 0 binds a random free port",
        );
    }

    result
}

//! Shared-PIN authentication for PIN-protected channels.
//!
//! Each call is independent: no attempt counter, no lockout, no session.

use {
    aistudio_protocol::messages,
    secrecy::{ExposeSecret, Secret},
};

use crate::{error::GatewayError, registry::Channel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    NotRequired,
    Granted,
    Denied(String),
}

pub struct Authenticator {
    expected_pin: Option<Secret<String>>,
}

impl Authenticator {
    pub fn new(expected_pin: Option<Secret<String>>) -> Self {
        Self {
            expected_pin: expected_pin.filter(|p| !p.expose_secret().is_empty()),
        }
    }

    #[must_use]
    pub fn has_pin(&self) -> bool {
        self.expected_pin.is_some()
    }

    /// Check `supplied` against the configured PIN for `channel`.
    ///
    /// Fails with [`GatewayError::Configuration`] when the channel needs a
    /// PIN but none is configured.
    pub fn authenticate(
        &self,
        channel: &Channel,
        supplied: Option<&str>,
    ) -> Result<AuthOutcome, GatewayError> {
        if !channel.requires_pin {
            return Ok(AuthOutcome::NotRequired);
        }

        let Some(expected) = self.expected_pin.as_ref() else {
            return Err(GatewayError::Configuration(format!(
                "channel \"{}\" requires a PIN but none is configured",
                channel.name
            )));
        };

        let supplied = match supplied {
            Some(pin) if !pin.is_empty() => pin,
            _ => return Ok(AuthOutcome::Denied(messages::PIN_REQUIRED.to_string())),
        };

        if constant_time_eq(supplied, expected.expose_secret()) {
            Ok(AuthOutcome::Granted)
        } else {
            Ok(AuthOutcome::Denied(messages::PIN_INVALID.to_string()))
        }
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("expected_pin", &self.expected_pin.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Constant-time string comparison.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

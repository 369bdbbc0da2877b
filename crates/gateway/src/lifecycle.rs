//! Per-request lifecycle.
//!
//! `Received → Validated → Authenticated → Dispatched → Completed`, with
//! early exits into `RejectedValidation`, `RejectedAuth` and
//! `UpstreamFailed`. Terminal stages accept no further transitions.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStage {
    Received,
    Validated,
    Authenticated,
    Dispatched,
    Completed,
    RejectedValidation,
    RejectedAuth,
    UpstreamFailed,
}

impl RequestStage {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::RejectedValidation | Self::RejectedAuth | Self::UpstreamFailed
        )
    }

    /// Whether `self → next` is a legal transition.
    #[must_use]
    pub fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Received, Self::Validated | Self::RejectedValidation)
                | (Self::Validated, Self::Authenticated | Self::RejectedAuth)
                | (Self::Authenticated, Self::Dispatched)
                | (Self::Dispatched, Self::Completed | Self::UpstreamFailed)
        )
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Validated => "validated",
            Self::Authenticated => "authenticated",
            Self::Dispatched => "dispatched",
            Self::Completed => "completed",
            Self::RejectedValidation => "rejected_validation",
            Self::RejectedAuth => "rejected_auth",
            Self::UpstreamFailed => "upstream_failed",
        }
    }
}

impl fmt::Display for RequestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("illegal request transition {from} -> {to}")]
pub struct InvalidTransition {
    pub from: RequestStage,
    pub to: RequestStage,
}

/// Stage tracker for a single request.
#[derive(Debug, Clone)]
pub struct RequestLifecycle {
    history: Vec<RequestStage>,
}

impl Default for RequestLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestLifecycle {
    #[must_use]
    pub fn new() -> Self {
        Self {
            history: vec![RequestStage::Received],
        }
    }

    #[must_use]
    pub fn stage(&self) -> RequestStage {
        self.history
            .last()
            .copied()
            .unwrap_or(RequestStage::Received)
    }

    /// Every stage visited, in order, starting at `Received`.
    #[must_use]
    pub fn history(&self) -> &[RequestStage] {
        &self.history
    }

    pub fn advance(&mut self, next: RequestStage) -> Result<(), InvalidTransition> {
        let from = self.stage();
        if !from.can_advance_to(next) {
            return Err(InvalidTransition { from, to: next });
        }
        tracing::trace!(%from, to = %next, "request stage");
        self.history.push(next);
        Ok(())
    }
}

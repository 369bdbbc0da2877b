//! Gateway error taxonomy and its HTTP mapping.
//!
//! Validation and auth failures carry client-facing text. Configuration and
//! upstream failures carry operator-facing text that is logged, never echoed
//! verbatim (upstream details are only attached in development mode).

use {
    aistudio_config::RuntimeMode,
    aistudio_protocol::{ErrorBody, messages},
    axum::{
        extract::rejection::{BytesRejection, PathRejection},
        http::StatusCode,
        response::{IntoResponse, Json, Response},
    },
    thiserror::Error,
};

use crate::{lifecycle::InvalidTransition, proxy::UpstreamFailure};

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{required}: {hint}", required = messages::TEXT_REQUIRED)]
    MissingText { hint: String },

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// The request was refused while extracting it (oversized body, bad path
    /// segment), before the pipeline ran.
    #[error("request rejected ({status}): {detail}")]
    Rejected { status: StatusCode, detail: String },

    #[error("{failed}: {reason}", failed = messages::AUTH_FAILED)]
    Authentication { reason: String },

    #[error("{kind}: {0}", kind = messages::INVALID_WEBHOOK_TYPE)]
    UnknownChannel(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamFailure),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse error class, one per row of the error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Request,
    Authentication,
    UnknownChannel,
    Configuration,
    Upstream,
    UpstreamUnreachable,
    Internal,
}

impl GatewayError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingText { .. } | Self::MalformedBody(_) => ErrorKind::Validation,
            Self::Rejected { .. } => ErrorKind::Request,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::UnknownChannel(_) => ErrorKind::UnknownChannel,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Upstream(UpstreamFailure::Unreachable(_)) => ErrorKind::UpstreamUnreachable,
            Self::Upstream(_) => ErrorKind::Upstream,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        if let Self::Rejected { status, .. } = self {
            return *status;
        }
        match self.kind() {
            ErrorKind::Validation | ErrorKind::Request | ErrorKind::UnknownChannel => {
                StatusCode::BAD_REQUEST
            },
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Configuration | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Upstream | ErrorKind::UpstreamUnreachable => StatusCode::BAD_GATEWAY,
        }
    }

    /// Client-facing body. `mode` decides whether upstream diagnostics are
    /// attached.
    #[must_use]
    pub fn body(&self, mode: RuntimeMode) -> ErrorBody {
        match self {
            Self::MissingText { hint } => {
                ErrorBody::new(messages::TEXT_REQUIRED).with_message(hint.clone())
            },
            Self::MalformedBody(detail) => {
                ErrorBody::new(messages::VALIDATION_ERROR).with_details(detail.clone())
            },
            Self::Rejected { status, detail } => {
                ErrorBody::new(status.canonical_reason().unwrap_or(messages::VALIDATION_ERROR))
                    .with_details(detail.clone())
            },
            Self::Authentication { reason } => ErrorBody::new(messages::AUTH_FAILED)
                .with_message(reason.clone())
                .requiring_auth(),
            Self::UnknownChannel(name) => ErrorBody::new(messages::INVALID_WEBHOOK_TYPE)
                .with_details(format!("{}: {name}", messages::INVALID_WEBHOOK_TYPE)),
            Self::Configuration(_) | Self::Internal(_) => ErrorBody::new(messages::INTERNAL_ERROR),
            Self::Upstream(failure) => {
                let body = ErrorBody::new(messages::GENERIC_FAILURE);
                if mode.is_production() {
                    body
                } else {
                    body.with_details(failure.to_string())
                }
            },
        }
    }

    /// Render for the given runtime mode.
    pub fn into_response_for(self, mode: RuntimeMode) -> Response {
        (self.status(), Json(self.body(mode))).into_response()
    }
}

impl From<InvalidTransition> for GatewayError {
    fn from(e: InvalidTransition) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<BytesRejection> for GatewayError {
    fn from(r: BytesRejection) -> Self {
        Self::Rejected {
            status: r.status(),
            detail: r.body_text(),
        }
    }
}

impl From<PathRejection> for GatewayError {
    fn from(r: PathRejection) -> Self {
        Self::Rejected {
            status: r.status(),
            detail: r.body_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream_500() -> GatewayError {
        GatewayError::Upstream(UpstreamFailure::Status {
            status: 500,
            body: "stack trace at line 42".into(),
        })
    }

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(
            GatewayError::MissingText { hint: "x".into() }.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::UnknownChannel("nope".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::Authentication {
                reason: messages::PIN_REQUIRED.into()
            }
            .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GatewayError::Configuration("no pin".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(upstream_500().status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            GatewayError::from(UpstreamFailure::Unreachable("refused".into())).kind(),
            ErrorKind::UpstreamUnreachable
        );
    }

    #[test]
    fn upstream_details_hidden_in_production() {
        let body = upstream_500().body(RuntimeMode::Production);
        assert_eq!(body, ErrorBody::new(messages::GENERIC_FAILURE));

        let body = upstream_500().body(RuntimeMode::Development);
        let details = body.details.unwrap();
        assert!(details.contains("500"));
        assert!(details.contains("stack trace"));
    }

    #[test]
    fn configuration_error_is_never_verbatim() {
        for mode in [RuntimeMode::Development, RuntimeMode::Production] {
            let body = GatewayError::Configuration("AISTUDIO_PIN unset".into()).body(mode);
            assert_eq!(body, ErrorBody::new(messages::INTERNAL_ERROR));
        }
    }

    #[test]
    fn rejection_keeps_its_status() {
        let err = GatewayError::Rejected {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            detail: "length limit exceeded".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Request);
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            err.body(RuntimeMode::Production),
            ErrorBody::new("Payload Too Large").with_details("length limit exceeded")
        );
    }

    #[test]
    fn display_names_the_failure() {
        assert_eq!(
            GatewayError::UnknownChannel("video".into()).to_string(),
            "Invalid webhook type: video"
        );
        assert_eq!(
            GatewayError::MissingText {
                hint: "Please provide a topic".into()
            }
            .to_string(),
            "Text is required: Please provide a topic"
        );
    }

    #[test]
    fn auth_body_flags_requires_auth() {
        let body = GatewayError::Authentication {
            reason: messages::PIN_INVALID.into(),
        }
        .body(RuntimeMode::Development);
        assert_eq!(body.error, "Authentication failed");
        assert_eq!(body.message.as_deref(), Some("Invalid PIN. Please try again."));
        assert_eq!(body.requires_auth, Some(true));
    }
}

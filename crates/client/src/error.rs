use {aistudio_protocol::ErrorBody, thiserror::Error};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gateway rejected the request (HTTP {status}): {}", summary(.body))]
    Rejected { status: u16, body: ErrorBody },

    #[error("No image URL found in response")]
    NoImageFound,

    #[error("No audio file received from server")]
    NoAudioFile,

    #[error("PIN must be exactly 6 digits")]
    InvalidPinFormat,
}

impl ClientError {
    /// The message a UI would show for this failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { body, .. } => summary(body).to_string(),
            other => other.to_string(),
        }
    }
}

fn summary(body: &ErrorBody) -> &str {
    body.message
        .as_deref()
        .or(body.details.as_deref())
        .unwrap_or(&body.error)
}

pub type Result<T> = std::result::Result<T, ClientError>;

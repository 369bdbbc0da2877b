//! Upstream dispatch.
//!
//! The dispatcher forwards a JSON payload to a channel's upstream URL and
//! hands back the upstream JSON untouched. It does not retry, does not
//! override transport timeouts and does not interpret channel-specific
//! response shapes.

use {
    async_trait::async_trait,
    reqwest::header::{CONTENT_TYPE, HeaderValue},
    serde_json::Value,
    thiserror::Error,
    tracing::debug,
};

use crate::registry::Channel;

/// Longest upstream error body kept for diagnostics.
const MAX_CAPTURED_BODY: usize = 2048;

#[derive(Error, Debug)]
pub enum UpstreamFailure {
    #[error("upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("upstream unreachable: {0}")]
    Unreachable(String),

    #[error("upstream returned a non-JSON body: {0}")]
    InvalidBody(String),
}

/// Either the upstream JSON or a structured failure, never both.
pub type ProxyResult = Result<Value, UpstreamFailure>;

#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, channel: &Channel, payload: &Value) -> ProxyResult;
}

/// HTTP POST dispatcher backed by a shared `reqwest` client.
#[derive(Clone, Default)]
pub struct HttpDispatcher {
    client: reqwest::Client,
}

impl HttpDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn dispatch(&self, channel: &Channel, payload: &Value) -> ProxyResult {
        debug!(channel = %channel.name, url = %channel.url, "dispatching upstream");

        let resp = self
            .client
            .post(&channel.url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(payload)
            .send()
            .await
            .map_err(|e| UpstreamFailure::Unreachable(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| UpstreamFailure::Unreachable(e.to_string()))?;

        if !status.is_success() {
            return Err(UpstreamFailure::Status {
                status: status.as_u16(),
                body: truncate(&body, MAX_CAPTURED_BODY),
            });
        }

        serde_json::from_str(&body).map_err(|e| UpstreamFailure::InvalidBody(e.to_string()))
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &s[..end])
}

#[cfg(test)]
mod tests {
    use {super::*, mockito::Matcher, serde_json::json};

    fn channel(url: String) -> Channel {
        Channel {
            name: "podcast".into(),
            url,
            description: "Podcast Generator".into(),
            requires_pin: false,
            hint: "Please provide a podcast topic".into(),
        }
    }

    #[tokio::test]
    async fn forwards_json_and_returns_body_unmodified() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({ "text": "space exploration" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"audioFile":"https://cdn/x.mp3","extra":[1,2]}"#)
            .create_async()
            .await;

        let result = HttpDispatcher::new()
            .dispatch(
                &channel(format!("{}/hook", server.url())),
                &json!({ "text": "space exploration" }),
            )
            .await
            .unwrap();

        assert_eq!(
            result,
            json!({ "audioFile": "https://cdn/x.mp3", "extra": [1, 2] })
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_captured() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/hook")
            .with_status(500)
            .with_body("workflow crashed")
            .create_async()
            .await;

        let err = HttpDispatcher::new()
            .dispatch(&channel(format!("{}/hook", server.url())), &json!({ "text": "x" }))
            .await
            .unwrap_err();

        match err {
            UpstreamFailure::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "workflow crashed");
            },
            other => panic!("unexpected failure: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_success_is_invalid_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/hook")
            .with_status(200)
            .with_body("<html>ok</html>")
            .create_async()
            .await;

        let err = HttpDispatcher::new()
            .dispatch(&channel(format!("{}/hook", server.url())), &json!({ "text": "x" }))
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamFailure::InvalidBody(_)));
    }

    #[tokio::test]
    async fn connection_refused_is_unreachable() {
        // Bind then drop to get a port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = HttpDispatcher::new()
            .dispatch(&channel(format!("http://{addr}/hook")), &json!({ "text": "x" }))
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamFailure::Unreachable(_)));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééé", 3), "é…");
    }
}

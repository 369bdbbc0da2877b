//! Client against a mocked gateway.

use {
    aistudio_client::{ClientError, GatewayClient},
    mockito::Matcher,
    serde_json::json,
};

#[tokio::test]
async fn social_media_sends_text_and_pin() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/webhook/social-media")
        .match_body(Matcher::Json(
            json!({ "text": "https://blog.example/post", "pin": "123456" }),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"linkedin":"L","twitter":"T"}"#)
        .create_async()
        .await;

    let out = GatewayClient::new(server.url())
        .social_media("https://blog.example/post", "123456")
        .await
        .unwrap();
    assert_eq!(out, json!({ "linkedin": "L", "twitter": "T" }));
    mock.assert_async().await;
}

#[tokio::test]
async fn social_media_rejects_bad_pin_format_locally() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let err = GatewayClient::new(server.url())
        .social_media("x", "12345")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidPinFormat));
    mock.assert_async().await;
}

#[tokio::test]
async fn social_media_auth_failure_carries_server_message() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/webhook/social-media")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"error":"Authentication failed","message":"PIN is required","requiresAuth":true}"#,
        )
        .create_async()
        .await;

    let err = GatewayClient::new(server.url())
        .social_media("x", "000000")
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "PIN is required");
    match err {
        ClientError::Rejected { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body.requires_auth, Some(true));
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn social_media_forbidden_without_message_uses_default() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/webhook/social-media")
        .with_status(403)
        .with_body(r#"{"error":"Forbidden"}"#)
        .create_async()
        .await;

    let err = GatewayClient::new(server.url())
        .social_media("x", "000000")
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Invalid PIN. Please try again.");
}

#[tokio::test]
async fn podcast_returns_audio_file_via_legacy_path() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/podcast")
        .match_body(Matcher::Json(json!({ "text": "space exploration" })))
        .with_status(200)
        .with_body(r#"{"audioFile":"https://cdn/x.mp3"}"#)
        .create_async()
        .await;

    let url = GatewayClient::new(server.url())
        .podcast("space exploration")
        .await
        .unwrap();
    assert_eq!(url, "https://cdn/x.mp3");
}

#[tokio::test]
async fn podcast_without_audio_file_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/podcast")
        .with_status(200)
        .with_body(r#"{"status":"queued"}"#)
        .create_async()
        .await;

    let err = GatewayClient::new(server.url())
        .podcast("space exploration")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NoAudioFile));
}

#[tokio::test]
async fn thumbnail_normalizes_wrapped_array() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/thumbnail")
        .with_status(200)
        .with_body(r#"[{"body":{"result":{"urls":["https://img/1.png"]}}}]"#)
        .create_async()
        .await;

    let url = GatewayClient::new(server.url())
        .thumbnail("a red fox")
        .await
        .unwrap();
    assert_eq!(url, "https://img/1.png");
}

#[tokio::test]
async fn generic_failure_is_rejected_with_error_text() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/thumbnail")
        .with_status(502)
        .with_body(r#"{"error":"Something went wrong. Please try again."}"#)
        .create_async()
        .await;

    let err = GatewayClient::new(server.url())
        .thumbnail("a red fox")
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Something went wrong. Please try again.");
}

#[tokio::test]
async fn health_decodes_backend_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/health")
        .with_status(200)
        .with_body(
            r#"{"status":"Backend server is healthy","environment":"development","timestamp":"2026-01-01T00:00:00.000Z"}"#,
        )
        .create_async()
        .await;

    let health = GatewayClient::new(server.url()).health().await.unwrap();
    assert_eq!(health.status, "Backend server is healthy");
    assert_eq!(health.environment, "development");
}

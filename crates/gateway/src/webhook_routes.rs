//! Proxy route handlers.
//!
//! `POST /api/webhook/{channel}` and the legacy `/api/<channel>` aliases both
//! end up in [`proxy_request`], so an alias behaves exactly like its canonical
//! route. Extractor rejections are rendered as JSON error bodies too.

use {
    axum::{
        body::Bytes,
        extract::{
            Path, State,
            rejection::{BytesRejection, PathRejection},
        },
        http::HeaderMap,
        response::{IntoResponse, Json, Response},
    },
    tracing::{debug, info},
};

use crate::{
    error::GatewayError, pipeline, server::AppState, state::GatewayState, validate::BodyFormat,
};

/// Run one request through the pipeline and render the result.
///
/// Success passes the upstream JSON through untouched with status 200.
pub async fn proxy_request(
    gw: &GatewayState,
    channel: &str,
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => return rejected(gw, rejection.into()),
    };
    let outcome = pipeline::process(gw, channel, &body, BodyFormat::from_headers(headers)).await;
    debug!(channel, history = ?outcome.lifecycle.history(), "request lifecycle");
    match outcome.result {
        Ok(value) => Json(value).into_response(),
        Err(e) => e.into_response_for(gw.mode),
    }
}

fn rejected(gw: &GatewayState, e: GatewayError) -> Response {
    info!(error = %e, "request rejected before dispatch");
    e.into_response_for(gw.mode)
}

pub async fn webhook_handler(
    State(state): State<AppState>,
    channel: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    match channel {
        Ok(Path(channel)) => proxy_request(&state.gateway, &channel, &headers, body).await,
        Err(rejection) => rejected(&state.gateway, rejection.into()),
    }
}

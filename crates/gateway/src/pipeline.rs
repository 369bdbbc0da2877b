//! The per-request proxy pipeline: resolve, validate, authenticate,
//! dispatch. Every step is recorded on the request lifecycle so nothing is
//! dispatched without passing validation and authentication first.

use std::time::Instant;

use {
    serde_json::Value,
    tracing::{error, info, warn},
};

use crate::{
    auth::AuthOutcome,
    error::{ErrorKind, GatewayError},
    lifecycle::{RequestLifecycle, RequestStage},
    state::GatewayState,
    validate::{BodyFormat, parse_body, validate},
};

/// Result of one pass through the pipeline.
#[derive(Debug)]
pub struct Outcome {
    pub lifecycle: RequestLifecycle,
    pub result: Result<Value, GatewayError>,
}

/// Run `raw_body` through the pipeline for `channel_name`.
pub async fn process(
    gw: &GatewayState,
    channel_name: &str,
    raw_body: &[u8],
    format: BodyFormat,
) -> Outcome {
    let started = Instant::now();
    let mut lifecycle = RequestLifecycle::new();
    let result = run(gw, channel_name, raw_body, format, &mut lifecycle).await;

    let stage = lifecycle.stage();
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    match &result {
        Ok(_) => info!(channel = %channel_name, %stage, elapsed_ms, "proxy request completed"),
        Err(e) => match e.kind() {
            ErrorKind::Configuration | ErrorKind::Internal => {
                error!(channel = %channel_name, %stage, error = %e, "proxy request failed")
            },
            ErrorKind::Upstream | ErrorKind::UpstreamUnreachable => {
                warn!(channel = %channel_name, %stage, elapsed_ms, error = %e, "upstream failed")
            },
            _ => info!(channel = %channel_name, %stage, error = %e, "proxy request rejected"),
        },
    }

    Outcome { lifecycle, result }
}

async fn run(
    gw: &GatewayState,
    channel_name: &str,
    raw_body: &[u8],
    format: BodyFormat,
    lifecycle: &mut RequestLifecycle,
) -> Result<Value, GatewayError> {
    let validated = gw.registry.resolve(channel_name).and_then(|channel| {
        let body = parse_body(raw_body, format)?;
        let request = validate(&channel, &body)?;
        Ok((channel, request))
    });
    let (channel, request) = match validated {
        Ok(ok) => {
            lifecycle.advance(RequestStage::Validated)?;
            ok
        },
        Err(e) => {
            lifecycle.advance(RequestStage::RejectedValidation)?;
            return Err(e);
        },
    };

    match gw.authenticator.authenticate(&channel, request.pin()) {
        Ok(AuthOutcome::NotRequired | AuthOutcome::Granted) => {
            lifecycle.advance(RequestStage::Authenticated)?;
        },
        Ok(AuthOutcome::Denied(reason)) => {
            lifecycle.advance(RequestStage::RejectedAuth)?;
            return Err(GatewayError::Authentication { reason });
        },
        Err(e) => {
            lifecycle.advance(RequestStage::RejectedAuth)?;
            return Err(e);
        },
    }

    lifecycle.advance(RequestStage::Dispatched)?;
    match gw
        .dispatcher
        .dispatch(&channel, &request.upstream_payload())
        .await
    {
        Ok(value) => {
            lifecycle.advance(RequestStage::Completed)?;
            Ok(value)
        },
        Err(failure) => {
            lifecycle.advance(RequestStage::UpstreamFailed)?;
            Err(failure.into())
        },
    }
}

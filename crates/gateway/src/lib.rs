//! Gateway: HTTP front door that forwards content-generation requests to
//! per-channel upstream webhooks.
//!
//! Request flow:
//! 1. Resolve the channel in the registry
//! 2. Parse + validate the JSON (or urlencoded form) body
//! 3. Check the PIN for protected channels
//! 4. POST `{"text": ...}` upstream and pass the JSON response back
//!
//! Failures at any step map to a fixed JSON error shape (see `error.rs`).
//! Health probes, legacy `/api/<channel>` aliases, CORS and the 404 fallback
//! are wired up in `server.rs`.

pub mod auth;
pub mod error;
pub mod lifecycle;
pub mod pipeline;
pub mod proxy;
pub mod registry;
pub mod server;
pub mod state;
pub mod validate;
pub mod webhook_routes;

pub use {
    error::{ErrorKind, GatewayError},
    proxy::{Dispatcher, HttpDispatcher, ProxyResult, UpstreamFailure},
    registry::{Channel, ChannelRegistry},
    server::{AppState, build_gateway_app, start_gateway},
    state::GatewayState,
};

use std::sync::Arc;

use aistudio_config::{CorsConfig, RuntimeMode, StudioConfig};

use crate::{
    auth::Authenticator,
    proxy::{Dispatcher, HttpDispatcher},
    registry::ChannelRegistry,
};

/// Immutable gateway state shared by every request handler.
///
/// Built once from the resolved config; nothing in here changes while the
/// server runs.
pub struct GatewayState {
    pub version: String,
    pub mode: RuntimeMode,
    pub registry: ChannelRegistry,
    pub authenticator: Authenticator,
    pub dispatcher: Arc<dyn Dispatcher>,
    pub cors: CorsConfig,
    pub body_limit_bytes: usize,
}

impl GatewayState {
    /// State with the real HTTP dispatcher.
    pub fn new(config: &StudioConfig) -> Arc<Self> {
        Self::with_dispatcher(config, Arc::new(HttpDispatcher::new()))
    }

    /// State with a caller-supplied dispatcher.
    pub fn with_dispatcher(config: &StudioConfig, dispatcher: Arc<dyn Dispatcher>) -> Arc<Self> {
        Arc::new(Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            mode: config.server.mode,
            registry: ChannelRegistry::from_config(config),
            authenticator: Authenticator::new(config.auth.pin.clone()),
            dispatcher,
            cors: config.cors.clone(),
            body_limit_bytes: config.server.body_limit_bytes,
        })
    }
}

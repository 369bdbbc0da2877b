//! Upstream channel registry.
//!
//! Built once from config at startup and read-only afterwards. Lookups are
//! case-sensitive exact matches.

use std::{collections::BTreeMap, sync::Arc};

use {
    aistudio_config::{ChannelEntry, StudioConfig},
    serde::Serialize,
};

use crate::error::GatewayError;

/// Hint used when a configured channel does not provide one.
pub const DEFAULT_HINT: &str = "Please provide content text";

/// A named proxy target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Channel {
    pub name: String,
    pub url: String,
    pub description: String,
    pub requires_pin: bool,
    pub hint: String,
}

impl Channel {
    pub fn from_entry(name: impl Into<String>, entry: &ChannelEntry) -> Self {
        Self {
            name: name.into(),
            url: entry.url.clone(),
            description: entry.description.clone(),
            requires_pin: entry.requires_pin,
            hint: entry
                .hint
                .clone()
                .unwrap_or_else(|| DEFAULT_HINT.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChannelRegistry {
    channels: BTreeMap<String, Arc<Channel>>,
}

impl ChannelRegistry {
    pub fn from_config(config: &StudioConfig) -> Self {
        Self::from_channels(
            config
                .channels
                .iter()
                .map(|(name, entry)| Channel::from_entry(name.as_str(), entry)),
        )
    }

    pub fn from_channels(channels: impl IntoIterator<Item = Channel>) -> Self {
        Self {
            channels: channels
                .into_iter()
                .map(|c| (c.name.clone(), Arc::new(c)))
                .collect(),
        }
    }

    /// Resolve a channel by exact name.
    pub fn resolve(&self, name: &str) -> Result<Arc<Channel>, GatewayError> {
        self.channels
            .get(name)
            .cloned()
            .ok_or_else(|| GatewayError::UnknownChannel(name.to_string()))
    }

    /// Channels in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.values().map(AsRef::as_ref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

//! Configuration loading, env substitution, environment overrides and
//! validation.
//!
//! Config files: `aistudio.toml`, `aistudio.yaml`, or `aistudio.json`
//! Searched in `./` then `~/.config/aistudio/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values. Process
//! environment (`PORT`, `AISTUDIO_ENV`, `FRONTEND_URL`, `AISTUDIO_PIN`,
//! `AISTUDIO_WEBHOOK_<CHANNEL>_URL`) is applied on top.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod template;
pub mod validate;

pub use {
    error::{ConfigError, Result},
    loader::{
        apply_env_overrides, apply_env_overrides_with, channel_url_var, config_dir,
        discover_and_load, find_config_file, load_config,
    },
    schema::{
        AuthConfig, ChannelEntry, CorsConfig, RuntimeMode, ServerConfig, StudioConfig,
        default_channels,
    },
    template::default_config_template,
    validate::{Diagnostic, Severity, ValidationResult, validate},
};

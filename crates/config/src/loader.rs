use std::path::{Path, PathBuf};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{
    env_subst::substitute_env,
    error::{ConfigError, Result},
    schema::{RuntimeMode, StudioConfig},
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "aistudio.toml",
    "aistudio.yaml",
    "aistudio.yml",
    "aistudio.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<StudioConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./aistudio.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/aistudio/aistudio.{toml,yaml,yml,json}` (user-global)
///
/// Returns `StudioConfig::default()` if no config file is found.
pub fn discover_and_load() -> StudioConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    StudioConfig::default()
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    let config_dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| config_dir.join(name))
        .find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/aistudio/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "aistudio").map(|d| d.config_dir().to_path_buf())
}

fn parse_config(raw: &str, path: &Path) -> Result<StudioConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
    let parse_err = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };

    match ext {
        "toml" => toml::from_str(raw).map_err(|e| parse_err(e.to_string())),
        "yaml" | "yml" => serde_yaml::from_str(raw).map_err(|e| parse_err(e.to_string())),
        "json" => serde_json::from_str(raw).map_err(|e| parse_err(e.to_string())),
        _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
    }
}

// ── Environment overrides ───────────────────────────────────────────────────

/// Apply process environment overrides on top of a loaded config.
pub fn apply_env_overrides(config: StudioConfig) -> Result<StudioConfig> {
    apply_env_overrides_with(config, |name| std::env::var(name).ok())
}

/// Environment variable carrying the upstream URL for `channel`,
/// e.g. `social-media` → `AISTUDIO_WEBHOOK_SOCIAL_MEDIA_URL`.
#[must_use]
pub fn channel_url_var(channel: &str) -> String {
    let upper: String = channel
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("AISTUDIO_WEBHOOK_{upper}_URL")
}

/// Same as [`apply_env_overrides`] with an injectable lookup, so tests don't
/// touch the process environment.
pub fn apply_env_overrides_with(
    mut config: StudioConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<StudioConfig> {
    let get = |primary: &str, fallback: Option<&str>| {
        lookup(primary)
            .or_else(|| fallback.and_then(&lookup))
            .filter(|v| !v.trim().is_empty())
    };

    if let Some(port) = get("PORT", None) {
        config.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
            var: "PORT".into(),
            message: format!("not a port number: {port}"),
        })?;
    }
    if let Some(bind) = get("AISTUDIO_BIND", None) {
        config.server.bind = bind;
    }
    if let Some(mode) = get("AISTUDIO_ENV", Some("NODE_ENV")) {
        match mode.parse::<RuntimeMode>() {
            Ok(mode) => config.server.mode = mode,
            Err(e) => warn!(error = %e, "ignoring runtime mode override"),
        }
    }
    if let Some(url) = get("FRONTEND_URL", None) {
        config.cors.frontend_url = url;
    }
    if let Some(pin) = get("AISTUDIO_PIN", Some("SOCIAL_MEDIA_PIN")) {
        config.auth.pin = Some(Secret::new(pin));
    }
    for (name, entry) in config.channels.iter_mut() {
        if let Some(url) = get(&channel_url_var(name), None) {
            debug!(channel = %name, "upstream url overridden from environment");
            entry.url = url;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use {secrecy::ExposeSecret, std::collections::HashMap, std::io::Write};

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn channel_var_names() {
        assert_eq!(
            channel_url_var("social-media"),
            "AISTUDIO_WEBHOOK_SOCIAL_MEDIA_URL"
        );
        assert_eq!(channel_url_var("podcast"), "AISTUDIO_WEBHOOK_PODCAST_URL");
    }

    #[test]
    fn env_overrides_apply() {
        let cfg = apply_env_overrides_with(
            StudioConfig::default(),
            env(&[
                ("PORT", "8080"),
                ("NODE_ENV", "production"),
                ("FRONTEND_URL", "https://studio.example"),
                ("SOCIAL_MEDIA_PIN", "123456"),
                ("AISTUDIO_WEBHOOK_PODCAST_URL", "http://127.0.0.1:9/podcast"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.mode, RuntimeMode::Production);
        assert_eq!(cfg.cors.frontend_url, "https://studio.example");
        assert_eq!(cfg.auth.pin.as_ref().unwrap().expose_secret(), "123456");
        assert_eq!(cfg.channels["podcast"].url, "http://127.0.0.1:9/podcast");
    }

    #[test]
    fn primary_var_beats_fallback() {
        let cfg = apply_env_overrides_with(
            StudioConfig::default(),
            env(&[("AISTUDIO_ENV", "development"), ("NODE_ENV", "production")]),
        )
        .unwrap();
        assert_eq!(cfg.server.mode, RuntimeMode::Development);
    }

    #[test]
    fn bad_port_is_an_error() {
        let err = apply_env_overrides_with(StudioConfig::default(), env(&[("PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { ref var, .. } if var == "PORT"));
    }

    #[test]
    fn unknown_mode_is_ignored() {
        let cfg = apply_env_overrides_with(StudioConfig::default(), env(&[("NODE_ENV", "test")]))
            .unwrap();
        assert_eq!(cfg.server.mode, RuntimeMode::Development);
    }

    #[test]
    fn loads_toml_and_replaces_channel_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aistudio.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[server]
port = 7000
mode = "production"

[channels.echo]
url = "http://127.0.0.1:1/echo"
description = "Echo"
"#
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.server.port, 7000);
        assert_eq!(cfg.server.bind, "0.0.0.0");
        assert!(cfg.server.mode.is_production());
        assert_eq!(cfg.channels.len(), 1);
        assert!(!cfg.channels["echo"].requires_pin);
    }

    #[test]
    fn loads_json_with_pin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aistudio.json");
        std::fs::write(&path, r#"{ "auth": { "pin": "654321" } }"#).unwrap();

        let cfg = load_config(&path).unwrap();
        assert!(cfg.auth.has_pin());
        assert_eq!(cfg.channels.len(), 3);
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aistudio.ini");
        std::fs::write(&path, "port=1").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::UnsupportedFormat(ext)) if ext == "ini"
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_config(Path::new("/nonexistent/aistudio.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

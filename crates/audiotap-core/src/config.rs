use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::url_model::DEFAULT_VOLATILE_PARAMS;

/// Patterns used to classify requests (`[classifier]` in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Regex matched case-insensitively against the request initiator.
    pub target_site_pattern: String,
    /// Regex matched case-insensitively against the request URL to spot audio streams.
    pub audio_marker_pattern: String,
    /// Query parameters removed when deriving the canonical stream URL.
    pub volatile_params: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            target_site_pattern: r"youtube\.com".to_string(),
            audio_marker_pattern: "mime=audio%2Fwebm".to_string(),
            volatile_params: DEFAULT_VOLATILE_PARAMS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Which requests the interception layer hands to the service (`[intercept]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterceptConfig {
    /// Browser match patterns, e.g. `*://*.googlevideo.com/*`.
    pub url_patterns: Vec<String>,
}

impl Default for InterceptConfig {
    fn default() -> Self {
        Self {
            url_patterns: vec!["*://*.googlevideo.com/*".to_string()],
        }
    }
}

/// Audio stream notification settings (`[notify]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Events buffered per `subscribe()` receiver before it starts skipping.
    /// Handlers registered with `on_audio_stream` are unbounded and never skip.
    pub channel_capacity: usize,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
        }
    }
}

/// Global configuration loaded from `~/.config/audiotap/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudiotapConfig {
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub intercept: InterceptConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    /// Preference file override; defaults to the XDG state dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences_path: Option<PathBuf>,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("audiotap")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<AudiotapConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as [`load_or_init`] but for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<AudiotapConfig> {
    if !path.exists() {
        let default_cfg = AudiotapConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        fs::write(path, toml).with_context(|| format!("write config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: AudiotapConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = AudiotapConfig::default();
        assert_eq!(cfg.classifier.target_site_pattern, r"youtube\.com");
        assert_eq!(cfg.classifier.audio_marker_pattern, "mime=audio%2Fwebm");
        assert_eq!(cfg.classifier.volatile_params, vec!["range", "rbuf", "rn"]);
        assert_eq!(cfg.intercept.url_patterns, vec!["*://*.googlevideo.com/*"]);
        assert_eq!(cfg.notify.channel_capacity, 64);
        assert!(cfg.preferences_path.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = AudiotapConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: AudiotapConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_partial_sections() {
        let toml = r#"
            preferences_path = "/tmp/prefs.json"

            [classifier]
            volatile_params = ["range", "rbuf", "rn", "sq"]

            [notify]
            channel_capacity = 8
        "#;
        let cfg: AudiotapConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.classifier.volatile_params.len(), 4);
        assert_eq!(cfg.classifier.target_site_pattern, r"youtube\.com");
        assert_eq!(cfg.intercept, InterceptConfig::default());
        assert_eq!(cfg.notify.channel_capacity, 8);
        assert_eq!(
            cfg.preferences_path.as_deref(),
            Some(Path::new("/tmp/prefs.json"))
        );
    }

    #[test]
    fn empty_toml_is_default() {
        let cfg: AudiotapConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, AudiotapConfig::default());
    }

    #[test]
    fn load_or_init_creates_then_reads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let created = load_or_init_at(&path).unwrap();
        assert!(path.exists());
        let reread = load_or_init_at(&path).unwrap();
        assert_eq!(created, reread);
    }
}

// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::paths;

/// Environment variable overriding the chat backend base URL.
pub const API_BASE_ENV: &str = "MILES_API_BASE";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub geocoder: GeocoderConfig,

    #[serde(default)]
    pub trigger: TriggerConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the chat backend; `/api/chat` and `/api/health` hang off it.
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            timeout_seconds: 30,
        }
    }
}

impl BackendConfig {
    /// Base URL after applying the MILES_API_BASE override, trailing
    /// slashes trimmed.
    pub fn resolved_base_url(&self) -> String {
        let raw = std::env::var(API_BASE_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.base_url.clone());
        raw.trim_end_matches('/').to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Whether to attempt geolocation + reverse geocoding at session start.
    pub enabled: bool,
    pub base_url: String,
    /// Bound on the whole location lookup; on expiry the context degrades
    /// to no location instead of blocking session start.
    pub timeout_seconds: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.bigdatacloud.net/data/reverse-geocode-client".into(),
            timeout_seconds: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Dashboard trigger vocabulary: "price" (default) or "broad".
    pub vocabulary: String,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            vocabulary: "price".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Render the flight dashboard as plain text instead of the TUI view.
    pub plain: bool,
    /// Suggestions shown under the welcome message.
    pub quick_replies: Vec<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            plain: false,
            quick_replies: vec![
                "Plan a trip to Paris".into(),
                "Budget accommodations".into(),
                "Check weather".into(),
            ],
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reasonable() {
        let c = Config::default();
        assert_eq!(c.backend.base_url, "http://localhost:8000");
        assert_eq!(c.backend.timeout_seconds, 30);
        assert!(c.geocoder.enabled);
        assert_eq!(c.geocoder.timeout_seconds, 5);
        assert_eq!(c.trigger.vocabulary, "price");
        assert!(!c.ui.plain);
        assert_eq!(c.ui.quick_replies.len(), 3);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = "";
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.timeout_seconds, 30);
        assert!(config.geocoder.enabled);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[backend]
base_url = "https://api.example.com/"
timeout_seconds = 10

[geocoder]
enabled = false
base_url = "https://geo.example.com"
timeout_seconds = 2

[trigger]
vocabulary = "broad"

[ui]
plain = true
quick_replies = ["Find flights"]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.base_url, "https://api.example.com/");
        assert_eq!(config.backend.timeout_seconds, 10);
        assert!(!config.geocoder.enabled);
        assert_eq!(config.geocoder.timeout_seconds, 2);
        assert_eq!(config.trigger.vocabulary, "broad");
        assert!(config.ui.plain);
        assert_eq!(config.ui.quick_replies, vec!["Find flights".to_string()]);
    }

    #[test]
    fn test_resolved_base_url_trims_slash() {
        let backend = BackendConfig {
            base_url: "https://api.example.com///".into(),
            timeout_seconds: 30,
        };
        // Env override is covered by an integration test; here the config
        // value itself must come back without trailing slashes.
        if std::env::var(API_BASE_ENV).is_err() {
            assert_eq!(backend.resolved_base_url(), "https://api.example.com");
        }
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.backend.base_url, config.backend.base_url);
        assert_eq!(deserialized.trigger.vocabulary, config.trigger.vocabulary);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }
}

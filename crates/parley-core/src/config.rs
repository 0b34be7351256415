use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ParleyError, Result};
use crate::types;

/// Top-level configuration for the Parley widget core.
///
/// Loaded from `~/.parley/config.toml` by default. Each section corresponds
/// to one collaborator of the session controller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParleyConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl ParleyConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ParleyConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ParleyError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Remote answering service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the answering service, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout in seconds. A timed-out request counts as a
    /// transport failure; there is no automatic retry.
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Voice capture settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Whether the microphone affordance is offered at all.
    pub enabled: bool,
    /// BCP 47 language tag passed to the recognition engine.
    pub language: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            language: "en-US".to_string(),
        }
    }
}

/// Canned conversation strings. Overridable per deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Bot message every new transcript is seeded with.
    pub greeting: String,
    /// Reply used when the service returns an empty response body.
    pub fallback_reply: String,
    /// Placeholder bot message appended after a failed send.
    pub connectivity_error: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: types::DEFAULT_GREETING.to_string(),
            fallback_reply: types::DEFAULT_FALLBACK_REPLY.to_string(),
            connectivity_error: types::DEFAULT_CONNECTIVITY_ERROR.to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParleyConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.service.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.service.timeout_secs, 30);
        assert!(config.voice.enabled);
        assert_eq!(config.voice.language, "en-US");
        assert_eq!(config.chat.greeting, types::DEFAULT_GREETING);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let result = ParleyConfig::load(Path::new("/nonexistent/parley.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = ParleyConfig::load_or_default(Path::new("/nonexistent/parley.toml"));
        assert_eq!(config.service.timeout_secs, 30);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = ParleyConfig::default();
        config.service.base_url = "https://chat.example.org".to_string();
        config.chat.greeting = "Welcome!".to_string();
        config.save(&path).unwrap();

        let reloaded = ParleyConfig::load(&path).unwrap();
        assert_eq!(reloaded.service.base_url, "https://chat.example.org");
        assert_eq!(reloaded.chat.greeting, "Welcome!");
        // Untouched sections keep their defaults.
        assert_eq!(reloaded.voice.language, "en-US");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[service]\nbase_url = \"http://10.0.0.5:9000\"\n").unwrap();

        let config = ParleyConfig::load(&path).unwrap();
        assert_eq!(config.service.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.service.timeout_secs, 30);
        assert_eq!(config.chat.fallback_reply, types::DEFAULT_FALLBACK_REPLY);
    }

    #[test]
    fn test_malformed_toml_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is not toml [[[").unwrap();

        let config = ParleyConfig::load_or_default(&path);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("config.toml");
        ParleyConfig::default().save(&path).unwrap();
        assert!(path.exists());
    }
}

//! Session Configuration

use std::path::Path;

use serde::{Deserialize, Serialize};
use typelab_fonts::registry::DEFAULT_FAMILY_PREFIX;
use typelab_style::{SampleText, Settings};

/// Session configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    /// Settings the session starts with
    pub settings: Settings,

    /// Preview text the session starts with
    pub text: String,

    /// Prefix of the synthetic family handles given to uploads
    pub family_prefix: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            text: SampleText::Default.text().to_string(),
            family_prefix: DEFAULT_FAMILY_PREFIX.to_string(),
        }
    }
}

impl SessionConfig {
    /// Parse a JSON configuration. Missing keys take their defaults and
    /// numeric settings are clamped into range.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_json::from_str(json)?;
        if config.family_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid("familyPrefix must not be empty".into()));
        }
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let config = SessionConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_partial_settings() {
        let config = SessionConfig::from_json_str(
            r#"{"settings": {"weight": 1200, "direction": "rtl"}, "text": "abc"}"#,
        )
        .unwrap();
        assert_eq!(config.settings.weight, 900);
        assert_eq!(config.settings.font_size, 48);
        assert_eq!(config.text, "abc");
    }

    #[test]
    fn test_blank_prefix_rejected() {
        let err = SessionConfig::from_json_str(r#"{"familyPrefix": "  "}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            SessionConfig::from_json_str("{not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_from_path() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"familyPrefix": "Proof", "settings": {{"fontSize": 2}}}}"#).unwrap();

        let config = SessionConfig::from_path(file.path()).unwrap();
        assert_eq!(config.family_prefix, "Proof");
        assert_eq!(config.settings.font_size, 8);
        assert_eq!(config.text, SampleText::Default.text());
    }

    #[test]
    fn test_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = SessionConfig::from_path(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

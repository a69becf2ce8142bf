//! Bridge configuration.
//!
//! Settings can be built in code or loaded from TOML:
//!
//! ```toml
//! extracted_props = ["scrollLeft", "scrollTop"]
//! fallback = "redraw"
//! trace_flushes = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Props consumed by the bridge itself rather than forwarded to the node.
pub const SCROLL_PROPS: [&str; 2] = ["scrollLeft", "scrollTop"];

/// What to do when an in-place flush cannot apply a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Request one forced re-render per failed flush.
    #[default]
    Redraw,
    /// Drop the change. The next declarative render picks it up.
    Ignore,
}

/// Per-component bridge settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Props stripped from the snapshot before it reaches the wrapped component.
    pub extracted_props: Vec<String>,
    /// Behavior when the flush strategy reports failure.
    pub fallback: FallbackPolicy,
    /// Emit a trace event for every flush (one per animation frame).
    pub trace_flushes: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            extracted_props: SCROLL_PROPS.iter().map(|s| s.to_string()).collect(),
            fallback: FallbackPolicy::Redraw,
            trace_flushes: false,
        }
    }
}

impl BridgeConfig {
    /// Parse a config from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML text.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_extract_scroll_props() {
        let config = BridgeConfig::default();
        assert_eq!(config.extracted_props, vec!["scrollLeft", "scrollTop"]);
        assert_eq!(config.fallback, FallbackPolicy::Redraw);
        assert!(!config.trace_flushes);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BridgeConfig::from_toml_str("trace_flushes = true").unwrap();
        assert!(config.trace_flushes);
        assert_eq!(config.extracted_props, vec!["scrollLeft", "scrollTop"]);
    }

    #[test]
    fn test_parse_fallback_policy() {
        let config = BridgeConfig::from_toml_str(
            "fallback = \"ignore\"\nextracted_props = [\"scrollTop\"]",
        )
        .unwrap();
        assert_eq!(config.fallback, FallbackPolicy::Ignore);
        assert_eq!(config.extracted_props, vec!["scrollTop"]);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = BridgeConfig::from_toml_str("fallback = \"sometimes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fallback = \"ignore\"").unwrap();

        let config = BridgeConfig::load(file.path()).unwrap();
        assert_eq!(config.fallback, FallbackPolicy::Ignore);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = BridgeConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = BridgeConfig {
            fallback: FallbackPolicy::Ignore,
            ..Default::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(BridgeConfig::from_toml_str(&text).unwrap(), config);
    }
}

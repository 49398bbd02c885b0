// ABOUTME: Error types for loading and validating hide settings.
// ABOUTME: Lookups on the page never fail with an error; only configuration does.

use thiserror::Error;

/// Errors raised while loading or validating [`Settings`](crate::options::Settings).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings document is not valid JSON for the settings shape.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// The watched threshold is outside 0..=100.
    #[error("threshold must be between 0 and 100, got {0}")]
    Threshold(i64),

    /// A layout name does not match any built-in layout.
    #[error("unknown layout {name:?}, expected one of: {known}")]
    UnknownLayout { name: String, known: String },
}

impl ConfigError {
    /// Creates an UnknownLayout error listing the built-in layout names.
    pub fn unknown_layout(name: impl Into<String>) -> Self {
        ConfigError::UnknownLayout {
            name: name.into(),
            known: crate::extractors::layouts::builtin_layout_names().join(", "),
        }
    }

    /// Returns true if this is a Threshold error.
    pub fn is_threshold(&self) -> bool {
        matches!(self, ConfigError::Threshold(_))
    }

    /// Returns true if this is an UnknownLayout error.
    pub fn is_unknown_layout(&self) -> bool {
        matches!(self, ConfigError::UnknownLayout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ConfigError::Threshold(140).to_string(),
            "threshold must be between 0 and 100, got 140"
        );
        let err = ConfigError::unknown_layout("shorts");
        assert!(err.is_unknown_layout());
        assert!(err.to_string().contains("\"shorts\""));
        assert!(err.to_string().contains("home, search"));
    }

    #[test]
    fn test_parse_error_converts() {
        let err: ConfigError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(!err.is_threshold());
    }
}

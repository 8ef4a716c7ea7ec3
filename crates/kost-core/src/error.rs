//! Core error types for the SewaKost scraper.
//!
//! Subsystem crates wrap these in their own error enums.

use thiserror::Error;

/// Central error type for foundation-level operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors (invalid page index, malformed URL)
    #[error("validation error: {0}")]
    Validation(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Explicitly requested config file is missing
    #[error("config file not found at {path}")]
    NotFound {
        /// Path where config was expected
        path: String,
    },

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// I/O error reading config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::Validation("page index must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "validation error: page index must be at least 1"
        );

        let err = ConfigError::InvalidValue {
            field: "site.last_page".to_string(),
            reason: "must not be below first_page".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value for site.last_page: must not be below first_page"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let config_err: ConfigError = io_err.into();
        assert!(matches!(config_err, ConfigError::Io(_)));
    }
}

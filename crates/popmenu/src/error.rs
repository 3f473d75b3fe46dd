#![forbid(unsafe_code)]

//! Error types.
//!
//! Almost nothing in the engine fails: a missing anchor, an empty active
//! set, or a misused item all degrade to "the popup does nothing". Only
//! parsing user-supplied values and loading configuration return errors.

use std::fmt;

/// Errors produced when interpreting user-supplied menu values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuError {
    /// A placement string was not `start` or `end`.
    InvalidPlacement(String),
    /// A text direction string was not `ltr` or `rtl`.
    InvalidDirection(String),
}

impl fmt::Display for MenuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPlacement(value) => {
                write!(f, "invalid placement {value:?} (expected start or end)")
            }
            Self::InvalidDirection(value) => {
                write!(f, "invalid text direction {value:?} (expected ltr or rtl)")
            }
        }
    }
}

impl std::error::Error for MenuError {}

/// Errors that can occur when loading a [`MenuConfig`](crate::config::MenuConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn menu_error_display_names_value() {
        let err = MenuError::InvalidPlacement("middle".into());
        assert!(err.to_string().contains("\"middle\""));
        let err = MenuError::InvalidDirection("up".into());
        assert!(err.to_string().contains("ltr or rtl"));
    }

    #[test]
    fn config_error_validation_joins_messages() {
        let err = ConfigError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "validation errors: a; b");
        assert!(err.source().is_none());
    }

    #[test]
    fn config_error_io_has_source() {
        let err: ConfigError = std::io::Error::other("boom").into();
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("I/O error"));
    }
}

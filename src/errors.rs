//! Error types for mock generation and mock configuration.
//!
//! Every failure in this crate is a test-setup mistake, so nothing is retried
//! or masked: each variant is surfaced to the caller as soon as it is detected.
//!
//! # Example
//!
//! ```rust
//! use mocktail::errors::MockError;
//!
//! let err = MockError::unknown_method("Widget", "spin");
//! assert_eq!(err.to_string(), "Unknown method: Widget::spin");
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for mocktail operations
#[derive(Debug, Error)]
pub enum MockError {
    /// The source text holds no `class <Identifier>` declaration
    #[error("No class declaration found{}", display_path(.path))]
    NoClassFound { path: Option<PathBuf> },

    /// A declaration was found but could not be scanned to its end
    #[error("Parse error at byte {offset}: {message}")]
    Parse { offset: usize, message: String },

    /// A mock under this class name is already installed and redefinition is rejected
    #[error("Mock installation failed: class `{class}` is already defined")]
    MockInstallation { class: String },

    /// Return values were not a sequence, or a spy does not name an invokable
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No mock is installed under this class name
    #[error("Unknown class: {class}")]
    UnknownClass { class: String },

    /// The installed mock has no descriptor for this method
    #[error("Unknown method: {class}::{method}")]
    UnknownMethod { class: String, method: String },

    /// The method exists but does not support the requested helper
    #[error("Unsupported operation `{operation}` on {class}::{method}")]
    UnsupportedOperation {
        class: String,
        method: String,
        operation: &'static str,
    },

    /// An instance method was invoked through the class rather than an instance
    #[error("Non-static method {class}::{method} cannot be called statically")]
    NonStaticCall { class: String, method: String },

    /// The source file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A spy callback failed; its error is passed through unchanged
    #[error(transparent)]
    Spy(anyhow::Error),
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}

impl MockError {
    /// Create a missing-class error, optionally tied to the scanned file
    pub fn no_class_found(path: Option<PathBuf>) -> Self {
        Self::NoClassFound { path }
    }

    /// Create a parse error at a byte offset of the scanned text
    pub fn parse(offset: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            message: message.into(),
        }
    }

    pub fn installation(class: impl Into<String>) -> Self {
        Self::MockInstallation {
            class: class.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn unknown_class(class: impl Into<String>) -> Self {
        Self::UnknownClass {
            class: class.into(),
        }
    }

    pub fn unknown_method(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self::UnknownMethod {
            class: class.into(),
            method: method.into(),
        }
    }

    pub fn unsupported(
        class: impl Into<String>,
        method: impl Into<String>,
        operation: &'static str,
    ) -> Self {
        Self::UnsupportedOperation {
            class: class.into(),
            method: method.into(),
            operation,
        }
    }

    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error came from a user spy rather than from mocktail itself
    pub fn is_spy_failure(&self) -> bool {
        matches!(self, Self::Spy(_))
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, MockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_class_found_message_includes_path() {
        let err = MockError::no_class_found(Some(PathBuf::from("src/Widget.php")));
        assert_eq!(
            err.to_string(),
            "No class declaration found in src/Widget.php"
        );

        let err = MockError::no_class_found(None);
        assert_eq!(err.to_string(), "No class declaration found");
    }

    #[test]
    fn test_spy_error_is_transparent() {
        let err = MockError::Spy(anyhow::anyhow!("observer exploded"));
        assert!(err.is_spy_failure());
        assert_eq!(err.to_string(), "observer exploded");
    }

    #[test]
    fn test_unsupported_operation_message() {
        let err = MockError::unsupported("Widget", "Constructor", "set_return_values");
        assert_eq!(
            err.to_string(),
            "Unsupported operation `set_return_values` on Widget::Constructor"
        );
    }
}

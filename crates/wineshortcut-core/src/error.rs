//! Error types for wineshortcut.
//!
//! Only two conditions abort a run: a missing input executable and an
//! unparseable configuration file. Everything else is reported as a warning
//! by the caller and the pipeline carries on with whatever it can still do.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for the shortcut builder.
#[derive(Debug, Error)]
pub enum ShortcutError {
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Configuration error in {path:?}: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Destination folder not found: {0}")]
    DestinationMissing(PathBuf),

    #[error("Platform error: {message}")]
    Platform { message: String },
}

/// Failures of the external icon extraction tool.
///
/// These never abort shortcut creation; they are logged and mapped to
/// "no icon".
#[derive(Debug, Error)]
pub enum IconError {
    #[error("{tool} not found in PATH")]
    ToolNotFound { tool: String },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("{tool} did not finish within {timeout:?}")]
    Timeout { tool: String, timeout: Duration },

    #[error("no suitable icon resource in {0}")]
    NoSuitableResource(PathBuf),

    #[error("no icon file produced at {0}")]
    NotExtracted(PathBuf),

    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for shortcut operations.
pub type Result<T> = std::result::Result<T, ShortcutError>;

impl From<std::io::Error> for ShortcutError {
    fn from(err: std::io::Error) -> Self {
        ShortcutError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl ShortcutError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        ShortcutError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Create a configuration error tied to a file.
    pub fn config(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        ShortcutError::Config {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Whether this error aborts the run before any output is produced.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ShortcutError::InputNotFound(_) | ShortcutError::Config { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ShortcutError::InputNotFound(PathBuf::from("/tmp/App.exe"));
        assert_eq!(err.to_string(), "Input file not found: /tmp/App.exe");
    }

    #[test]
    fn test_fatal_errors() {
        assert!(ShortcutError::InputNotFound(PathBuf::from("x.exe")).is_fatal());
        assert!(ShortcutError::config("bad json", "wineshortcut.json").is_fatal());
        assert!(!ShortcutError::DestinationMissing(PathBuf::from("/nope")).is_fatal());
        assert!(!ShortcutError::Platform {
            message: "no desktop".into()
        }
        .is_fatal());
    }

    #[test]
    fn test_icon_error_display() {
        let err = IconError::NotExtracted(PathBuf::from("/a/App.png"));
        assert_eq!(err.to_string(), "no icon file produced at /a/App.png");
    }
}

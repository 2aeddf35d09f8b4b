//! Error types shared across gdmovie crates.

use std::path::PathBuf;

/// Top-level error type for gdmovie operations.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Source project not found: {path} is not a directory")]
    SourceNotFound { path: PathBuf },

    #[error("Output path is a directory: {path}")]
    OutputIsDirectory { path: PathBuf },

    #[error("Invalid resolution override {width}x{height}: both axes must be set, or neither")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Invalid resolution '{value}': expected <width>x<height>")]
    InvalidResolutionFormat { value: String },

    #[error("Invalid verbosity '{value}': expected -1, 0, 1 or 2")]
    InvalidVerbosity { value: String },

    #[error("Invalid engine version '{value}'")]
    InvalidVersion { value: String },

    #[error("Failed to launch engine: {message}")]
    LaunchFailed { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias using ExportError.
pub type ExportResult<T> = Result<T, ExportError>;

impl ExportError {
    pub fn launch(msg: impl Into<String>) -> Self {
        Self::LaunchFailed {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers_build_message_variants() {
        assert_eq!(
            ExportError::launch("spawn failed").to_string(),
            "Failed to launch engine: spawn failed"
        );
        assert_eq!(
            ExportError::config("bad json").to_string(),
            "Configuration error: bad json"
        );
    }

    #[test]
    fn test_error_messages_name_the_path() {
        let err = ExportError::OutputIsDirectory {
            path: PathBuf::from("/tmp/out"),
        };
        assert_eq!(err.to_string(), "Output path is a directory: /tmp/out");
    }
}

//! Error types for `duofm-core`.
//!
//! All fallible operations in the core library return [`CoreResult<T>`],
//! which is an alias for `Result<T, CoreError>`. None of these errors is
//! fatal to the application: the dispatcher folds every one of them into the
//! status line and carries on.

use std::path::PathBuf;

/// Unified error type for all core operations.
///
/// Each variant captures just enough context for the caller to display
/// a meaningful message or take corrective action.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The target path does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The process lacks permission to access the path.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// A directory was expected but the path points to a file.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An external copy/move/delete command failed.
    ///
    /// `output` holds the command's captured output, newline-joined.
    #[error("{message}: {output}")]
    Operation { message: String, output: String },

    /// A root-folder guard refused the operation before any process ran.
    #[error("{0}")]
    SafetyRejection(String),

    /// The interactive shell failed to start or exited abnormally.
    #[error("{0}")]
    ShellLaunch(String),

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Returns `true` for the errors a directory listing can produce.
    pub fn is_list_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::PermissionDenied(_) | Self::NotADirectory(_) | Self::Io(_)
        )
    }
}

/// Convenience alias used throughout `duofm-core`.
pub type CoreResult<T> = Result<T, CoreError>;

//! Error types for the core module.

use std::path::PathBuf;

/// Core error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No tag, no commit and no manifest version could be found.
    #[error("Unable to determine a build version.")]
    Unresolved,

    /// A git query exited unsuccessfully or could not be spawned.
    #[error("git {args} failed: {message}")]
    Git {
        /// Arguments passed to git.
        args: String,
        /// Trimmed stderr, or the spawn error.
        message: String,
    },

    /// The nearest manifest exists but could not be read or parsed.
    #[error("invalid manifest {}: {message}", path.display())]
    Manifest {
        /// Path of the offending manifest.
        path: PathBuf,
        /// Parser or read error.
        message: String,
    },

    /// The current OS user could not be determined.
    #[error("unable to determine the current user: {0}")]
    Identity(#[source] std::io::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

//! Resolution options.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Options scoping a single version resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Directory all lookups run in. Defaults to the process current directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
}

impl ResolveOptions {
    /// Options scoped to `cwd`.
    #[must_use]
    pub fn with_cwd(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(cwd.into()),
        }
    }

    /// Absolute working directory for lookups.
    ///
    /// Relative paths are resolved against the process current directory.
    /// The directory does not need to exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the process current directory is unavailable.
    pub fn working_dir(&self) -> std::io::Result<PathBuf> {
        match &self.cwd {
            Some(cwd) if cwd.is_absolute() => Ok(cwd.clone()),
            Some(cwd) => std::path::absolute(cwd),
            None => std::env::current_dir(),
        }
    }
}

//! Version control queries.
//!
//! The resolver only needs three answers from the VCS: the tag at `HEAD`,
//! the short id of `HEAD`, and whether the working tree has changes.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use super::error::{Error, Result};

/// Version control queries scoped to a working directory.
#[async_trait]
pub trait Vcs: Send + Sync {
    /// Tag pointing exactly at `HEAD`, as printed by the VCS.
    async fn exact_tag(&self, cwd: &Path) -> Result<String>;

    /// Abbreviated id of the `HEAD` commit.
    async fn short_hash(&self, cwd: &Path) -> Result<String>;

    /// Whether the working tree differs from `HEAD`, untracked files included.
    async fn is_dirty(&self, cwd: &Path) -> Result<bool>;
}

/// [`Vcs`] backed by the `git` binary on `PATH`.
#[derive(Debug, Clone, Default)]
pub struct Git;

/// Environment variables that redirect git away from its working directory.
const REPOSITORY_OVERRIDES: &[&str] = &["GIT_DIR", "GIT_WORK_TREE", "GIT_INDEX_FILE"];

impl Git {
    /// Git invocation scoped to `cwd`, ignoring inherited repository overrides.
    fn command(cwd: &Path, args: &[&str]) -> Command {
        let mut command = Command::new("git");
        command.args(args).current_dir(cwd).kill_on_drop(true);
        for var in REPOSITORY_OVERRIDES {
            command.env_remove(var);
        }
        command
    }

    /// Run git with `args` in `cwd` and return stdout with trailing whitespace removed.
    async fn run(cwd: &Path, args: &[&str]) -> Result<String> {
        tracing::trace!(cwd = %cwd.display(), ?args, "running git");

        let output = Self::command(cwd, args)
            .output()
            .await
            .map_err(|e| Error::Git {
                args: args.join(" "),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(Error::Git {
                args: args.join(" "),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .trim_end()
            .to_string())
    }
}

#[async_trait]
impl Vcs for Git {
    async fn exact_tag(&self, cwd: &Path) -> Result<String> {
        Self::run(cwd, &["describe", "--exact-match", "HEAD"]).await
    }

    async fn short_hash(&self, cwd: &Path) -> Result<String> {
        Self::run(cwd, &["rev-parse", "--short", "HEAD"]).await
    }

    async fn is_dirty(&self, cwd: &Path) -> Result<bool> {
        let status = Self::run(cwd, &["status", "--porcelain"]).await?;
        Ok(!status.trim().is_empty())
    }
}

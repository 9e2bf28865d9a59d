//! Current OS user lookup.

use async_trait::async_trait;

use super::error::{Error, Result};

/// Source of the username recorded in dirty build metadata.
#[async_trait]
pub trait Identity: Send + Sync {
    /// Name of the current OS user.
    async fn username(&self) -> Result<String>;
}

/// [`Identity`] backed by the operating system's user database.
#[derive(Debug, Clone, Default)]
pub struct OsIdentity;

#[async_trait]
impl Identity for OsIdentity {
    async fn username(&self) -> Result<String> {
        whoami::fallible::username().map_err(Error::Identity)
    }
}

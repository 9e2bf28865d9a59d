//! Core version resolution shared by the library API and the CLI.

mod error;
pub mod identity;
pub mod manifest;
pub mod resolver;
pub mod vcs;

pub use error::{Error, Result};
pub use identity::{Identity, OsIdentity};
pub use manifest::{ManifestFinder, ManifestSource};
pub use resolver::{BuildVersion, VersionResolver, VersionSource, resolve};
pub use vcs::{Git, Vcs};

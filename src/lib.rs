//! Build version resolution from git state and package manifests.
//!
//! The version is taken from the first source that answers:
//!
//! ```text
//! exact tag at HEAD ──► short HEAD id ──► nearest manifest version
//!        │                    │
//!        └──── + user.timestamp when the working tree is dirty
//! ```
//!
//! ```no_run
//! # async fn demo() -> build_version::Result<()> {
//! let version = build_version::resolve(&build_version::ResolveOptions::default()).await?;
//! println!("{version}");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod core;

pub use config::ResolveOptions;
pub use crate::core::{BuildVersion, Error, Result, VersionResolver, VersionSource, resolve};

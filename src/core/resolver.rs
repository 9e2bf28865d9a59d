//! Build version resolution.
//!
//! Tries, in order, the tag at `HEAD`, the short id of `HEAD`, and the
//! nearest manifest's declared version. VCS-derived versions get semver
//! build metadata (`+user.timestamp`) when the working tree is dirty.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::{Error, Result};
use super::identity::{Identity, OsIdentity};
use super::manifest::{ManifestFinder, ManifestSource};
use super::vcs::{Git, Vcs};
use crate::config::ResolveOptions;

/// Prefix stripped from version tags.
pub const TAG_PREFIX: char = 'v';

/// Starts semver build metadata.
const BUILD_METADATA_START: char = '+';

/// Separates build metadata identifiers.
const BUILD_METADATA_SEPARATOR: char = '.';

/// Compact ISO 8601 UTC timestamp. Contains no `.` so it stays one semver identifier.
const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Where a resolved version came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionSource {
    /// Tag pointing exactly at `HEAD`.
    Tag,
    /// Short id of `HEAD`.
    Commit,
    /// Nearest package manifest.
    Manifest,
}

impl fmt::Display for VersionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag => write!(f, "tag"),
            Self::Commit => write!(f, "commit"),
            Self::Manifest => write!(f, "manifest"),
        }
    }
}

/// A resolved build version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildVersion {
    version: String,
    source: VersionSource,
    dirty: bool,
}

impl BuildVersion {
    /// The version string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.version
    }

    /// Where the version came from.
    #[must_use]
    pub const fn source(&self) -> VersionSource {
        self.source
    }

    /// Whether dirty build metadata was appended.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Consume into the version string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.version
    }
}

impl fmt::Display for BuildVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.version)
    }
}

/// Strip a single leading `v` from a tag name.
#[must_use]
pub fn strip_tag_prefix(tag: &str) -> &str {
    tag.strip_prefix(TAG_PREFIX).unwrap_or(tag)
}

/// Append `user.timestamp` build metadata to `version`.
///
/// Extends existing build metadata with `.` instead of opening a second `+`.
#[must_use]
pub fn append_build_metadata(version: &str, user: &str, at: DateTime<Utc>) -> String {
    let join = if version.contains(BUILD_METADATA_START) {
        BUILD_METADATA_SEPARATOR
    } else {
        BUILD_METADATA_START
    };
    format!(
        "{version}{join}{user}{BUILD_METADATA_SEPARATOR}{}",
        at.format(TIMESTAMP_FORMAT)
    )
}

/// Resolves build versions through pluggable collaborators.
#[derive(Debug, Clone, Default)]
pub struct VersionResolver<V = Git, M = ManifestFinder, I = OsIdentity> {
    vcs: V,
    manifest: M,
    identity: I,
}

impl VersionResolver {
    /// Resolver using git, filesystem manifests and the OS user.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<V: Vcs, M: ManifestSource, I: Identity> VersionResolver<V, M, I> {
    /// Resolver using custom collaborators.
    pub const fn with_collaborators(vcs: V, manifest: M, identity: I) -> Self {
        Self {
            vcs,
            manifest,
            identity,
        }
    }

    /// Resolve the build version for `options`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unresolved`] when neither a tag, a commit nor a
    /// manifest version exists. Status, identity and manifest parse
    /// failures are returned as their own variants.
    pub async fn resolve(&self, options: &ResolveOptions) -> Result<BuildVersion> {
        let cwd = options.working_dir()?;
        self.resolve_in(&cwd).await
    }

    /// Resolve the build version for an explicit working directory.
    ///
    /// # Errors
    ///
    /// See [`VersionResolver::resolve`].
    pub async fn resolve_in(&self, cwd: &Path) -> Result<BuildVersion> {
        let vcs_version = match self.vcs.exact_tag(cwd).await {
            Ok(tag) => Some((strip_tag_prefix(&tag).to_string(), VersionSource::Tag)),
            Err(e) => {
                tracing::debug!(error = %e, "no exact tag at HEAD");
                match self.vcs.short_hash(cwd).await {
                    Ok(hash) => Some((hash, VersionSource::Commit)),
                    Err(e) => {
                        tracing::debug!(error = %e, "no commit at HEAD");
                        None
                    }
                }
            }
        };

        if let Some((version, source)) = vcs_version {
            tracing::debug!(%version, %source, "resolved version from vcs");
            return self.suffix(cwd, version, source).await;
        }

        match self.manifest.version(cwd).await? {
            Some(version) => {
                tracing::debug!(%version, "resolved version from manifest");
                Ok(BuildVersion {
                    version,
                    source: VersionSource::Manifest,
                    dirty: false,
                })
            }
            None => Err(Error::Unresolved),
        }
    }

    async fn suffix(
        &self,
        cwd: &Path,
        version: String,
        source: VersionSource,
    ) -> Result<BuildVersion> {
        if !self.vcs.is_dirty(cwd).await? {
            return Ok(BuildVersion {
                version,
                source,
                dirty: false,
            });
        }

        let user = self.identity.username().await?;
        let version = append_build_metadata(&version, &user, Utc::now());
        tracing::debug!(%version, "working tree is dirty");

        Ok(BuildVersion {
            version,
            source,
            dirty: true,
        })
    }
}

/// Resolve the build version with the default collaborators.
///
/// # Errors
///
/// Returns [`Error::Unresolved`] when no version source is available.
pub async fn resolve(options: &ResolveOptions) -> Result<String> {
    VersionResolver::new()
        .resolve(options)
        .await
        .map(BuildVersion::into_string)
}

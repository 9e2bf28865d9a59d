//! Nearest package manifest lookup.
//!
//! Walks from a directory up through its ancestors and reads the declared
//! version of the first manifest found. The walk stops at that manifest even
//! when it declares no version.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use super::error::{Error, Result};

/// Manifest file names checked in each directory, in priority order.
pub const MANIFEST_NAMES: &[&str] = &["package.json", "Cargo.toml"];

/// Source of a manifest-declared version.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Version declared by the manifest nearest to `cwd`, if any.
    async fn version(&self, cwd: &Path) -> Result<Option<String>>;
}

/// [`ManifestSource`] that searches the filesystem upward from `cwd`.
#[derive(Debug, Clone, Default)]
pub struct ManifestFinder;

#[derive(Deserialize)]
struct PackageJson {
    version: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct CargoManifest {
    package: Option<CargoPackage>,
}

#[derive(Deserialize)]
struct CargoPackage {
    version: Option<toml::Value>,
}

/// `start` as an absolute path with `.` and `..` resolved.
///
/// Existing directories are canonicalized. Missing ones are normalized
/// lexically so their existing ancestors can still be searched.
async fn normalize(start: &Path) -> PathBuf {
    if let Ok(real) = tokio::fs::canonicalize(start).await {
        return real;
    }

    let absolute = std::path::absolute(start).unwrap_or_else(|_| start.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

impl ManifestFinder {
    /// Path of the nearest manifest at or above `start`.
    pub async fn find(start: &Path) -> Option<PathBuf> {
        let start = normalize(start).await;
        for dir in start.ancestors() {
            for name in MANIFEST_NAMES {
                let candidate = dir.join(name);
                if tokio::fs::metadata(&candidate)
                    .await
                    .is_ok_and(|m| m.is_file())
                {
                    return Some(candidate);
                }
            }
        }
        None
    }

    /// Read the declared version from a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Manifest`] if the file cannot be read or parsed.
    pub async fn read_version(path: &Path) -> Result<Option<String>> {
        let manifest_error = |message: String| Error::Manifest {
            path: path.to_path_buf(),
            message,
        };

        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| manifest_error(e.to_string()))?;

        let version = if path.extension().is_some_and(|ext| ext == "toml") {
            let manifest: CargoManifest =
                toml::from_str(&contents).map_err(|e| manifest_error(e.to_string()))?;
            manifest
                .package
                .and_then(|p| p.version)
                .and_then(|v| v.as_str().map(str::to_string))
        } else {
            let manifest: PackageJson =
                serde_json::from_str(&contents).map_err(|e| manifest_error(e.to_string()))?;
            manifest
                .version
                .and_then(|v| v.as_str().map(str::to_string))
        };

        Ok(version.filter(|v| !v.is_empty()))
    }
}

#[async_trait]
impl ManifestSource for ManifestFinder {
    async fn version(&self, cwd: &Path) -> Result<Option<String>> {
        let Some(path) = Self::find(cwd).await else {
            tracing::debug!(cwd = %cwd.display(), "no manifest found");
            return Ok(None);
        };

        tracing::debug!(path = %path.display(), "reading manifest");
        Self::read_version(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) {
        std::fs::write(dir.join(name), contents).unwrap();
    }

    #[tokio::test]
    async fn reads_package_json_version() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "package.json", r#"{"version":"2.0.0"}"#);

        let version = ManifestFinder.version(temp.path()).await.unwrap();
        assert_eq!(version.as_deref(), Some("2.0.0"));
    }

    #[tokio::test]
    async fn reads_cargo_package_version() {
        let temp = tempfile::tempdir().unwrap();
        write(
            temp.path(),
            "Cargo.toml",
            "[package]\nname = \"demo\"\nversion = \"0.3.1\"\n",
        );

        let version = ManifestFinder.version(temp.path()).await.unwrap();
        assert_eq!(version.as_deref(), Some("0.3.1"));
    }

    #[tokio::test]
    async fn package_json_wins_in_the_same_directory() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "package.json", r#"{"version":"1.0.0"}"#);
        write(temp.path(), "Cargo.toml", "[package]\nversion = \"9.9.9\"\n");

        let version = ManifestFinder.version(temp.path()).await.unwrap();
        assert_eq!(version.as_deref(), Some("1.0.0"));
    }

    #[tokio::test]
    async fn walks_up_to_parent_directories() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "package.json", r#"{"version":"4.5.6"}"#);
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let version = ManifestFinder.version(&nested).await.unwrap();
        assert_eq!(version.as_deref(), Some("4.5.6"));
    }

    #[tokio::test]
    async fn nearest_manifest_without_version_stops_the_walk() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "package.json", r#"{"version":"4.5.6"}"#);
        let nested = temp.path().join("child");
        std::fs::create_dir_all(&nested).unwrap();
        write(&nested, "package.json", r#"{"name":"child"}"#);

        let version = ManifestFinder.version(&nested).await.unwrap();
        assert_eq!(version, None);
    }

    #[tokio::test]
    async fn workspace_inherited_version_counts_as_missing() {
        let temp = tempfile::tempdir().unwrap();
        write(
            temp.path(),
            "Cargo.toml",
            "[package]\nname = \"demo\"\nversion.workspace = true\n",
        );

        let version = ManifestFinder.version(temp.path()).await.unwrap();
        assert_eq!(version, None);
    }

    #[tokio::test]
    async fn non_string_or_empty_version_counts_as_missing() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "package.json", r#"{"version":3}"#);
        assert_eq!(ManifestFinder.version(temp.path()).await.unwrap(), None);

        write(temp.path(), "package.json", r#"{"version":""}"#);
        assert_eq!(ManifestFinder.version(temp.path()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn malformed_manifest_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "package.json", "{ not json");

        let err = ManifestFinder.version(temp.path()).await.unwrap_err();
        match err {
            Error::Manifest { path, .. } => {
                assert_eq!(path, temp.path().canonicalize().unwrap().join("package.json"));
            }
            other => panic!("expected manifest error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn directory_named_like_a_manifest_is_skipped() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "package.json", r#"{"version":"7.0.0"}"#);
        let nested = temp.path().join("child");
        std::fs::create_dir_all(nested.join("package.json")).unwrap();

        let version = ManifestFinder.version(&nested).await.unwrap();
        assert_eq!(version.as_deref(), Some("7.0.0"));
    }

    /// `proj/sub` holds the only manifest; `proj/other` has none.
    fn sibling_layout() -> (tempfile::TempDir, PathBuf) {
        let temp = tempfile::tempdir().unwrap();
        let sub = temp.path().join("proj").join("sub");
        std::fs::create_dir_all(&sub).unwrap();
        std::fs::create_dir_all(temp.path().join("proj").join("other")).unwrap();
        write(&sub, "package.json", r#"{"version":"6.6.6"}"#);
        (temp, sub)
    }

    #[tokio::test]
    async fn parent_dir_component_does_not_visit_the_child() {
        let (_temp, sub) = sibling_layout();

        let version = ManifestFinder.version(&sub.join("..")).await.unwrap();
        assert_eq!(version, None);
    }

    #[tokio::test]
    async fn parent_dir_component_does_not_visit_a_sibling() {
        let (_temp, sub) = sibling_layout();

        let version = ManifestFinder
            .version(&sub.join("..").join("other"))
            .await
            .unwrap();
        assert_eq!(version, None);
    }

    #[tokio::test]
    async fn missing_directory_is_normalized_before_walking() {
        let (_temp, sub) = sibling_layout();

        let found = ManifestFinder::find(&sub.join("..").join("gone").join(".")).await;
        assert_eq!(found, None);

        let found = ManifestFinder::find(&sub.join("gone").join("..").join("deeper")).await;
        assert_eq!(found, Some(sub.join("package.json")));
    }
}

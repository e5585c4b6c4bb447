//! Mount table mapping mount points to container sources.
//!
//! A mount binds a path such as `/mnt/Files/Validated` to an `abfss://`
//! source. Reads go to the local directory that backs the mount, so a path
//! like `dbfs:/mnt/Files/Validated/movies.csv` resolves to
//! `<local_root>/movies.csv`.
//!
//! ## Rust concept: interior mutability
//! `MountTable` methods take `&self` and guard the entries with a `RwLock`,
//! so one table can be shared across tasks behind an `Arc`.

use crate::error::{Result, StorageError};
use crate::oauth::OAuthCredentials;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info, instrument};

/// What to mount and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountSpec {
    pub account_name: String,
    pub container_name: String,
    pub folder_name: String,
    pub mount_point: String,
    pub local_root: PathBuf,
}

impl MountSpec {
    /// `abfss://<container>@<account>.dfs.core.windows.net/<folder>`
    pub fn source(&self) -> String {
        format!(
            "abfss://{}@{}.dfs.core.windows.net/{}",
            self.container_name, self.account_name, self.folder_name
        )
    }
}

/// An active mount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountInfo {
    pub mount_point: String,
    pub source: String,
    pub local_root: PathBuf,
    pub extra_configs: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    Mounted,
    /// The mount point was already in use; nothing changed
    AlreadyMounted,
}

#[derive(Debug, Default)]
pub struct MountTable {
    mounts: RwLock<BTreeMap<String, MountInfo>>,
}

impl MountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `spec` unless its mount point is already taken
    #[instrument(skip(self, spec, credentials), fields(mount_point = %spec.mount_point))]
    pub fn mount(&self, spec: &MountSpec, credentials: &OAuthCredentials) -> Result<MountOutcome> {
        let mount_point = normalize_mount_point(&spec.mount_point)?;

        let mut mounts = self.mounts.write().unwrap_or_else(PoisonError::into_inner);
        if mounts.contains_key(&mount_point) {
            info!("{} is already mounted, skipping", mount_point);
            return Ok(MountOutcome::AlreadyMounted);
        }

        if !spec.local_root.is_dir() {
            return Err(StorageError::MissingBackingDir {
                path: spec.local_root.display().to_string(),
            });
        }

        let info = MountInfo {
            mount_point: mount_point.clone(),
            source: spec.source(),
            local_root: spec.local_root.clone(),
            extra_configs: credentials.extra_configs(),
        };
        info!("Mounted {} at {}", info.source, mount_point);
        mounts.insert(mount_point, info);

        Ok(MountOutcome::Mounted)
    }

    /// Snapshot of the active mounts, ordered by mount point
    pub fn mounts(&self) -> Vec<MountInfo> {
        self.mounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    pub fn unmount(&self, mount_point: &str) -> Result<()> {
        let mount_point = normalize_mount_point(mount_point)?;
        let removed = self
            .mounts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&mount_point);

        match removed {
            Some(_) => {
                info!("Unmounted {}", mount_point);
                Ok(())
            }
            None => Err(StorageError::NotMounted { path: mount_point }),
        }
    }

    /// Map a mounted path to its local file
    ///
    /// Accepts `dbfs:/mnt/...` or `/mnt/...`. The longest matching mount
    /// point wins. `..` components are rejected.
    pub fn resolve(&self, path: &str) -> Result<PathBuf> {
        let stripped = path.strip_prefix("dbfs:").unwrap_or(path);
        if !stripped.starts_with('/') {
            return Err(StorageError::InvalidPath {
                path: path.to_string(),
                reason: "must be absolute".to_string(),
            });
        }

        let mounts = self.mounts.read().unwrap_or_else(PoisonError::into_inner);
        let (mount_point, info) = mounts
            .iter()
            .filter(|(mp, _)| is_under(stripped, mp))
            .max_by_key(|(mp, _)| mp.len())
            .ok_or_else(|| StorageError::NotMounted {
                path: path.to_string(),
            })?;

        let rest = stripped[mount_point.len()..].trim_start_matches('/');
        let relative = Path::new(rest);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(StorageError::InvalidPath {
                path: path.to_string(),
                reason: "escapes the mount".to_string(),
            });
        }

        let resolved = info.local_root.join(relative);
        debug!("Resolved {} to {}", path, resolved.display());
        Ok(resolved)
    }

    /// Entries directly under a mounted directory, sorted by path
    pub fn list(&self, path: &str) -> Result<Vec<PathBuf>> {
        let dir = self.resolve(path)?;
        let mut entries = std::fs::read_dir(&dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();
        Ok(entries)
    }
}

/// Mount points are absolute and carry no trailing slash
fn normalize_mount_point(mount_point: &str) -> Result<String> {
    let trimmed = mount_point.trim_end_matches('/');
    if !trimmed.starts_with('/') {
        return Err(StorageError::InvalidPath {
            path: mount_point.to_string(),
            reason: "mount point must be absolute".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn is_under(path: &str, mount_point: &str) -> bool {
    path == mount_point
        || path
            .strip_prefix(mount_point)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn credentials() -> OAuthCredentials {
        OAuthCredentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            tenant_id: "tenant".to_string(),
        }
    }

    fn spec(root: &Path) -> MountSpec {
        MountSpec {
            account_name: "moviedata983940".to_string(),
            container_name: "validated".to_string(),
            folder_name: "Data".to_string(),
            mount_point: "/mnt/Files/Validated".to_string(),
            local_root: root.to_path_buf(),
        }
    }

    #[test]
    fn test_mount_twice_is_noop() {
        let dir = TempDir::new().unwrap();
        let table = MountTable::new();

        assert_eq!(
            table.mount(&spec(dir.path()), &credentials()).unwrap(),
            MountOutcome::Mounted
        );
        assert_eq!(
            table.mount(&spec(dir.path()), &credentials()).unwrap(),
            MountOutcome::AlreadyMounted
        );
        assert_eq!(table.mounts().len(), 1);
    }

    #[test]
    fn test_trailing_slash_is_same_mount() {
        let dir = TempDir::new().unwrap();
        let table = MountTable::new();
        table.mount(&spec(dir.path()), &credentials()).unwrap();

        let mut again = spec(dir.path());
        again.mount_point.push('/');
        assert_eq!(
            table.mount(&again, &credentials()).unwrap(),
            MountOutcome::AlreadyMounted
        );
    }

    #[test]
    fn test_missing_backing_dir() {
        let table = MountTable::new();
        let err = table
            .mount(&spec(Path::new("/definitely/not/here")), &credentials())
            .unwrap_err();
        assert!(matches!(err, StorageError::MissingBackingDir { .. }));
        assert!(table.mounts().is_empty());
    }

    #[test]
    fn test_resolve_and_list() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("movies.csv"), "movieId,title\n").unwrap();
        std::fs::write(dir.path().join("ratings.csv"), "userId,movieId,rating\n").unwrap();

        let table = MountTable::new();
        table.mount(&spec(dir.path()), &credentials()).unwrap();

        let resolved = table.resolve("dbfs:/mnt/Files/Validated/movies.csv").unwrap();
        assert_eq!(resolved, dir.path().join("movies.csv"));
        assert_eq!(
            table.resolve("/mnt/Files/Validated/ratings.csv").unwrap(),
            dir.path().join("ratings.csv")
        );

        let files = table.list("dbfs:/mnt/Files/Validated").unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("movies.csv"), dir.path().join("ratings.csv")]
        );
    }

    #[test]
    fn test_resolve_errors() {
        let dir = TempDir::new().unwrap();
        let table = MountTable::new();
        table.mount(&spec(dir.path()), &credentials()).unwrap();

        assert!(matches!(
            table.resolve("/mnt/Files/Other/movies.csv"),
            Err(StorageError::NotMounted { .. })
        ));
        // Prefix match must stop at a path boundary
        assert!(matches!(
            table.resolve("/mnt/Files/ValidatedX/movies.csv"),
            Err(StorageError::NotMounted { .. })
        ));
        assert!(matches!(
            table.resolve("/mnt/Files/Validated/../secret"),
            Err(StorageError::InvalidPath { .. })
        ));
        assert!(matches!(
            table.resolve("relative/path"),
            Err(StorageError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_unmount() {
        let dir = TempDir::new().unwrap();
        let table = MountTable::new();
        table.mount(&spec(dir.path()), &credentials()).unwrap();

        table.unmount("/mnt/Files/Validated").unwrap();
        assert!(table.mounts().is_empty());
        assert!(matches!(
            table.unmount("/mnt/Files/Validated"),
            Err(StorageError::NotMounted { .. })
        ));
    }

    #[test]
    fn test_mount_records_configs() {
        let dir = TempDir::new().unwrap();
        let table = MountTable::new();
        table.mount(&spec(dir.path()), &credentials()).unwrap();

        let info = &table.mounts()[0];
        assert_eq!(
            info.source,
            "abfss://validated@moviedata983940.dfs.core.windows.net/Data"
        );
        assert_eq!(info.extra_configs.len(), 5);
    }
}

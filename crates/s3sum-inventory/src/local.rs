use std::io;
use std::path::{Path, PathBuf};

use s3sum_types::{paths, LocalFileDescriptor};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{InventoryError, InventoryResult};

/// What the local tree holds at a key's mirror path.
#[derive(Debug)]
pub enum LocalEntry {
    /// A regular file exists at the path.
    File(PathBuf),
    /// Nothing (or something other than a regular file) is at the path.
    Absent,
    /// The path could not be inspected.
    Inaccessible(io::Error),
}

/// The local side of a comparison: a directory mirroring the bucket root.
///
/// The tree is only ever read. Keys map to paths by joining them onto the
/// root, and files map back to keys through [`paths::relative_key`].
#[derive(Clone, Debug)]
pub struct LocalTree {
    root: PathBuf,
}

impl LocalTree {
    /// Open a tree rooted at `root`, which must be an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> InventoryResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(InventoryError::InvalidRoot(root));
        }
        Ok(Self { root })
    }

    /// The comparison root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path that mirrors `key`.
    pub fn resolve(&self, key: &str) -> PathBuf {
        paths::local_path(&self.root, key)
    }

    /// Every regular file whose relative key starts with `prefix`.
    ///
    /// Symlinks are never followed, neither as files nor as directories on
    /// the way down. Any walk error fails the whole listing, except that a
    /// prefix directory that does not exist simply yields no files. Results
    /// are sorted by relative path.
    pub fn list_files(&self, prefix: Option<&str>) -> InventoryResult<Vec<LocalFileDescriptor>> {
        let base = paths::scan_base(&self.root, prefix);
        if !self.is_real_directory(&base)? {
            debug!(base = %base.display(), "prefix directory absent locally");
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&base).follow_links(false) {
            let entry = entry.map_err(|e| InventoryError::LocalWalk {
                path: e.path().map(Path::to_path_buf).unwrap_or_else(|| base.clone()),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(key) = paths::relative_key(&self.root, entry.path()) else {
                continue;
            };
            if paths::key_matches_prefix(&key, prefix) {
                files.push(LocalFileDescriptor::new(key));
            }
        }
        files.sort();

        info!(root = %self.root.display(), files = files.len(), "local inventory complete");
        Ok(files)
    }

    /// Inspect the mirror path of `key`.
    ///
    /// Applies the same rules as [`list_files`](Self::list_files): the key
    /// only names a file if every directory below the root is a real
    /// directory and the final entry is a regular file, not a symlink.
    pub async fn locate(&self, key: &str) -> LocalEntry {
        let path = self.resolve(key);
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return LocalEntry::Absent;
        };

        let mut current = self.root.clone();
        let mut components = relative.components().peekable();
        while let Some(component) = components.next() {
            current.push(component);
            let meta = match tokio::fs::symlink_metadata(&current).await {
                Ok(meta) => meta,
                Err(e) if e.kind() == io::ErrorKind::NotFound => return LocalEntry::Absent,
                Err(e) => return LocalEntry::Inaccessible(e),
            };
            if components.peek().is_none() {
                return if meta.is_file() {
                    LocalEntry::File(path)
                } else {
                    LocalEntry::Absent
                };
            }
            if !meta.is_dir() {
                return LocalEntry::Absent;
            }
        }
        LocalEntry::Absent
    }

    /// Whether `dir` exists and no component between the root and it is a
    /// symlink. The root itself may be one.
    fn is_real_directory(&self, dir: &Path) -> InventoryResult<bool> {
        let Ok(relative) = dir.strip_prefix(&self.root) else {
            return Ok(false);
        };
        let mut current = self.root.clone();
        for component in relative.components() {
            current.push(component);
            match std::fs::symlink_metadata(&current) {
                Ok(meta) if meta.is_dir() => {}
                Ok(_) => return Ok(false),
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
                Err(e) => {
                    return Err(InventoryError::LocalWalk {
                        path: current,
                        reason: e.to_string(),
                    })
                }
            }
        }
        Ok(self.root.is_dir())
    }
}

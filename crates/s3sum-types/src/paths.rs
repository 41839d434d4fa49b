//! Path normalization between object keys and local files.
//!
//! Object keys are already `/`-separated. Local paths are made relative to
//! the comparison root and their components joined with `/`, so a key and a
//! relative path refer to the same object exactly when the strings are equal.
//! `.` and `..` segments are not collapsed; inputs are trusted.

use std::path::{Component, Path, PathBuf};

/// The canonical key separator.
pub const SEPARATOR: char = '/';

/// Canonical relative key for a local path under `root`.
///
/// The key is the path's components below `root` joined with `/`. Only the
/// platform's own separator splits components, so a `\` inside a Unix file
/// name stays part of that name, as it would in an object key.
///
/// Returns `None` if `path` is not under `root` or is the root itself.
pub fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => None,
        })
        .collect();
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

/// Local file that mirrors `key` under `root`.
pub fn local_path(root: &Path, key: &str) -> PathBuf {
    root.join(key.trim_start_matches(SEPARATOR))
}

/// Object-store prefix semantics: a plain string prefix, `None` matches all.
pub fn key_matches_prefix(key: &str, prefix: Option<&str>) -> bool {
    match prefix {
        Some(p) => key.starts_with(p),
        None => true,
    }
}

/// Deepest local directory that can contain keys starting with `prefix`.
///
/// `data/2024/` maps to `root/data/2024`, `data/rep` maps to `root/data`.
pub fn scan_base(root: &Path, prefix: Option<&str>) -> PathBuf {
    let prefix = prefix.unwrap_or_default().trim_start_matches(SEPARATOR);
    match prefix.rfind(SEPARATOR) {
        Some(idx) => root.join(&prefix[..idx]),
        None => root.to_path_buf(),
    }
}

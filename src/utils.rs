//! Path helpers.
//!
//! Include directories handed to the analysis tool must be absolute, but the
//! directories themselves need not exist, so normalization is purely lexical
//! (no `canonicalize`, which would fail on missing paths and resolve symlinks).

use std::path::{Component, Path, PathBuf};

/// Join `path` onto `base` unless it is already absolute, then normalize.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

/// Resolve against the current working directory.
pub fn to_absolute(path: &Path) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    absolutize(&cwd, path)
}

/// Drop `.` components and fold `..` into the preceding component.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

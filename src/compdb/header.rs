//! Header to source mapping.
//!
//! Compilation databases only record translation units. A header usually
//! shares its flags with the source file of the same base name, so headers
//! are looked up through that source instead.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const HEADER_EXTENSIONS: &[&str] = &["h", "hpp", "hxx", "hh"];

/// Candidate source extensions, in lookup order.
pub const SOURCE_EXTENSIONS: &[&str] = &["cpp", "cc", "cxx", "c++", "c"];

pub fn is_header(path: &Path) -> bool {
    path.extension()
        .map(|ext| HEADER_EXTENSIONS.contains(&ext.to_string_lossy().as_ref()))
        .unwrap_or(false)
}

/// Find the first `<stem>.<ext>` under `root`, directory by directory.
///
/// Directories are visited in sorted pre-order; within a directory the
/// extensions are tried in [`SOURCE_EXTENSIONS`] order.
pub fn find_source_for_header(header: &Path, root: &Path) -> Option<PathBuf> {
    let stem = header.file_stem()?.to_string_lossy().into_owned();

    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .find_map(|dir| {
            SOURCE_EXTENSIONS
                .iter()
                .map(|ext| dir.path().join(format!("{}.{}", stem, ext)))
                .find(|candidate| candidate.is_file())
        })
}

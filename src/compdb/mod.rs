//! Compilation database (`compile_commands.json`) lookup
//!
//! The database is produced by the project's real build (CMake, the `cx`
//! build, Bear, ...). It is opened read-only for each request; a database
//! that fails to load contributes nothing and never aborts a resolution.

pub mod command;
pub mod header;

pub use command::{sanitize_arguments, split_command};
pub use header::{find_source_for_header, is_header};

use crate::error::{FlagsError, Result};
use crate::flags::FlagList;
use crate::utils;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Read-only index of "file -> flags used to compile it".
pub trait CompilationDatabase {
    /// Flags recorded for an absolute, normalized path.
    fn flags_for_file(&self, file: &Path) -> Option<FlagList>;
}

#[derive(Deserialize, Debug)]
struct RawEntry {
    directory: String,
    file: String,
    #[serde(default)]
    arguments: Option<Vec<String>>,
    #[serde(default)]
    command: Option<String>,
}

/// A `compile_commands.json` loaded into memory.
#[derive(Debug, Default)]
pub struct JsonCompilationDatabase {
    entries: HashMap<PathBuf, FlagList>,
}

impl JsonCompilationDatabase {
    /// Load `compile_commands.json` from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(crate::config::COMPDB_FILE);
        let content = fs::read_to_string(&path).map_err(|e| {
            FlagsError::CompilationDatabase(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let raw: Vec<RawEntry> = serde_json::from_str(content)
            .map_err(|e| FlagsError::CompilationDatabase(format!("invalid JSON: {}", e)))?;

        let mut entries = HashMap::new();
        for entry in raw {
            let directory = utils::to_absolute(Path::new(&entry.directory));
            let file = utils::absolutize(&directory, Path::new(&entry.file));
            let args = match (entry.arguments, entry.command) {
                (Some(args), _) => args,
                (None, Some(cmd)) => split_command(&cmd),
                (None, None) => {
                    log::warn!("Skipping entry for {} without a command", file.display());
                    continue;
                }
            };
            let flags = sanitize_arguments(&args, &file, &directory);
            // first entry for a file wins
            entries.entry(file).or_insert(flags);
        }

        log::debug!("Loaded {} compilation database entries", entries.len());
        Ok(Self { entries })
    }
}

impl CompilationDatabase for JsonCompilationDatabase {
    fn flags_for_file(&self, file: &Path) -> Option<FlagList> {
        self.entries.get(file).cloned()
    }
}

/// The path to query the database with: headers map to a sibling source.
pub fn lookup_key(file: &Path, project_root: &Path) -> PathBuf {
    let file = utils::to_absolute(file);
    if is_header(&file) {
        match find_source_for_header(&file, project_root) {
            Some(source) => {
                log::debug!(
                    "Using {} for header {}",
                    source.display(),
                    file.display()
                );
                return utils::normalize(&source);
            }
            None => log::debug!("No source file found for header {}", file.display()),
        }
    }
    file
}

/// Per-file flags for `file`, or empty when unavailable.
pub fn flags_for_file(db: &dyn CompilationDatabase, file: &Path, project_root: &Path) -> FlagList {
    if file.as_os_str().is_empty() {
        return FlagList::new();
    }
    let key = lookup_key(file, project_root);
    db.flags_for_file(&key).unwrap_or_default()
}

/// Open the database in `dir` and look up `file`. Load failures yield nothing.
pub fn lookup(dir: &Path, file: &Path, project_root: &Path) -> FlagList {
    match JsonCompilationDatabase::load(dir) {
        Ok(db) => flags_for_file(&db, file, project_root),
        Err(e) => {
            log::debug!("Compilation database unavailable: {}", e);
            FlagList::new()
        }
    }
}

//! System include discovery
//!
//! The compiler's implicit search path is not visible to an analysis tool
//! unless passed explicitly. [`SystemIncludeSource`] abstracts where that path
//! comes from; [`CompilerProbe`] asks the real compiler frontend.

pub mod probe;

pub use probe::{CompilerProbe, parse_search_list};

use crate::error::Result;
use crate::flags::{Flag, FlagList};
use std::path::PathBuf;

/// Supplies the `-isystem` flags for the compiler's built-in search path.
pub trait SystemIncludeSource {
    fn system_includes(&self) -> Result<FlagList>;

    /// Human readable description, used in reports.
    fn describe(&self) -> String;
}

/// A fixed list of directories, for toolchains that cannot be queried.
#[derive(Debug, Clone, Default)]
pub struct StaticIncludes {
    dirs: Vec<PathBuf>,
}

impl StaticIncludes {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }
}

impl SystemIncludeSource for StaticIncludes {
    fn system_includes(&self) -> Result<FlagList> {
        Ok(self.dirs.iter().map(|d| Flag::system_include(d)).collect())
    }

    fn describe(&self) -> String {
        format!("{} fixed director(ies)", self.dirs.len())
    }
}

//! Flag assembly.
//!
//! Every source contributes a [`FlagList`]; the assembler concatenates them in
//! a fixed precedence order. Nothing is ever dropped or deduplicated, so later
//! sources override earlier ones only through the compiler's last-wins rules.

use crate::buildinfo;
use crate::compdb;
use crate::config::ProjectConfig;
use crate::error::{FlagsError, Result};
use crate::flags::{Flag, FlagList};
use crate::toolchain::{CompilerProbe, SystemIncludeSource};
use crate::utils;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Where a group of flags came from, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagSource {
    Language,
    Project,
    System,
    Local,
    External,
    Compdb,
    Buildinfo,
}

impl fmt::Display for FlagSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlagSource::Language => "language",
            FlagSource::Project => "project",
            FlagSource::System => "system",
            FlagSource::Local => "local",
            FlagSource::External => "external",
            FlagSource::Compdb => "compdb",
            FlagSource::Buildinfo => "buildinfo",
        };
        f.write_str(name)
    }
}

/// Final answer for one file, including the caller-facing cache hint.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub flags: Vec<String>,
    pub do_cache: bool,
}

impl Resolution {
    pub fn new(flags: &FlagList) -> Self {
        Self {
            flags: flags.to_args(),
            do_cache: true,
        }
    }
}

pub struct FlagAssembler<'a> {
    config: &'a ProjectConfig,
    system: Box<dyn SystemIncludeSource + 'a>,
    static_prefix: FlagList,
}

impl<'a> FlagAssembler<'a> {
    /// Assembler probing the configured compiler for system includes.
    pub fn new(config: &'a ProjectConfig) -> Self {
        Self::with_system_source(config, Box::new(CompilerProbe::from_config(config)))
    }

    pub fn with_system_source(
        config: &'a ProjectConfig,
        system: Box<dyn SystemIncludeSource + 'a>,
    ) -> Self {
        let static_prefix = FlagList::from(vec![
            Flag::new("-x", config.language.as_str()),
            Flag::new("-std=", config.standard()),
        ]);
        Self {
            config,
            system,
            static_prefix,
        }
    }

    pub fn system_source(&self) -> &dyn SystemIncludeSource {
        self.system.as_ref()
    }

    pub fn language_flags(&self) -> FlagList {
        self.static_prefix.clone()
    }

    pub fn project_flags(&self) -> FlagList {
        self.config.warnings.iter().map(Flag::bare).collect()
    }

    /// `-I` for each local include, resolved against the project root.
    pub fn local_includes(&self) -> FlagList {
        self.config
            .local_includes
            .iter()
            .map(|dir| Flag::include(&utils::absolutize(&self.config.project_root, Path::new(dir))))
            .collect()
    }

    /// `-I` for each external include. Relative paths are a configuration error;
    /// an empty entry drops the whole external list.
    pub fn external_includes(&self) -> Result<FlagList> {
        let dirs: Vec<&str> = self.config.external_includes.iter().map(|d| d.trim()).collect();
        if let Some(dir) = dirs.iter().find(|d| !d.is_empty() && !Path::new(d).is_absolute()) {
            return Err(FlagsError::configuration(format!(
                "Expected absolute path for external headers, got '{}'",
                dir
            )));
        }
        if dirs.iter().any(|d| d.is_empty()) {
            log::warn!("Empty external include entry, ignoring all external includes");
            return Ok(FlagList::new());
        }
        Ok(dirs
            .into_iter()
            .map(|dir| Flag::include(&utils::normalize(Path::new(dir))))
            .collect())
    }

    pub fn compdb_flags(&self, file: &Path) -> FlagList {
        compdb::lookup(&self.config.compdb_dir, file, &self.config.project_root)
    }

    /// Build-info flags, or nothing when the file is missing or unreadable.
    pub fn buildinfo_flags(&self) -> FlagList {
        match buildinfo::load_buildinfo(&self.config.buildinfo_path()) {
            Ok(flags) => flags,
            Err(e) => {
                log::debug!("No dependency flags: {}", e);
                FlagList::new()
            }
        }
    }

    /// Each source's contribution for `file`, in precedence order.
    pub fn resolve_sections(&self, file: &Path) -> Result<Vec<(FlagSource, FlagList)>> {
        let external = self.external_includes()?;
        let system = self.system.system_includes()?;

        Ok(vec![
            (FlagSource::Language, self.language_flags()),
            (FlagSource::Project, self.project_flags()),
            (FlagSource::System, system),
            (FlagSource::Local, self.local_includes()),
            (FlagSource::External, external),
            (FlagSource::Compdb, self.compdb_flags(file)),
            (FlagSource::Buildinfo, self.buildinfo_flags()),
        ])
    }

    /// The ordered flag list for `file`. An empty path yields project-wide flags.
    pub fn resolve(&self, file: &Path) -> Result<FlagList> {
        let mut flags = FlagList::new();
        for (_, section) in self.resolve_sections(file)? {
            flags.extend(section);
        }
        log::debug!("Resolved {} flag(s) for {}", flags.len(), file.display());
        Ok(flags)
    }
}

//! Project configuration (`cxflags.toml`).
//!
//! The file is deserialized into [`CxFlagsConfig`] and then frozen into a
//! validated [`ProjectConfig`], which is built once at startup and passed to
//! the assembler by reference.

use crate::error::FlagsError;
use crate::utils;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "cxflags.toml";
pub const BUILDINFO_FILE: &str = "conanbuildinfo.txt";
pub const COMPDB_FILE: &str = "compile_commands.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "c")]
    C,
    #[serde(rename = "c++")]
    Cpp,
}

impl Language {
    /// Value for the `-x` switch.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "c++",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Strict ISO mode (`-std=c++17`)
    Iso,
    /// GNU extensions (`-std=gnu++17`)
    Gnu,
}

/// Derive the `-std=` value from language, dialect and version.
pub fn derive_standard(lang: Language, dialect: Dialect, version: &str) -> String {
    match (dialect, lang) {
        (Dialect::Iso, _) => format!("{}{}", lang.as_str(), version),
        (Dialect::Gnu, Language::C) => format!("gnu{}", version),
        (Dialect::Gnu, Language::Cpp) => format!("gnu++{}", version),
    }
}

// --- Raw file layout ---

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct CxFlagsConfig {
    #[serde(default)]
    pub language: LanguageConfig,
    #[serde(default)]
    pub compiler: CompilerConfig,
    #[serde(default)]
    pub flags: FlagsConfig,
    #[serde(default)]
    pub includes: IncludesConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct LanguageConfig {
    #[serde(default = "default_lang")]
    pub lang: Language,
    #[serde(default = "default_dialect")]
    pub dialect: Dialect,
    #[serde(default = "default_std")]
    pub std: String,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            lang: default_lang(),
            dialect: default_dialect(),
            std: default_std(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct CompilerConfig {
    #[serde(default = "default_frontend")]
    pub frontend: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            frontend: default_frontend(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct FlagsConfig {
    #[serde(default = "default_warnings")]
    pub warnings: Vec<String>,
}

impl Default for FlagsConfig {
    fn default() -> Self {
        Self {
            warnings: default_warnings(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct IncludesConfig {
    /// Relative paths are resolved against the project root
    #[serde(default = "default_local_includes")]
    pub local: Vec<String>,
    /// Must be absolute
    #[serde(default)]
    pub external: Vec<String>,
}

impl Default for IncludesConfig {
    fn default() -> Self {
        Self {
            local: default_local_includes(),
            external: Vec::new(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    #[serde(default = "default_buildinfo_dir")]
    pub buildinfo_dir: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compdb_dir: Option<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            buildinfo_dir: default_buildinfo_dir(),
            compdb_dir: None,
        }
    }
}

fn default_lang() -> Language {
    Language::Cpp
}

fn default_dialect() -> Dialect {
    Dialect::Gnu
}

fn default_std() -> String {
    "1z".to_string()
}

fn default_frontend() -> String {
    "avr-gcc".to_string()
}

fn default_warnings() -> Vec<String> {
    [
        "-Wall",
        "-Wextra",
        "-Wno-attributes",
        "-Wno-gnu",
        "-Werror",
        "-pedantic-errors",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_local_includes() -> Vec<String> {
    vec!["include".to_string()]
}

fn default_buildinfo_dir() -> String {
    "build".to_string()
}

// --- Frozen configuration ---

/// Immutable, validated project configuration.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub project_root: PathBuf,
    pub language: Language,
    pub dialect: Dialect,
    pub version: String,
    standard: String,
    pub frontend: String,
    pub warnings: Vec<String>,
    pub local_includes: Vec<String>,
    pub external_includes: Vec<String>,
    pub buildinfo_dir: PathBuf,
    pub compdb_dir: PathBuf,
}

impl ProjectConfig {
    /// Validate a parsed config file rooted at `project_root`.
    pub fn from_raw(raw: CxFlagsConfig, project_root: &Path) -> crate::Result<Self> {
        let CxFlagsConfig {
            language,
            compiler,
            flags,
            includes,
            paths,
        } = raw;

        // passed through to the compiler as-is, so newer standards keep working
        let version = language.std.trim().to_string();
        if version.is_empty() || version.contains(char::is_whitespace) {
            return Err(FlagsError::configuration(format!(
                "invalid {} standard version '{}'",
                language.lang, language.std
            )));
        }
        if compiler.frontend.trim().is_empty() {
            return Err(FlagsError::configuration("compiler frontend must not be empty"));
        }

        let project_root = utils::to_absolute(project_root);
        let buildinfo_dir = utils::absolutize(&project_root, Path::new(&paths.buildinfo_dir));
        let compdb_dir = match &paths.compdb_dir {
            Some(dir) => utils::absolutize(&project_root, Path::new(dir)),
            None => buildinfo_dir.clone(),
        };

        Ok(Self {
            standard: derive_standard(language.lang, language.dialect, &version),
            project_root,
            language: language.lang,
            dialect: language.dialect,
            version,
            frontend: compiler.frontend,
            warnings: flags.warnings,
            local_includes: includes.local,
            external_includes: includes.external,
            buildinfo_dir,
            compdb_dir,
        })
    }

    /// Defaults for a project without a config file.
    pub fn default_for(project_root: &Path) -> crate::Result<Self> {
        Self::from_raw(CxFlagsConfig::default(), project_root)
    }

    /// The derived `-std=` value, e.g. `gnu++1z`.
    pub fn standard(&self) -> &str {
        &self.standard
    }

    pub fn buildinfo_path(&self) -> PathBuf {
        self.buildinfo_dir.join(BUILDINFO_FILE)
    }

    pub fn compdb_path(&self) -> PathBuf {
        self.compdb_dir.join(COMPDB_FILE)
    }
}

/// Walk upward from `start` looking for `cxflags.toml`.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}

/// Load and validate a config file; its directory becomes the project root.
pub fn load_config(path: &Path) -> Result<ProjectConfig> {
    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} - check file permissions", path.display()))?;
    let raw: CxFlagsConfig = toml::from_str(&config_str).with_context(|| {
        format!(
            "Failed to parse {} - check for syntax errors (missing quotes, brackets)",
            path.display()
        )
    })?;

    let absolute = utils::to_absolute(path);
    let root = absolute.parent().unwrap_or_else(|| Path::new("/"));
    Ok(ProjectConfig::from_raw(raw, root)?)
}

/// Resolve `--config` or discover the config from the current directory.
pub fn locate_and_load(explicit: Option<&Path>) -> Result<ProjectConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            find_config(&cwd).ok_or_else(|| {
                anyhow::anyhow!(
                    "{} not found in current directory or any parent.\n\n\
                    💡 Tip: Run 'cxflags init' to create one.",
                    CONFIG_FILE
                )
            })?
        }
    };
    load_config(&path)
}

/// Contents written by `cxflags init`.
pub fn default_config_toml() -> Result<String> {
    toml::to_string_pretty(&CxFlagsConfig::default()).context("Failed to serialize default config")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_standard() {
        assert_eq!(derive_standard(Language::Cpp, Dialect::Gnu, "1z"), "gnu++1z");
        assert_eq!(derive_standard(Language::Cpp, Dialect::Iso, "17"), "c++17");
        assert_eq!(derive_standard(Language::C, Dialect::Gnu, "11"), "gnu11");
        assert_eq!(derive_standard(Language::C, Dialect::Iso, "99"), "c99");
    }

    #[test]
    fn test_defaults() {
        let config = ProjectConfig::default_for(Path::new("/project")).unwrap();
        assert_eq!(config.standard(), "gnu++1z");
        assert_eq!(config.frontend, "avr-gcc");
        assert_eq!(config.local_includes, vec!["include"]);
        assert!(config.external_includes.is_empty());
        assert_eq!(
            config.buildinfo_path(),
            PathBuf::from("/project/build/conanbuildinfo.txt")
        );
        assert_eq!(
            config.compdb_path(),
            PathBuf::from("/project/build/compile_commands.json")
        );
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
[language]
lang = "c"
dialect = "iso"
std = "11"

[paths]
compdb_dir = "out/cmake"
"#;
        let raw: CxFlagsConfig = toml::from_str(toml_str).unwrap();
        let config = ProjectConfig::from_raw(raw, Path::new("/work")).unwrap();
        assert_eq!(config.language, Language::C);
        assert_eq!(config.standard(), "c11");
        assert_eq!(config.warnings.len(), 6);
        assert_eq!(config.buildinfo_dir, PathBuf::from("/work/build"));
        assert_eq!(config.compdb_dir, PathBuf::from("/work/out/cmake"));
    }

    #[test]
    fn test_blank_standard_rejected() {
        for std in ["", "  ", "1 z"] {
            let toml_str = format!("[language]\nlang = \"c\"\nstd = \"{}\"\n", std);
            let raw: CxFlagsConfig = toml::from_str(&toml_str).unwrap();
            let err = ProjectConfig::from_raw(raw, Path::new("/work")).unwrap_err();
            assert!(matches!(err, FlagsError::Configuration(_)), "std = {:?}", std);
        }
    }

    #[test]
    fn test_newer_standard_passes_through() {
        let raw: CxFlagsConfig =
            toml::from_str("[language]\nlang = \"c++\"\ndialect = \"gnu\"\nstd = \"26\"\n").unwrap();
        let config = ProjectConfig::from_raw(raw, Path::new("/work")).unwrap();
        assert_eq!(config.standard(), "gnu++26");

        let raw: CxFlagsConfig =
            toml::from_str("[language]\nlang = \"c\"\ndialect = \"iso\"\nstd = \"2y\"\n").unwrap();
        let config = ProjectConfig::from_raw(raw, Path::new("/work")).unwrap();
        assert_eq!(config.standard(), "c2y");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: std::result::Result<CxFlagsConfig, _> = toml::from_str("[bogus]\nx = 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_misspelled_section_key_rejected() {
        let toml_str = r#"
[includes]
extrnal = ["/opt/avr/include"]
"#;
        let result: std::result::Result<CxFlagsConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());

        let result: std::result::Result<CxFlagsConfig, _> =
            toml::from_str("[language]\nstandard = \"17\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_config_round_trips() {
        let text = default_config_toml().unwrap();
        assert!(text.contains("avr-gcc"));
        let raw: CxFlagsConfig = toml::from_str(&text).unwrap();
        assert_eq!(raw.language.std, "1z");
    }

    #[test]
    fn test_find_config_walks_upward() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "").unwrap();
        let nested = dir.path().join("src").join("drivers");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config(&nested), Some(dir.path().join(CONFIG_FILE)));
    }
}

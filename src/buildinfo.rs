//! Parser for Conan's `conanbuildinfo.txt`.
//!
//! The file is line oriented with `[section]` headers. Only the aggregated
//! `[includedirs]` and `[defines]` sections contribute flags; every other
//! section (including per-package ones like `[includedirs_fmt]`) is inert.

use crate::error::{FlagsError, Result};
use crate::flags::{Flag, FlagList};
use crate::utils;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Seeking,
    InIncludeDirs,
    InDefines,
    InOtherSection,
}

impl Section {
    /// Section after reading a trimmed, non-empty line.
    fn next(self, line: &str) -> Section {
        if !line.starts_with('[') {
            return self;
        }
        match line {
            "[includedirs]" => Section::InIncludeDirs,
            "[defines]" => Section::InDefines,
            _ => Section::InOtherSection,
        }
    }
}

/// Parse build-info text. Relative include dirs resolve against `base_dir`.
pub fn parse_buildinfo(content: &str, base_dir: &Path) -> FlagList {
    let mut flags = FlagList::new();
    let mut section = Section::Seeking;

    for line in content.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }
        section = section.next(line);
        if line.starts_with('[') {
            continue;
        }

        match section {
            Section::InIncludeDirs => {
                flags.push(Flag::system_include(&utils::absolutize(
                    base_dir,
                    Path::new(line),
                )));
            }
            Section::InDefines => flags.push(Flag::define(line)),
            Section::Seeking | Section::InOtherSection => {}
        }
    }

    flags
}

/// Read and parse the build-info file at `path`.
pub fn load_buildinfo(path: &Path) -> Result<FlagList> {
    if !path.is_file() {
        return Err(FlagsError::BuildInfoNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let flags = parse_buildinfo(&content, &utils::to_absolute(base_dir));
    log::debug!(
        "Read {} flag(s) from build info {}",
        flags.len(),
        path.display()
    );
    Ok(flags)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
[includedirs]
/opt/libs/include
/home/user/.conan/data/fmt/include

[libdirs]
/opt/libs/lib

[defines]
FOO=1
BAR

[includedirs_fmt]
/home/user/.conan/data/fmt/include
";

    #[test]
    fn test_parse_basic_sections() {
        let flags =
            parse_buildinfo("[includedirs]\n/opt/libs/include\n[defines]\nFOO=1", Path::new("/"));
        assert_eq!(
            flags.as_slice(),
            &[
                Flag::new("-isystem", "/opt/libs/include"),
                Flag::new("-D", "FOO=1")
            ]
        );
    }

    #[test]
    fn test_count_matches_recognized_lines() {
        let flags = parse_buildinfo(SAMPLE, Path::new("/"));
        assert_eq!(flags.len(), 4);
        assert_eq!(
            flags.to_args(),
            vec![
                "-isystem",
                "/opt/libs/include",
                "-isystem",
                "/home/user/.conan/data/fmt/include",
                "-D",
                "FOO=1",
                "-D",
                "BAR"
            ]
        );
    }

    #[test]
    fn test_unknown_sections_are_inert() {
        let flags = parse_buildinfo(
            "[libs]\nfmt\n[bindirs]\n/opt/bin\n[something_new]\nX=1\n",
            Path::new("/"),
        );
        assert!(flags.is_empty());
    }

    #[test]
    fn test_lines_before_any_section_are_skipped() {
        let flags = parse_buildinfo("stray line\n\n[defines]\n  A=2  \n", Path::new("/"));
        assert_eq!(flags.as_slice(), &[Flag::define("A=2")]);
    }

    #[test]
    fn test_relative_include_dirs_become_absolute() {
        let flags = parse_buildinfo("[includedirs]\n../deps/include\n", Path::new("/proj/build"));
        assert_eq!(
            flags.as_slice(),
            &[Flag::new("-isystem", "/proj/deps/include")]
        );
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_buildinfo(&dir.path().join("conanbuildinfo.txt")).unwrap_err();
        assert!(matches!(err, FlagsError::BuildInfoNotFound(_)));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conanbuildinfo.txt");
        fs::write(&path, SAMPLE).unwrap();
        assert_eq!(load_buildinfo(&path).unwrap().len(), 4);
    }
}

use super::SystemIncludeSource;
use crate::config::{Language, ProjectConfig};
use crate::error::{FlagsError, Result};
use crate::flags::{Flag, FlagList};
use crate::utils;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::OnceLock;

const FRAMEWORK_MARKER: &str = "(framework directory)";

fn search_list_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)#include <\.\.\.> search starts here:(?P<list>.*?)End of search list")
            .expect("search list pattern is valid")
    })
}

/// Extract the angle-bracket search directories from `-v` output.
///
/// Returns `None` when the markers are absent. Framework directories are
/// skipped and relative entries are resolved against `cwd`.
pub fn parse_search_list(output: &str, cwd: &Path) -> Option<Vec<PathBuf>> {
    let caps = search_list_regex().captures(output)?;
    let list = caps.name("list")?.as_str();
    Some(
        list.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.contains(FRAMEWORK_MARKER))
            .map(|line| utils::absolutize(cwd, Path::new(line)))
            .collect(),
    )
}

/// Runs `<frontend> -v -E -x <lang> -std=<std> -` and scrapes the search list.
#[derive(Debug, Clone)]
pub struct CompilerProbe {
    frontend: String,
    language: Language,
    standard: String,
}

impl CompilerProbe {
    pub fn new(frontend: impl Into<String>, language: Language, standard: impl Into<String>) -> Self {
        Self {
            frontend: frontend.into(),
            language,
            standard: standard.into(),
        }
    }

    pub fn from_config(config: &ProjectConfig) -> Self {
        Self::new(&config.frontend, config.language, config.standard())
    }

    pub fn args(&self) -> Vec<String> {
        vec![
            "-v".to_string(),
            "-E".to_string(),
            "-x".to_string(),
            self.language.as_str().to_string(),
            format!("-std={}", self.standard),
            "-".to_string(),
        ]
    }

    /// The command line as reported to the user on failure.
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.frontend.clone()];
        parts.extend(self.args());
        parts.join(" ")
    }

    fn run(&self) -> Result<String> {
        log::debug!("Probing system includes: {}", self.command_line());
        let output = Command::new(&self.frontend)
            .args(self.args())
            .stdin(Stdio::null())
            .output()
            .map_err(|source| FlagsError::ProbeSpawn {
                command: self.command_line(),
                source,
            })?;

        // gcc and clang print the search list on stderr; keep both streams
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(text)
    }
}

impl SystemIncludeSource for CompilerProbe {
    fn system_includes(&self) -> Result<FlagList> {
        let output = self.run()?;
        let cwd = std::env::current_dir()?;
        let dirs = parse_search_list(&output, &cwd).ok_or_else(|| FlagsError::ProbeFailed {
            command: self.command_line(),
        })?;
        log::debug!("Compiler reported {} system include dir(s)", dirs.len());
        Ok(dirs.iter().map(|d| Flag::system_include(d)).collect())
    }

    fn describe(&self) -> String {
        self.command_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GCC_OUTPUT: &str = r#"Using built-in specs.
COLLECT_GCC=avr-gcc
Target: avr
gcc version 7.3.0 (GCC)
ignoring nonexistent directory "/usr/lib/gcc/avr/7.3.0/../../../avr/sys-include"
#include "..." search starts here:
#include <...> search starts here:
 /usr/lib/gcc/avr/7.3.0/include
 /usr/lib/gcc/avr/7.3.0/include-fixed
 /usr/lib/gcc/avr/7.3.0/../../../avr/include
End of search list.
# 1 "<stdin>"
"#;

    const CLANG_MAC_OUTPUT: &str = r#"clang -cc1 version 15.0.0
#include "..." search starts here:
#include <...> search starts here:
 /usr/local/include
 /Library/Developer/CommandLineTools/usr/include
 /System/Library/Frameworks (framework directory)
End of search list.
"#;

    #[test]
    fn test_parse_gcc_output() {
        let dirs = parse_search_list(GCC_OUTPUT, Path::new("/")).unwrap();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/usr/lib/gcc/avr/7.3.0/include"),
                PathBuf::from("/usr/lib/gcc/avr/7.3.0/include-fixed"),
                PathBuf::from("/usr/lib/avr/include"),
            ]
        );
    }

    #[test]
    fn test_framework_directories_are_skipped() {
        let dirs = parse_search_list(CLANG_MAC_OUTPUT, Path::new("/")).unwrap();
        assert_eq!(dirs.len(), 2);
        assert!(dirs.iter().all(|d| !d.to_string_lossy().contains("Frameworks")));
    }

    #[test]
    fn test_missing_markers() {
        assert!(parse_search_list("avr-gcc: error: unrecognized option", Path::new("/")).is_none());
        // start marker without end marker
        assert!(parse_search_list("#include <...> search starts here:\n /usr/include\n", Path::new("/")).is_none());
    }

    #[test]
    fn test_command_line() {
        let probe = CompilerProbe::new("avr-gcc", Language::Cpp, "gnu++1z");
        assert_eq!(probe.command_line(), "avr-gcc -v -E -x c++ -std=gnu++1z -");
    }

    #[test]
    fn test_spawn_failure_is_fatal() {
        let probe = CompilerProbe::new("cxflags-no-such-compiler", Language::C, "gnu11");
        let err = probe.system_includes().unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(
            err.probe_command(),
            Some("cxflags-no-such-compiler -v -E -x c -std=gnu11 -")
        );
    }

    #[cfg(unix)]
    fn fake_compiler(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("fake-gcc");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_real_process() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = fake_compiler(
            dir.path(),
            "echo '#include <...> search starts here:' >&2\n\
             echo ' /opt/avr/include' >&2\n\
             echo 'End of search list.' >&2",
        );
        let probe = CompilerProbe::new(compiler.to_string_lossy(), Language::Cpp, "gnu++1z");
        let flags = probe.system_includes().unwrap();
        assert_eq!(flags.to_args(), vec!["-isystem", "/opt/avr/include"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_without_markers_names_command() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = fake_compiler(dir.path(), "echo 'no search list here'");
        let probe = CompilerProbe::new(compiler.to_string_lossy(), Language::Cpp, "c++17");
        let err = probe.system_includes().unwrap_err();
        assert!(matches!(err, FlagsError::ProbeFailed { .. }));
        assert_eq!(
            err.probe_command().unwrap(),
            format!("{} -v -E -x c++ -std=c++17 -", compiler.display())
        );
    }
}

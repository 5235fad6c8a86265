//! Turning a recorded compile command into analysis flags.

use crate::flags::{Flag, FlagList};
use crate::utils;
use std::path::Path;

/// Switches whose value is an include directory.
const INCLUDE_SWITCHES: &[&str] = &["-I", "-isystem", "-idirafter", "-iquote"];

/// Split a `command` string the way a POSIX shell would tokenize it.
///
/// Handles single quotes, double quotes and backslash escapes. No expansion
/// is performed.
pub fn split_command(command: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = command.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_token = true;
                for q in chars.by_ref() {
                    if q == '\'' {
                        break;
                    }
                    current.push(q);
                }
            }
            '"' => {
                in_token = true;
                while let Some(q) = chars.next() {
                    match q {
                        '"' => break,
                        '\\' => match chars.next() {
                            Some(e @ ('"' | '\\' | '$' | '`')) => current.push(e),
                            Some(e) => {
                                current.push('\\');
                                current.push(e);
                            }
                            None => current.push('\\'),
                        },
                        _ => current.push(q),
                    }
                }
            }
            '\\' => {
                in_token = true;
                if let Some(e) = chars.next() {
                    current.push(e);
                }
            }
            c if c.is_whitespace() => {
                if in_token {
                    args.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            _ => {
                in_token = true;
                current.push(c);
            }
        }
    }
    if in_token {
        args.push(current);
    }
    args
}

/// Convert a recorded argv into flags for an analysis tool.
///
/// Drops the compiler executable (and the real compiler behind a launcher
/// such as `ccache g++`), the input file, `-c` and `-o <out>`, and makes
/// relative include directories absolute against `directory`.
pub fn sanitize_arguments(args: &[String], file: &Path, directory: &Path) -> FlagList {
    let mut flags = FlagList::new();
    let mut iter = args.iter().skip(1).peekable();
    while iter.next_if(|arg| !arg.starts_with('-')).is_some() {}

    while let Some(arg) = iter.next() {
        let arg = arg.as_str();
        if arg == "-c" {
            continue;
        }
        if arg == "-o" {
            iter.next();
            continue;
        }
        if arg.starts_with("-o") && arg.len() > 2 {
            continue;
        }
        if !arg.starts_with('-') && utils::absolutize(directory, Path::new(arg)) == file {
            continue;
        }

        if let Some(switch) = INCLUDE_SWITCHES.iter().find(|s| **s == arg) {
            match iter.next() {
                Some(dir) => flags.push(Flag::new(
                    *switch,
                    utils::absolutize(directory, Path::new(dir)).to_string_lossy(),
                )),
                None => flags.push(Flag::bare(*switch)),
            }
            continue;
        }
        if let Some((switch, dir)) = split_joined_include(arg) {
            flags.push(Flag::new(
                switch,
                utils::absolutize(directory, Path::new(dir)).to_string_lossy(),
            ));
            continue;
        }

        flags.push(Flag::bare(arg));
    }

    flags
}

fn split_joined_include(arg: &str) -> Option<(&'static str, &str)> {
    // longest switch first so `-isystemX` is not read as `-I`
    ["-isystem", "-idirafter", "-iquote", "-I"].into_iter().find_map(|switch| {
        arg.strip_prefix(switch)
            .filter(|rest| !rest.is_empty())
            .map(|rest| (switch, rest))
    })
}

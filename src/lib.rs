//! # cxflags - Compiler Flags for C/C++ Editor Tooling
//!
//! cxflags computes the exact flag list a completion engine or indexer should
//! use to parse one C/C++ file the way the project's own compiler would.
//!
//! ## Flag Sources
//!
//! Flags are gathered from several sources and concatenated in this order:
//!
//! 1. **Language**: `-x <lang>` and the derived `-std=` value
//! 2. **Project**: warning/diagnostic flags from `cxflags.toml`
//! 3. **System**: the compiler's implicit search path, probed via `-v -E`
//! 4. **Local**: project include directories (`-I`, made absolute)
//! 5. **External**: absolute include directories outside the project
//! 6. **Compilation database**: per-file flags from `compile_commands.json`
//! 7. **Build info**: dependency includes/defines from `conanbuildinfo.txt`
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a default cxflags.toml
//! cxflags init
//!
//! # Print flags for a header
//! cxflags flags include/avr/io.hpp
//! ```
//!
//! ## Module Organization
//!
//! - [`assembler`] - Precedence-ordered flag assembly
//! - [`buildinfo`] - `conanbuildinfo.txt` parsing
//! - [`compdb`] - Compilation database lookup and header mapping
//! - [`toolchain`] - System include discovery

/// Precedence-ordered flag assembly.
pub mod assembler;

/// Conan build-info parsing.
pub mod buildinfo;

/// Compilation database lookup.
pub mod compdb;

/// Configuration file parsing (`cxflags.toml`).
pub mod config;

pub mod error;

/// Flag and flag list types.
pub mod flags;

/// System include discovery.
pub mod toolchain;

/// Terminal UI utilities (tables).
pub mod ui;

/// Path helpers.
pub mod utils;

pub use assembler::{FlagAssembler, FlagSource, Resolution};
pub use config::ProjectConfig;
pub use error::{FlagsError, Result};
pub use flags::{Flag, FlagList};

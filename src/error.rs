use std::path::PathBuf;
use thiserror::Error;

/// Result type for flag resolution
pub type Result<T> = std::result::Result<T, FlagsError>;

/// Errors raised while resolving compiler flags
#[derive(Error, Debug)]
pub enum FlagsError {
    /// Invalid project configuration (bad standard, relative external include, ...)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The dependency manager's build-info file does not exist
    #[error("Could not find build information at \"{}\"", .0.display())]
    BuildInfoNotFound(PathBuf),

    /// The compiler ran but its output had no include search list
    #[error("Failed to acquire system includes from compiler: {command}")]
    ProbeFailed { command: String },

    /// The compiler could not be started at all
    #[error("Failed to run compiler `{command}`: {source}")]
    ProbeSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// compile_commands.json is missing or malformed
    #[error("Compilation database error: {0}")]
    CompilationDatabase(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FlagsError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Errors after which no usable flag list can be produced.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ProbeFailed { .. } | Self::ProbeSpawn { .. })
    }

    /// The compiler command line behind a probe failure, if any.
    pub fn probe_command(&self) -> Option<&str> {
        match self {
            Self::ProbeFailed { command } | Self::ProbeSpawn { command, .. } => Some(command),
            _ => None,
        }
    }
}

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for grove grammar selection.
//!
//! Three layers:
//! - **Registry** (`Registry`, `ModuleSpec`): static catalog of grammar modules
//! - **Intent** (`SelectionIntent`, `DeclarativeOptions`): what the invoking
//!   environment asked for, read from argument vectors and option sources
//! - **Resolution** (`ResolvedConfig`): the frozen per-module inclusion decision

pub mod intent;
pub mod options;
pub mod registry;
pub mod resolve;
pub mod utils;

#[cfg(test)]
mod options_tests;

pub use intent::{SelectionIntent, read_intent};
pub use options::{DeclarativeOptions, ALL_OPTION};
pub use registry::{ModuleSpec, Registry};
pub use resolve::{ResolvedConfig, resolve};

/// Broad category of a failure, used by callers to pick a diagnostic style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Dependency,
    Generation,
    Io,
    Compile,
}

/// Configuration errors. All of them are fatal for the invocation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A `--language` token names no registered module.
    #[error("unknown language '{token}'")]
    UnknownModule { token: String },

    /// The same module was selected twice via `--language`.
    #[error("language '{token}' selected more than once")]
    DuplicateModule { token: String },

    /// A declarative option names neither a module nor `all`.
    #[error("unknown build option '{name}'")]
    UnknownOption { name: String },

    #[error("invalid value '{value}' for build option '{name}' (expected true or false)")]
    InvalidOptionValue { name: String, value: String },

    /// A `name=value` pair without the `=`.
    #[error("malformed build option '{token}' (expected <name>=<bool>)")]
    MalformedOption { token: String },

    #[error("failed to read options file {path}: {message}")]
    OptionsFile { path: String, message: String },

    #[error("module '{name}' registered more than once")]
    DuplicateRegistryEntry { name: String },

    /// Module names double as artifact names and C identifiers.
    #[error("invalid module name '{name}' (expected [a-z_][a-z0-9_]*)")]
    InvalidModuleName { name: String },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Configuration
    }

    /// The token or name the error is about.
    pub fn offending_token(&self) -> &str {
        match self {
            Error::UnknownModule { token }
            | Error::DuplicateModule { token }
            | Error::MalformedOption { token } => token,
            Error::UnknownOption { name }
            | Error::InvalidOptionValue { name, .. }
            | Error::DuplicateRegistryEntry { name }
            | Error::InvalidModuleName { name } => name,
            Error::OptionsFile { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

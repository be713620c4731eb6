//! grove build pipeline: materialize, generate, compile and compose grammar modules.
//!
//! This crate turns a [`grove_core::ResolvedConfig`] into build artifacts:
//! - `materialize` - locate each selected module's fetched package
//! - `generate` - run the external generator for modules that need it
//! - `compile` - compile C sources into one static archive per module
//! - `header` - synthesize and install the per-module public header
//! - `compose` - link everything into one module with compile-time switches
//! - `pipeline` - drive the per-module pipelines and the final composition
//!
//! External effects (package lookup, subprocesses, the C compiler) sit behind
//! traits carried by [`BuildContext`], so tests substitute fakes.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::path::PathBuf;

pub mod command;
pub mod compile;
pub mod compose;
pub mod context;
pub mod generate;
pub mod header;
pub mod materialize;
pub mod pipeline;

#[cfg(test)]
mod test_utils;

#[cfg(test)]
mod header_tests;

pub use command::{CommandOutput, CommandRunner, SystemCommands};
pub use compile::{CcCompiler, CompileUnit, CompiledModule, UnitCompiler};
pub use compose::{ComposedModule, CoreLibrary};
pub use context::{BuildContext, TargetParams};
pub use generate::GeneratorConfig;
pub use grove_core::ErrorKind;
pub use materialize::{
    CargoMaterializer, DirectoryMaterializer, GrammarLock, Materializer, VerifiedMaterializer,
};
pub use pipeline::{build, build_module};

/// Errors raised while producing build artifacts.
///
/// Every variant is fatal for the whole invocation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] grove_core::Error),

    /// The package manager has no package for the module.
    #[error("package '{package}' for module '{module}' is not declared")]
    PackageNotDeclared { module: String, package: String },

    #[error("failed to read package metadata from {}: {message}", .manifest.display())]
    Metadata { manifest: PathBuf, message: String },

    #[error("failed to fetch module '{module}': {message}")]
    Fetch { module: String, message: String },

    #[error("integrity check failed for module '{module}': expected sha256 {expected}, found {actual}")]
    IntegrityMismatch {
        module: String,
        expected: String,
        actual: String,
    },

    #[error(
        "module '{module}' must be generated with `{program}`, but `{program}` was not found\n\
         help: install it with `cargo install tree-sitter-cli` or `npm install -g tree-sitter-cli`, \
         or point --tree-sitter / GROVE_TREE_SITTER at the executable"
    )]
    GeneratorNotFound { module: String, program: String },

    #[error("failed to run `{}` for module '{module}': {source}", .program.display())]
    GeneratorSpawn {
        module: String,
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("`{} generate` failed for module '{module}' ({status}){stderr}", .program.display())]
    GeneratorFailed {
        module: String,
        program: PathBuf,
        status: String,
        stderr: String,
    },

    #[error("module '{module}' is missing source file {}", .path.display())]
    MissingSource { module: String, path: PathBuf },

    #[error("failed to compile module '{module}': {message}")]
    Compile { module: String, message: String },

    #[error("failed to write header for module '{module}' at {}: {source}", .path.display())]
    Header {
        module: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(e) => e.kind(),
            Error::PackageNotDeclared { .. }
            | Error::Metadata { .. }
            | Error::Fetch { .. }
            | Error::IntegrityMismatch { .. } => ErrorKind::Dependency,
            Error::GeneratorNotFound { .. }
            | Error::GeneratorSpawn { .. }
            | Error::GeneratorFailed { .. } => ErrorKind::Generation,
            Error::MissingSource { .. } | Error::Compile { .. } => ErrorKind::Compile,
            Error::Header { .. } | Error::Io { .. } => ErrorKind::Io,
        }
    }

    /// Module the failure belongs to, when it is module-specific.
    pub fn module(&self) -> Option<&str> {
        match self {
            Error::PackageNotDeclared { module, .. }
            | Error::Fetch { module, .. }
            | Error::IntegrityMismatch { module, .. }
            | Error::GeneratorNotFound { module, .. }
            | Error::GeneratorSpawn { module, .. }
            | Error::GeneratorFailed { module, .. }
            | Error::MissingSource { module, .. }
            | Error::Compile { module, .. }
            | Error::Header { module, .. } => Some(module),
            Error::Config(_) | Error::Metadata { .. } | Error::Io { .. } => None,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

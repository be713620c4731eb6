//! External command capability.
//!
//! Tool discovery and subprocess execution go through [`CommandRunner`] so the
//! generation step can be exercised without spawning real processes.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Outcome of a finished external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// Human-readable exit status, e.g. `exit status: 1`.
    pub status: String,
    pub stderr: String,
}

pub trait CommandRunner: Send + Sync {
    /// Resolve a program name (or explicit path) to an executable file.
    fn locate(&self, program: &str) -> Option<PathBuf>;

    /// Run `program` with `args` inside `cwd` and wait for it.
    fn run(&self, program: &Path, args: &[&str], cwd: &Path) -> io::Result<CommandOutput>;
}

/// Real processes, resolved through a search path.
#[derive(Debug, Clone, Default)]
pub struct SystemCommands {
    search_path: Option<OsString>,
}

impl SystemCommands {
    /// Search the process `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Search `search_path` (same syntax as `PATH`) instead of the process `PATH`.
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }

    fn candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
        let mut candidates = vec![dir.join(program)];
        if cfg!(windows) {
            candidates.push(dir.join(format!("{program}.exe")));
            candidates.push(dir.join(format!("{program}.cmd")));
        }
        candidates
    }
}

impl CommandRunner for SystemCommands {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        let as_path = Path::new(program);
        // Anything with a directory part is an explicit path, not a PATH lookup.
        if as_path.components().count() > 1 || as_path.is_absolute() {
            return as_path.is_file().then(|| as_path.to_path_buf());
        }

        let search_path = self
            .search_path
            .clone()
            .or_else(|| std::env::var_os("PATH"))?;
        std::env::split_paths(&search_path)
            .flat_map(|dir| Self::candidates(&dir, program))
            .find(|candidate| candidate.is_file())
    }

    fn run(&self, program: &Path, args: &[&str], cwd: &Path) -> io::Result<CommandOutput> {
        tracing::debug!(program = %program.display(), ?args, cwd = %cwd.display(), "running");
        let output = Command::new(program).args(args).current_dir(cwd).output()?;
        Ok(CommandOutput {
            success: output.status.success(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

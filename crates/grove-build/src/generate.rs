//! Code generation step for modules whose parser must be generated first.
//!
//! The fetched package is never modified: it is copied into the module's
//! working directory and the generator runs on the copy.

use std::fs;
use std::path::{Path, PathBuf};

use grove_core::ModuleSpec;
use walkdir::WalkDir;

use crate::context::BuildContext;
use crate::{Error, Result};

/// Generator executable looked up on the search path.
pub const GENERATOR_PROGRAM: &str = "tree-sitter";

/// Fixed subcommand passed to the generator.
pub const GENERATE_SUBCOMMAND: &str = "generate";

/// Environment variable naming an explicit generator executable.
pub const GENERATOR_ENV: &str = "GROVE_TREE_SITTER";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Program name searched on the path.
    pub program: String,
    /// Explicit executable, tried before the search path.
    pub explicit: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program: GENERATOR_PROGRAM.to_owned(),
            explicit: None,
        }
    }
}

impl GeneratorConfig {
    pub fn with_explicit(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit = Some(path.into());
        self
    }

    /// Default config, with `GROVE_TREE_SITTER` as the explicit executable if set.
    pub fn from_env() -> Self {
        Self {
            explicit: std::env::var_os(GENERATOR_ENV).map(PathBuf::from),
            ..Self::default()
        }
    }
}

/// Return the tree to compile `spec` from.
///
/// Modules without `needs_generation` compile straight from `package_root`.
/// Others get a staged copy on which the generator has run successfully.
pub fn prepare_sources(
    ctx: &BuildContext<'_>,
    spec: &ModuleSpec,
    package_root: &Path,
) -> Result<PathBuf> {
    if !spec.needs_generation {
        return Ok(package_root.to_path_buf());
    }

    let generator = locate_generator(ctx, spec)?;
    let staged = ctx.module_dir(spec).join("tree");
    stage_tree(package_root, &staged)?;

    tracing::info!(module = spec.name, generator = %generator.display(), "generating parser");
    let output = ctx
        .commands
        .run(&generator, &[GENERATE_SUBCOMMAND], &staged)
        .map_err(|source| Error::GeneratorSpawn {
            module: spec.name.to_owned(),
            program: generator.clone(),
            source,
        })?;

    if !output.success {
        let stderr = output.stderr.trim();
        return Err(Error::GeneratorFailed {
            module: spec.name.to_owned(),
            program: generator,
            status: output.status,
            stderr: if stderr.is_empty() {
                String::new()
            } else {
                format!("\n{stderr}")
            },
        });
    }

    Ok(staged)
}

fn locate_generator(ctx: &BuildContext<'_>, spec: &ModuleSpec) -> Result<PathBuf> {
    let config = &ctx.generator;
    if let Some(explicit) = &config.explicit {
        match ctx.commands.locate(&explicit.to_string_lossy()) {
            Some(path) => return Ok(path),
            None => tracing::warn!(
                path = %explicit.display(),
                "configured generator not found, searching PATH"
            ),
        }
    }

    ctx.commands
        .locate(&config.program)
        .inspect(|path| tracing::debug!(path = %path.display(), "located generator"))
        .ok_or_else(|| Error::GeneratorNotFound {
            module: spec.name.to_owned(),
            program: config.program.clone(),
        })
}

/// Replace `dest` with a fresh copy of `src`.
fn stage_tree(src: &Path, dest: &Path) -> Result<()> {
    if dest.exists() {
        fs::remove_dir_all(dest).map_err(|e| Error::io(dest, e))?;
    }

    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            Error::io(path, e.into())
        })?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| Error::io(&target, e))?;
        }
    }
    Ok(())
}

//! Compilation of one module's C sources into a static archive.

use std::fs;
use std::path::{Path, PathBuf};

use grove_core::ModuleSpec;
use serde::Serialize;

use crate::context::{BuildContext, TargetParams};
use crate::header;
use crate::{Error, Result};

/// C dialect every grammar is compiled with.
pub const C_STANDARD: &str = "c11";

pub const PARSER_SOURCE: &str = "parser.c";
pub const SCANNER_SOURCE: &str = "scanner.c";

/// Inputs for compiling one module.
#[derive(Debug, Clone)]
pub struct CompileUnit<'a> {
    pub module: &'a ModuleSpec,
    pub library_name: String,
    pub include_dir: PathBuf,
    pub sources: Vec<PathBuf>,
    /// Where objects and the archive are written. Private to this unit.
    pub out_dir: PathBuf,
    pub target: &'a TargetParams,
}

/// C compiler capability. Returns the path of the produced archive.
pub trait UnitCompiler: Send + Sync {
    fn compile(&self, unit: &CompileUnit<'_>) -> Result<PathBuf>;
}

/// Compiles with the `cc` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct CcCompiler {
    /// Let `cc` print its own `cargo:` directives. Off when the composer emits them.
    pub emit_cargo_metadata: bool,
}

impl UnitCompiler for CcCompiler {
    fn compile(&self, unit: &CompileUnit<'_>) -> Result<PathBuf> {
        let mut build = cc::Build::new();
        build
            .std(C_STANDARD)
            .include(&unit.include_dir)
            .out_dir(&unit.out_dir)
            .target(&unit.target.target)
            .host(&unit.target.host)
            .opt_level_str(&unit.target.opt_level)
            .debug(unit.target.debug)
            .warnings(false)
            .cargo_metadata(self.emit_cargo_metadata)
            .cargo_warnings(self.emit_cargo_metadata);

        if unit.target.is_msvc() {
            build.flag("-utf-8");
        }
        for source in &unit.sources {
            build.file(source);
        }

        build
            .try_compile(&unit.library_name)
            .map_err(|e| Error::Compile {
                module: unit.module.name.to_owned(),
                message: e.to_string(),
            })?;

        Ok(unit
            .out_dir
            .join(archive_file_name(unit.target, &unit.library_name)))
    }
}

/// `lib<name>.a`, or `<name>.lib` for MSVC targets.
pub fn archive_file_name(target: &TargetParams, library_name: &str) -> String {
    if target.is_msvc() {
        format!("{library_name}.lib")
    } else {
        format!("lib{library_name}.a")
    }
}

/// One compiled module, owned by the composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledModule {
    pub name: &'static str,
    pub library_name: String,
    pub accessor: String,
    /// Installed archive.
    pub archive: PathBuf,
    /// Installed header.
    pub header: PathBuf,
}

/// Source files to compile for `spec` inside `source_dir`.
pub fn collect_sources(spec: &ModuleSpec, source_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut names = vec![PARSER_SOURCE];
    if spec.has_scanner {
        names.push(SCANNER_SOURCE);
    }

    names
        .into_iter()
        .map(|name| {
            let path = source_dir.join(name);
            if path.is_file() {
                Ok(path)
            } else {
                Err(Error::MissingSource {
                    module: spec.name.to_owned(),
                    path,
                })
            }
        })
        .collect()
}

/// Compile `spec` from `source_tree`, then install its archive and header.
pub fn build_unit(
    ctx: &BuildContext<'_>,
    spec: &ModuleSpec,
    source_tree: &Path,
) -> Result<CompiledModule> {
    let source_dir = source_tree.join(spec.source_root);
    let sources = collect_sources(spec, &source_dir)?;

    let out_dir = ctx.module_dir(spec).join("obj");
    fs::create_dir_all(&out_dir).map_err(|e| Error::io(&out_dir, e))?;

    let unit = CompileUnit {
        module: spec,
        library_name: spec.library_name(),
        include_dir: source_dir,
        sources,
        out_dir,
        target: &ctx.target,
    };
    tracing::info!(module = spec.name, sources = unit.sources.len(), "compiling");
    let artifact = ctx.compiler.compile(&unit)?;

    let header = header::stage_and_install(ctx, spec)?;
    let archive = install_archive(ctx, &artifact)?;

    Ok(CompiledModule {
        name: spec.name,
        library_name: unit.library_name,
        accessor: spec.accessor(),
        archive,
        header,
    })
}

fn install_archive(ctx: &BuildContext<'_>, artifact: &Path) -> Result<PathBuf> {
    let lib_dir = ctx.lib_dir();
    fs::create_dir_all(&lib_dir).map_err(|e| Error::io(&lib_dir, e))?;

    let Some(file_name) = artifact.file_name() else {
        return Err(Error::io(
            artifact,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "archive has no file name"),
        ));
    };
    let installed = lib_dir.join(file_name);
    fs::copy(artifact, &installed).map_err(|e| Error::io(&installed, e))?;
    Ok(installed)
}

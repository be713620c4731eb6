//! Composition of the core library and compiled modules into one target.
//!
//! The resolved configuration travels with the composed module and is
//! exported three ways: Cargo `cfg` directives, a generated `build_options.rs`
//! with one boolean constant per module, and `resolved.json`.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use grove_core::ResolvedConfig;
use grove_core::utils::to_macro_case;
use serde::Serialize;

use crate::compile::CompiledModule;
use crate::context::BuildContext;
use crate::{Error, Result};

/// `cfg` key carrying each included module name.
pub const LANG_CFG: &str = "grove_lang";
/// `cfg` flag set when the aggregate option resolved to true.
pub const ALL_LANGUAGES_CFG: &str = "grove_all_languages";

pub const BUILD_OPTIONS_FILE: &str = "build_options.rs";
pub const RESOLVED_FILE: &str = "resolved.json";
pub const MANIFEST_FILE: &str = "composed.json";

/// The shared tree-sitter runtime every module links against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoreLibrary {
    /// Linked through a Rust dependency; nothing to emit.
    Crate { name: String },
    /// A prebuilt static archive `lib<name>.a` in `search_dir`.
    Native { name: String, search_dir: PathBuf },
}

/// The single exported build target.
#[derive(Debug, Clone)]
pub struct ComposedModule {
    pub config: ResolvedConfig,
    pub core: CoreLibrary,
    /// Compiled modules in registry order.
    pub units: Vec<CompiledModule>,
    pub lib_dir: PathBuf,
    pub include_dir: PathBuf,
}

/// Serialized description of a [`ComposedModule`].
#[derive(Debug, Serialize)]
pub struct ComposedManifest<'a> {
    pub core: &'a CoreLibrary,
    pub link_search: Vec<&'a Path>,
    pub link_libraries: Vec<&'a str>,
    pub include_dir: &'a Path,
    pub modules: &'a [CompiledModule],
}

/// Assemble the composed module. `units` may arrive in any order.
pub fn compose(
    ctx: &BuildContext<'_>,
    core: CoreLibrary,
    mut units: Vec<CompiledModule>,
    config: ResolvedConfig,
) -> ComposedModule {
    let position = |name: &str| {
        ctx.registry
            .all()
            .iter()
            .position(|spec| spec.name == name)
            .unwrap_or(usize::MAX)
    };
    units.sort_by_key(|unit| position(unit.name));

    tracing::info!(
        modules = units.len(),
        all = config.all(),
        "composing grammar library"
    );
    ComposedModule {
        config,
        core,
        units,
        lib_dir: ctx.lib_dir(),
        include_dir: ctx.include_dir(),
    }
}

impl ComposedModule {
    /// Libraries to link, modules first, then the core archive if native.
    pub fn link_libraries(&self) -> Vec<&str> {
        let mut libs: Vec<&str> = self
            .units
            .iter()
            .map(|unit| unit.library_name.as_str())
            .collect();
        if let CoreLibrary::Native { name, .. } = &self.core {
            libs.push(name);
        }
        libs
    }

    pub fn link_search(&self) -> Vec<&Path> {
        let mut dirs = Vec::new();
        if !self.units.is_empty() {
            dirs.push(self.lib_dir.as_path());
        }
        if let CoreLibrary::Native { search_dir, .. } = &self.core {
            dirs.push(search_dir.as_path());
        }
        dirs
    }

    /// `cargo::` lines linking every archive and exporting the selection as `cfg`s.
    pub fn cargo_directives(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for dir in self.link_search() {
            lines.push(format!("cargo::rustc-link-search=native={}", dir.display()));
        }
        for lib in self.link_libraries() {
            lines.push(format!("cargo::rustc-link-lib=static={lib}"));
        }

        let values = self
            .config
            .modules()
            .map(|(name, _)| format!("\"{name}\""))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("cargo::rustc-check-cfg=cfg({LANG_CFG}, values({values}))"));
        lines.push(format!("cargo::rustc-check-cfg=cfg({ALL_LANGUAGES_CFG})"));

        for name in self.config.included() {
            lines.push(format!("cargo::rustc-cfg={LANG_CFG}=\"{name}\""));
        }
        if self.config.all() {
            lines.push(format!("cargo::rustc-cfg={ALL_LANGUAGES_CFG}"));
        }
        lines
    }

    pub fn emit_cargo_directives(&self, out: &mut impl io::Write) -> io::Result<()> {
        for line in self.cargo_directives() {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    /// Rust source with one `pub const <NAME>: bool` per registered module.
    pub fn build_options_source(&self) -> String {
        build_options_source(&self.config)
    }

    pub fn manifest(&self) -> ComposedManifest<'_> {
        ComposedManifest {
            core: &self.core,
            link_search: self.link_search(),
            link_libraries: self.link_libraries(),
            include_dir: &self.include_dir,
            modules: &self.units,
        }
    }

    /// Write `build_options.rs`, `resolved.json` and `composed.json` into `out_dir`.
    pub fn write_outputs(&self, out_dir: &Path) -> Result<()> {
        fs::create_dir_all(out_dir).map_err(|e| Error::io(out_dir, e))?;

        write_file(&out_dir.join(BUILD_OPTIONS_FILE), &self.build_options_source())?;
        write_file(&out_dir.join(RESOLVED_FILE), &to_json(&self.config, out_dir)?)?;
        write_file(&out_dir.join(MANIFEST_FILE), &to_json(&self.manifest(), out_dir)?)?;
        Ok(())
    }
}

/// Generated constants for `config`, usable from `include!`.
pub fn build_options_source(config: &ResolvedConfig) -> String {
    let mut src = String::from("// @generated by grove. Do not edit.\n\n");
    writeln!(src, "pub const ALL: bool = {};", config.all()).unwrap();
    for (name, included) in config.modules() {
        writeln!(src, "pub const {}: bool = {included};", to_macro_case(name)).unwrap();
    }

    let enabled = config
        .included()
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(src, "\npub const ENABLED: &[&str] = &[{enabled}];").unwrap();
    src
}

fn to_json<T: Serialize>(value: &T, out_dir: &Path) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map(|mut json| {
            json.push('\n');
            json
        })
        .map_err(|e| Error::io(out_dir, io::Error::other(e)))
}

/// Remove the composed outputs of an earlier run, so a failed build leaves none behind.
pub fn clear_outputs(out_dir: &Path) -> Result<()> {
    for file in [BUILD_OPTIONS_FILE, RESOLVED_FILE, MANIFEST_FILE] {
        let path = out_dir.join(file);
        match fs::remove_file(&path) {
            Ok(()) => tracing::debug!(path = %path.display(), "removed stale output"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::io(path, e)),
        }
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| Error::io(path, e))
}

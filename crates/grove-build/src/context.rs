//! Explicit build context threaded through every pipeline step.

use std::path::{Path, PathBuf};

use grove_core::{ModuleSpec, Registry};

use crate::command::CommandRunner;
use crate::compile::UnitCompiler;
use crate::generate::GeneratorConfig;
use crate::materialize::Materializer;

/// Target and optimization parameters for fetching and compiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetParams {
    pub target: String,
    pub host: String,
    pub opt_level: String,
    pub debug: bool,
}

impl TargetParams {
    /// Native build for `triple` with release optimizations.
    pub fn native(triple: &str) -> Self {
        Self {
            target: triple.to_owned(),
            host: triple.to_owned(),
            opt_level: "3".to_owned(),
            debug: false,
        }
    }

    /// Parameters Cargo passes to build scripts (`TARGET`, `HOST`, `OPT_LEVEL`, `DEBUG`).
    pub fn from_cargo_env() -> Option<Self> {
        let var = |key: &str| std::env::var(key).ok();
        Some(Self {
            target: var("TARGET")?,
            host: var("HOST")?,
            opt_level: var("OPT_LEVEL").unwrap_or_else(|| "0".to_owned()),
            debug: var("DEBUG").is_some_and(|v| v == "true"),
        })
    }

    pub fn with_opt_level(mut self, opt_level: &str) -> Self {
        self.opt_level = opt_level.to_owned();
        self
    }

    pub fn is_msvc(&self) -> bool {
        self.target.contains("msvc")
    }
}

/// Everything a pipeline step may consult. Nothing is read from globals.
pub struct BuildContext<'a> {
    pub registry: &'a Registry,
    pub target: TargetParams,
    out_dir: PathBuf,
    pub materializer: &'a dyn Materializer,
    pub commands: &'a dyn CommandRunner,
    pub compiler: &'a dyn UnitCompiler,
    pub generator: GeneratorConfig,
    /// Upper bound on concurrently running module pipelines.
    pub jobs: Option<usize>,
}

impl<'a> BuildContext<'a> {
    pub fn new(
        registry: &'a Registry,
        target: TargetParams,
        out_dir: impl Into<PathBuf>,
        materializer: &'a dyn Materializer,
        commands: &'a dyn CommandRunner,
        compiler: &'a dyn UnitCompiler,
    ) -> Self {
        Self {
            registry,
            target,
            out_dir: out_dir.into(),
            materializer,
            commands,
            compiler,
            generator: GeneratorConfig::default(),
            jobs: None,
        }
    }

    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Private working directory of one module pipeline.
    pub fn module_dir(&self, spec: &ModuleSpec) -> PathBuf {
        self.out_dir.join("modules").join(spec.name)
    }

    /// Installed static archives.
    pub fn lib_dir(&self) -> PathBuf {
        self.out_dir.join("lib")
    }

    /// Root of installed headers; module headers live in `tree_sitter/` below it.
    pub fn include_dir(&self) -> PathBuf {
        self.out_dir.join("include")
    }

    pub fn header_install_dir(&self) -> PathBuf {
        self.include_dir().join("tree_sitter")
    }
}

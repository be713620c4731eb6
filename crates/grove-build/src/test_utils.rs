//! Fakes and fixtures shared by the build tests.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use grove_core::{ModuleSpec, Registry};
use tempfile::TempDir;

use crate::command::{CommandOutput, CommandRunner};
use crate::compile::{CompileUnit, UnitCompiler, archive_file_name};
use crate::context::{BuildContext, TargetParams};
use crate::materialize::DirectoryMaterializer;
use crate::{Error, Result};

pub const TEST_TRIPLE: &str = "x86_64-unknown-linux-gnu";

pub fn test_registry() -> Registry {
    Registry::new([
        ModuleSpec::new("json").scanner(false),
        ModuleSpec::new("markdown").source_root("tree-sitter-markdown/src"),
        ModuleSpec::new("swift").generate(true),
        ModuleSpec::new("zig").scanner(false),
    ])
    .unwrap()
}

/// Write a fetched package for `spec` under `packages`, with the sources it needs.
pub fn write_package(packages: &Path, spec: &ModuleSpec) -> PathBuf {
    let root = packages.join(spec.package_name());
    if spec.needs_generation {
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("grammar.js"), format!("// grammar {}\n", spec.name)).unwrap();
        if spec.has_scanner {
            let src = root.join(spec.source_root);
            fs::create_dir_all(&src).unwrap();
            fs::write(src.join("scanner.c"), format!("/* {} scanner */\n", spec.name)).unwrap();
        }
        return root;
    }

    let src = root.join(spec.source_root);
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("parser.c"), format!("/* {} parser */\n", spec.name)).unwrap();
    if spec.has_scanner {
        fs::write(src.join("scanner.c"), format!("/* {} scanner */\n", spec.name)).unwrap();
    }
    root
}

/// Tools known by name, with a scripted outcome for `run`.
#[derive(Default)]
pub struct FakeCommands {
    programs: HashMap<String, PathBuf>,
    fail_with: Option<String>,
    calls: Mutex<Vec<(PathBuf, Vec<String>, PathBuf)>>,
}

impl FakeCommands {
    pub fn with_program(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.programs.insert(name.to_owned(), path.into());
        self
    }

    pub fn failing(mut self, stderr: &str) -> Self {
        self.fail_with = Some(stderr.to_owned());
        self
    }

    pub fn calls(&self) -> Vec<(PathBuf, Vec<String>, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeCommands {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        self.programs.get(program).cloned()
    }

    /// A successful run behaves like `tree-sitter generate`: writes `src/parser.c`.
    fn run(&self, program: &Path, args: &[&str], cwd: &Path) -> io::Result<CommandOutput> {
        self.calls.lock().unwrap().push((
            program.to_path_buf(),
            args.iter().map(|a| (*a).to_owned()).collect(),
            cwd.to_path_buf(),
        ));

        if let Some(stderr) = &self.fail_with {
            return Ok(CommandOutput {
                success: false,
                status: "exit status: 1".to_owned(),
                stderr: stderr.clone(),
            });
        }

        let src = cwd.join("src");
        fs::create_dir_all(&src)?;
        fs::write(src.join("parser.c"), "/* generated parser */\n")?;
        Ok(CommandOutput {
            success: true,
            status: "exit status: 0".to_owned(),
            stderr: String::new(),
        })
    }
}

/// Records every unit and writes an archive listing the unit's sources.
#[derive(Default)]
pub struct RecordingCompiler {
    fail_on: Option<&'static str>,
    units: Mutex<Vec<RecordedUnit>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUnit {
    pub module: &'static str,
    pub library_name: String,
    pub include_dir: PathBuf,
    pub sources: Vec<PathBuf>,
    pub out_dir: PathBuf,
}

impl RecordingCompiler {
    pub fn failing_on(module: &'static str) -> Self {
        Self {
            fail_on: Some(module),
            ..Self::default()
        }
    }

    pub fn units(&self) -> Vec<RecordedUnit> {
        let mut units = self.units.lock().unwrap().clone();
        units.sort_by_key(|unit| unit.module);
        units
    }

    pub fn compiled(&self) -> Vec<&'static str> {
        self.units().into_iter().map(|unit| unit.module).collect()
    }
}

impl UnitCompiler for RecordingCompiler {
    fn compile(&self, unit: &CompileUnit<'_>) -> Result<PathBuf> {
        self.units.lock().unwrap().push(RecordedUnit {
            module: unit.module.name,
            library_name: unit.library_name.clone(),
            include_dir: unit.include_dir.clone(),
            sources: unit.sources.clone(),
            out_dir: unit.out_dir.clone(),
        });

        if self.fail_on == Some(unit.module.name) {
            return Err(Error::Compile {
                module: unit.module.name.to_owned(),
                message: "cc exited with status 1".to_owned(),
            });
        }

        let mut contents = String::new();
        for source in &unit.sources {
            contents.push_str(&fs::read_to_string(source).unwrap());
        }
        let archive = unit
            .out_dir
            .join(archive_file_name(unit.target, &unit.library_name));
        fs::write(&archive, contents).unwrap();
        Ok(archive)
    }
}

/// A temporary build: package directory, output directory and fakes.
pub struct Fixture {
    pub dir: TempDir,
    pub registry: Registry,
    pub materializer: DirectoryMaterializer,
    pub commands: FakeCommands,
    pub compiler: RecordingCompiler,
}

impl Fixture {
    /// Every module of [`test_registry`] has a package on disk.
    pub fn new() -> Self {
        Self::with_fakes(FakeCommands::default(), RecordingCompiler::default())
    }

    pub fn with_fakes(commands: FakeCommands, compiler: RecordingCompiler) -> Self {
        let dir = TempDir::new().unwrap();
        let registry = test_registry();
        let packages = dir.path().join("packages");
        for spec in registry.all() {
            write_package(&packages, spec);
        }
        Self {
            materializer: DirectoryMaterializer::new(&packages),
            dir,
            registry,
            commands,
            compiler,
        }
    }

    pub fn packages(&self) -> PathBuf {
        self.dir.path().join("packages")
    }

    pub fn out_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    pub fn spec(&self, name: &str) -> ModuleSpec {
        *self.registry.lookup(name).unwrap()
    }

    pub fn ctx(&self) -> BuildContext<'_> {
        BuildContext::new(
            &self.registry,
            TargetParams::native(TEST_TRIPLE),
            self.out_dir(),
            &self.materializer,
            &self.commands,
            &self.compiler,
        )
    }

    /// Relative form of `path` for stable assertions.
    pub fn rel(&self, path: &Path) -> String {
        path.strip_prefix(self.dir.path())
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

use std::io;
use std::path::PathBuf;

use grove_build::{
    BuildContext, CargoMaterializer, CcCompiler, ComposedModule, CoreLibrary,
    DirectoryMaterializer, GeneratorConfig, GrammarLock, Materializer, SystemCommands,
    TargetParams, VerifiedMaterializer,
};
use grove_core::{Registry, read_intent, resolve};

use super::options_loader::{OptionSources, load_options};
use super::report::exit_with;

/// Name of the prebuilt core archive looked up in `--core-lib-dir`.
const CORE_LIBRARY: &str = "tree-sitter";

pub struct BuildArgs {
    pub out_dir: PathBuf,
    pub grammars_dir: Option<PathBuf>,
    pub manifest_path: Option<PathBuf>,
    pub lock: Option<PathBuf>,
    pub target: String,
    pub opt_level: String,
    pub jobs: Option<usize>,
    pub tree_sitter: Option<PathBuf>,
    pub core_lib_dir: Option<PathBuf>,
    pub emit_cargo: bool,
    pub options: OptionSources,
    /// `--` followed by the selection flags.
    pub intent_args: Vec<String>,
}

pub fn run(args: BuildArgs) {
    let registry = Registry::builtin();
    let composed = match build(&registry, &args) {
        Ok(composed) => composed,
        Err(e) => exit_with(&registry, &e),
    };

    if args.emit_cargo {
        if let Err(e) = composed.emit_cargo_directives(&mut io::stdout().lock()) {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
        return;
    }

    println!(
        "Built {} of {} modules into {}",
        composed.units.len(),
        registry.len(),
        args.out_dir.display()
    );
    for unit in &composed.units {
        println!("  {:12} {}", unit.name, unit.archive.display());
    }
}

pub fn build(registry: &Registry, args: &BuildArgs) -> grove_build::Result<ComposedModule> {
    let options = load_options(registry, &args.options)?;
    let intent = read_intent(registry, &args.intent_args)?;
    let config = resolve(registry, &intent, &options);
    tracing::debug!(
        all = config.all(),
        included = ?config.included().collect::<Vec<_>>(),
        "resolved selection"
    );

    let target = TargetParams::native(&args.target).with_opt_level(&args.opt_level);
    let materializer = materializer(args, &target)?;
    let commands = SystemCommands::new();
    let compiler = CcCompiler::default();

    let mut generator = GeneratorConfig::from_env();
    if let Some(path) = &args.tree_sitter {
        generator = generator.with_explicit(path);
    }

    let mut ctx = BuildContext::new(
        registry,
        target,
        &args.out_dir,
        &*materializer,
        &commands,
        &compiler,
    )
    .with_generator(generator);
    if let Some(jobs) = args.jobs {
        ctx = ctx.with_jobs(jobs);
    }

    grove_build::build(&ctx, &config, core_library(args))
}

fn materializer(
    args: &BuildArgs,
    target: &TargetParams,
) -> grove_build::Result<Box<dyn Materializer>> {
    let inner: Box<dyn Materializer> = match (&args.grammars_dir, &args.manifest_path) {
        (Some(dir), _) => Box::new(DirectoryMaterializer::new(dir)),
        (None, Some(manifest)) => Box::new(CargoMaterializer::load(manifest, target)?),
        (None, None) => {
            tracing::debug!("no package source given, using ./grammars");
            Box::new(DirectoryMaterializer::new("grammars"))
        }
    };

    match &args.lock {
        Some(path) => Ok(Box::new(VerifiedMaterializer::new(
            inner,
            GrammarLock::load(path)?,
        ))),
        None => Ok(inner),
    }
}

fn core_library(args: &BuildArgs) -> CoreLibrary {
    match &args.core_lib_dir {
        Some(dir) => CoreLibrary::Native {
            name: CORE_LIBRARY.to_owned(),
            search_dir: dir.clone(),
        },
        None => CoreLibrary::Crate {
            name: CORE_LIBRARY.to_owned(),
        },
    }
}

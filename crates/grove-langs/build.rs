use std::env;
use std::io;
use std::path::PathBuf;

use grove_build::{
    BuildContext, CargoMaterializer, CcCompiler, CoreLibrary, DirectoryMaterializer,
    GeneratorConfig, GrammarLock, Materializer, SystemCommands, TargetParams,
    VerifiedMaterializer,
};
use grove_core::options::ALL_ENV_OPTION;
use grove_core::utils::{env_option_key, module_from_feature_env};
use grove_core::{DeclarativeOptions, Registry, SelectionIntent, resolve};

/// Directory holding pre-fetched grammar packages.
const GRAMMARS_DIR_ENV: &str = "GROVE_GRAMMARS_DIR";
/// Cargo manifest declaring `tree-sitter-*` packages to fetch.
const GRAMMARS_MANIFEST_ENV: &str = "GROVE_GRAMMARS_MANIFEST";
const OPTIONS_FILE_ENV: &str = "GROVE_OPTIONS_FILE";
const LOCK_FILE_ENV: &str = "GROVE_GRAMMAR_LOCK";
const TREE_SITTER_ENV: &str = "GROVE_TREE_SITTER";

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> grove_build::Result<()> {
    let registry = Registry::builtin();
    rerun_directives(&registry);

    // Enabled features are the selection intent of this build.
    let mut features: Vec<String> = env::vars()
        .filter_map(|(key, _)| {
            key.strip_prefix("CARGO_FEATURE_LANG_")
                .map(module_from_feature_env)
        })
        .collect();
    features.sort();

    let mut intent = SelectionIntent::new();
    for name in &features {
        intent.push_language(&registry, name)?;
    }
    if env::var_os("CARGO_FEATURE_ALL_LANGUAGES").is_some() {
        intent.set_all_languages();
    }

    let mut options = DeclarativeOptions::from_env(&registry)?;
    if let Some(path) = env::var_os(OPTIONS_FILE_ENV) {
        let file = DeclarativeOptions::load_json_file(&registry, &PathBuf::from(path))?;
        options = options.overridden_by(file);
    }
    let config = resolve(&registry, &intent, &options);

    let out_dir = PathBuf::from(env::var_os("OUT_DIR").unwrap_or_default());
    let target = TargetParams::from_cargo_env().unwrap_or_else(|| {
        let triple = env::var("TARGET").unwrap_or_default();
        TargetParams::native(&triple)
    });

    let materializer = materializer(&target, config.included_count() > 0)?;
    let commands = SystemCommands::new();
    let compiler = CcCompiler::default();

    let mut ctx = BuildContext::new(
        &registry,
        target,
        &out_dir,
        &*materializer,
        &commands,
        &compiler,
    )
    .with_generator(GeneratorConfig::from_env());
    if let Some(jobs) = env::var("NUM_JOBS").ok().and_then(|n| n.parse().ok()) {
        ctx = ctx.with_jobs(jobs);
    }

    let core = CoreLibrary::Crate {
        name: "arborium-tree-sitter".to_owned(),
    };
    let composed = grove_build::build(&ctx, &config, core)?;
    composed
        .emit_cargo_directives(&mut io::stdout().lock())
        .map_err(|e| grove_build::Error::Io {
            path: PathBuf::from("<stdout>"),
            source: e,
        })?;
    println!(
        "cargo::rustc-env=GROVE_INCLUDE_DIR={}",
        composed.include_dir.display()
    );
    Ok(())
}

fn materializer(
    target: &TargetParams,
    needed: bool,
) -> grove_build::Result<Box<dyn Materializer>> {
    let dir = env::var_os(GRAMMARS_DIR_ENV);
    let manifest = env::var_os(GRAMMARS_MANIFEST_ENV);
    let inner: Box<dyn Materializer> = match (dir, manifest) {
        (Some(dir), _) => Box::new(DirectoryMaterializer::new(dir)),
        // `cargo metadata` is only worth running when something is selected
        (None, Some(manifest)) if needed => {
            Box::new(CargoMaterializer::load(&PathBuf::from(manifest), target)?)
        }
        _ => Box::new(CargoMaterializer::from_packages([])),
    };

    match env::var_os(LOCK_FILE_ENV) {
        Some(path) => {
            let lock = GrammarLock::load(&PathBuf::from(path))?;
            Ok(Box::new(VerifiedMaterializer::new(inner, lock)))
        }
        None => Ok(inner),
    }
}

fn rerun_directives(registry: &Registry) {
    for spec in registry.all() {
        println!("cargo::rerun-if-env-changed={}", env_option_key(spec.name));
    }
    for key in [
        ALL_ENV_OPTION,
        GRAMMARS_DIR_ENV,
        GRAMMARS_MANIFEST_ENV,
        OPTIONS_FILE_ENV,
        LOCK_FILE_ENV,
        TREE_SITTER_ENV,
    ] {
        println!("cargo::rerun-if-env-changed={key}");
    }
    for key in [GRAMMARS_DIR_ENV, OPTIONS_FILE_ENV, LOCK_FILE_ENV] {
        if let Some(path) = env::var_os(key) {
            println!("cargo::rerun-if-changed={}", PathBuf::from(path).display());
        }
    }

    println!("cargo::rerun-if-changed=build.rs");
    println!("cargo::rerun-if-changed=Cargo.toml");
}

//! Per-module pipelines and the final composition.

use grove_core::{DeclarativeOptions, ModuleSpec, ResolvedConfig, read_intent, resolve};
use rayon::prelude::*;

use crate::compile::{self, CompiledModule};
use crate::compose::{self, ComposedModule, CoreLibrary};
use crate::context::BuildContext;
use crate::generate;
use crate::Result;

/// Resolve the configuration for one invocation from raw arguments and options.
pub fn resolve_from_args<S: AsRef<str>>(
    ctx: &BuildContext<'_>,
    argv: &[S],
    options: &DeclarativeOptions,
) -> Result<ResolvedConfig> {
    let intent = read_intent(ctx.registry, argv)?;
    Ok(resolve(ctx.registry, &intent, options))
}

/// Materialize, optionally generate, then compile one module.
pub fn build_module(ctx: &BuildContext<'_>, spec: &ModuleSpec) -> Result<CompiledModule> {
    let _span = tracing::info_span!("module", name = spec.name).entered();

    let package_root = ctx.materializer.materialize(spec, &ctx.target)?;
    tracing::info!(root = %package_root.display(), "materialized");

    let source_tree = generate::prepare_sources(ctx, spec, &package_root)?;
    compile::build_unit(ctx, spec, &source_tree)
}

/// Run every included module's pipeline, then compose and write the outputs.
///
/// Outputs of an earlier run are removed first. The first failing module
/// fails the whole build; nothing is composed then.
pub fn build(
    ctx: &BuildContext<'_>,
    config: &ResolvedConfig,
    core: CoreLibrary,
) -> Result<ComposedModule> {
    let specs = config.included_specs(ctx.registry);
    tracing::info!(modules = specs.len(), out_dir = %ctx.out_dir().display(), "building");
    compose::clear_outputs(ctx.out_dir())?;

    let run = || -> Result<Vec<CompiledModule>> {
        specs
            .par_iter()
            .map(|spec| build_module(ctx, spec))
            .collect()
    };

    let units = match ctx.jobs {
        Some(jobs) => match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool.install(run),
            Err(e) => {
                tracing::warn!(jobs, error = %e, "cannot create thread pool, using the global one");
                run()
            }
        },
        None => run(),
    }?;

    let composed = compose::compose(ctx, core, units, config.clone());
    composed.write_outputs(ctx.out_dir())?;
    Ok(composed)
}

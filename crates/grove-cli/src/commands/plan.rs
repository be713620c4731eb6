use grove_core::{Registry, ResolvedConfig, read_intent, resolve};

use super::options_loader::{OptionSources, load_options};
use super::report::exit_with;

pub struct PlanArgs {
    pub options: OptionSources,
    /// `--` followed by the selection flags.
    pub intent_args: Vec<String>,
}

pub fn run(args: PlanArgs) {
    let registry = Registry::builtin();
    let config = match plan(&registry, &args) {
        Ok(config) => config,
        Err(e) => exit_with(&registry, &e),
    };

    match config.to_json_pretty() {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

/// Resolve the selection exactly as `grove build` would, without building.
pub fn plan(registry: &Registry, args: &PlanArgs) -> grove_build::Result<ResolvedConfig> {
    let options = load_options(registry, &args.options)?;
    let intent = read_intent(registry, &args.intent_args)?;
    Ok(resolve(registry, &intent, &options))
}

use grove_build::header::synthesize_header;
use grove_core::Registry;

use super::report::exit_with;

pub struct HeaderArgs {
    pub module: String,
}

pub fn run(args: HeaderArgs) {
    let registry = Registry::builtin();
    match render(&registry, &args.module) {
        Ok(header) => print!("{header}"),
        Err(e) => exit_with(&registry, &e),
    }
}

pub fn render(registry: &Registry, module: &str) -> grove_build::Result<String> {
    let Some(spec) = registry.lookup(module) else {
        return Err(grove_core::Error::UnknownModule {
            token: module.to_owned(),
        }
        .into());
    };
    Ok(synthesize_header(spec.name))
}

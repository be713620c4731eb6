use std::path::PathBuf;

use grove_core::{DeclarativeOptions, Registry};

/// Where declarative options come from, besides the environment.
#[derive(Debug, Clone, Default)]
pub struct OptionSources {
    /// `-D name=bool` pairs, in command-line order.
    pub defines: Vec<String>,
    pub options_file: Option<PathBuf>,
}

/// Environment, then the options file, then `-D` pairs; later sources win.
pub fn load_options(
    registry: &Registry,
    sources: &OptionSources,
) -> grove_core::Result<DeclarativeOptions> {
    load_options_with(registry, sources, |key| std::env::var(key).ok())
}

pub fn load_options_with<F>(
    registry: &Registry,
    sources: &OptionSources,
    env: F,
) -> grove_core::Result<DeclarativeOptions>
where
    F: Fn(&str) -> Option<String>,
{
    let mut options = DeclarativeOptions::from_env_with(registry, env)?;
    if let Some(path) = &sources.options_file {
        options = options.overridden_by(DeclarativeOptions::load_json_file(registry, path)?);
    }
    let defines = DeclarativeOptions::from_pairs(registry, &sources.defines)?;
    Ok(options.overridden_by(defines))
}

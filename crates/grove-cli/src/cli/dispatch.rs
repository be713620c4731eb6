//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! - `*Params` structs mirror command `*Args` but are populated from clap
//! - `from_matches()` extractors pull the relevant fields
//! - `Into<*Args>` impls bridge dispatch → command handlers

use std::path::PathBuf;

use clap::ArgMatches;
use grove_core::intent::SEPARATOR;

use crate::commands::build::BuildArgs;
use crate::commands::header::HeaderArgs;
use crate::commands::list::ListArgs;
use crate::commands::options_loader::OptionSources;
use crate::commands::plan::PlanArgs;

/// Target used when `--target` is absent: the triple grove itself was built for.
const HOST_TRIPLE: &str = env!("GROVE_HOST_TRIPLE");

pub fn verbosity(m: &ArgMatches) -> u8 {
    m.get_count("verbose")
}

pub struct ListParams {
    pub json: bool,
}

impl ListParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            json: m.get_flag("json"),
        }
    }
}

impl From<ListParams> for ListArgs {
    fn from(p: ListParams) -> Self {
        Self { json: p.json }
    }
}

pub struct PlanParams {
    pub defines: Vec<String>,
    pub options_file: Option<PathBuf>,
    pub intent_args: Vec<String>,
}

impl PlanParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            defines: parse_defines(m),
            options_file: m.get_one::<PathBuf>("options_file").cloned(),
            intent_args: parse_intent_args(m),
        }
    }
}

impl From<PlanParams> for PlanArgs {
    fn from(p: PlanParams) -> Self {
        Self {
            options: OptionSources {
                defines: p.defines,
                options_file: p.options_file,
            },
            intent_args: p.intent_args,
        }
    }
}

pub struct BuildParams {
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
    pub defines: Vec<String>,
    pub options_file: Option<PathBuf>,
    pub intent_args: Vec<String>,
}

impl BuildParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            out_dir: m
                .get_one::<PathBuf>("out_dir")
                .cloned()
                .unwrap_or_default(),
            grammars_dir: m.get_one::<PathBuf>("grammars_dir").cloned(),
            manifest_path: m.get_one::<PathBuf>("manifest_path").cloned(),
            lock: m.get_one::<PathBuf>("lock").cloned(),
            target: m
                .get_one::<String>("target")
                .cloned()
                .unwrap_or_else(|| HOST_TRIPLE.to_owned()),
            opt_level: m
                .get_one::<String>("opt_level")
                .cloned()
                .unwrap_or_else(|| "3".to_owned()),
            jobs: m
                .get_one::<u64>("jobs")
                .and_then(|&jobs| usize::try_from(jobs).ok()),
            tree_sitter: m.get_one::<PathBuf>("tree_sitter").cloned(),
            core_lib_dir: m.get_one::<PathBuf>("core_lib_dir").cloned(),
            emit_cargo: m.get_flag("emit_cargo"),
            defines: parse_defines(m),
            options_file: m.get_one::<PathBuf>("options_file").cloned(),
            intent_args: parse_intent_args(m),
        }
    }
}

impl From<BuildParams> for BuildArgs {
    fn from(p: BuildParams) -> Self {
        Self {
            out_dir: p.out_dir,
            grammars_dir: p.grammars_dir,
            manifest_path: p.manifest_path,
            lock: p.lock,
            target: p.target,
            opt_level: p.opt_level,
            jobs: p.jobs,
            tree_sitter: p.tree_sitter,
            core_lib_dir: p.core_lib_dir,
            emit_cargo: p.emit_cargo,
            options: OptionSources {
                defines: p.defines,
                options_file: p.options_file,
            },
            intent_args: p.intent_args,
        }
    }
}

pub struct HeaderParams {
    pub module: String,
}

impl HeaderParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            module: m.get_one::<String>("module").cloned().unwrap_or_default(),
        }
    }
}

impl From<HeaderParams> for HeaderArgs {
    fn from(p: HeaderParams) -> Self {
        Self { module: p.module }
    }
}

fn parse_defines(m: &ArgMatches) -> Vec<String> {
    m.get_many::<String>("define")
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

/// Argument vector for the intent reader: the separator, then the user flags.
fn parse_intent_args(m: &ArgMatches) -> Vec<String> {
    let flags = m
        .get_many::<String>("user_flags")
        .into_iter()
        .flatten()
        .cloned();
    std::iter::once(SEPARATOR.to_owned()).chain(flags).collect()
}

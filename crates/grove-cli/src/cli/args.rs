//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Declarative build option (-D NAME=BOOL), repeatable.
pub fn define_arg() -> Arg {
    Arg::new("define")
        .short('D')
        .value_name("NAME=BOOL")
        .action(ArgAction::Append)
        .help("Set a build option, e.g. -D zig=false or -D all=true")
}

/// JSON options file (--options).
pub fn options_file_arg() -> Arg {
    Arg::new("options_file")
        .long("options")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("JSON file of build options, e.g. {\"zig\": false}")
}

/// Selection flags after `--` (--language, --all-languages).
pub fn user_flags_arg() -> Arg {
    Arg::new("user_flags")
        .value_name("FLAGS")
        .num_args(0..)
        .last(true)
        .allow_hyphen_values(true)
        .help("Selection flags: --language <NAME>... and --all-languages")
}

/// Output directory (--out-dir).
pub fn out_dir_arg() -> Arg {
    Arg::new("out_dir")
        .long("out-dir")
        .short('o')
        .value_name("DIR")
        .value_parser(value_parser!(PathBuf))
        .required(true)
        .help("Directory for archives, headers and generated outputs")
}

/// Pre-fetched packages (--grammars-dir).
pub fn grammars_dir_arg() -> Arg {
    Arg::new("grammars_dir")
        .long("grammars-dir")
        .value_name("DIR")
        .value_parser(value_parser!(PathBuf))
        .conflicts_with("manifest_path")
        .help("Directory of fetched packages (tree-sitter-<name>/ or <name>/)")
}

/// Cargo manifest declaring grammar packages (--manifest-path).
pub fn manifest_path_arg() -> Arg {
    Arg::new("manifest_path")
        .long("manifest-path")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Cargo.toml declaring tree-sitter-<name> packages to fetch")
}

/// Integrity pins (--lock).
pub fn lock_arg() -> Arg {
    Arg::new("lock")
        .long("lock")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("JSON file pinning SHA-256 digests of module sources")
}

/// Target triple (--target).
pub fn target_arg() -> Arg {
    Arg::new("target")
        .long("target")
        .value_name("TRIPLE")
        .help("Target triple (defaults to the host)")
}

/// Optimization level (--opt-level).
pub fn opt_level_arg() -> Arg {
    Arg::new("opt_level")
        .long("opt-level")
        .value_name("LEVEL")
        .default_value("3")
        .value_parser(["0", "1", "2", "3", "s", "z"])
        .help("C optimization level")
}

/// Parallel module pipelines (-j/--jobs).
pub fn jobs_arg() -> Arg {
    Arg::new("jobs")
        .short('j')
        .long("jobs")
        .value_name("N")
        .value_parser(value_parser!(u64).range(1..))
        .help("Maximum number of modules built at once")
}

/// Generator executable (--tree-sitter).
pub fn tree_sitter_arg() -> Arg {
    Arg::new("tree_sitter")
        .long("tree-sitter")
        .value_name("PATH")
        .value_parser(value_parser!(PathBuf))
        .help("tree-sitter executable, tried before searching PATH")
}

/// Prebuilt core runtime archive directory (--core-lib-dir).
pub fn core_lib_dir_arg() -> Arg {
    Arg::new("core_lib_dir")
        .long("core-lib-dir")
        .value_name("DIR")
        .value_parser(value_parser!(PathBuf))
        .help("Directory containing a prebuilt libtree-sitter archive to link")
}

/// Print cargo directives to stdout (--emit-cargo).
pub fn emit_cargo_arg() -> Arg {
    Arg::new("emit_cargo")
        .long("emit-cargo")
        .action(ArgAction::SetTrue)
        .help("Print cargo:: link and cfg directives (for build scripts)")
}

/// JSON output (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

/// Module name (positional).
pub fn module_arg() -> Arg {
    Arg::new("module")
        .value_name("NAME")
        .required(true)
        .help("Registered module name, e.g. zig or c_sharp")
}

/// Verbosity (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .global(true)
        .help("Verbosity level (-v for debug, -vv for trace)")
}

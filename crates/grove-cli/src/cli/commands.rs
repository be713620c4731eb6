//! Command builders for the CLI.
//!
//! Each command is built using the shared arg builders from `args.rs`.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("grove")
        .about("Select, generate and compile tree-sitter grammar modules")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(verbose_arg())
        .subcommand(list_command())
        .subcommand(plan_command())
        .subcommand(build_command())
        .subcommand(header_command())
}

/// List registered modules.
pub fn list_command() -> Command {
    Command::new("list")
        .about("List registered grammar modules")
        .arg(json_arg())
}

/// Resolve the selection without building anything.
pub fn plan_command() -> Command {
    Command::new("plan")
        .about("Print the resolved module selection as JSON")
        .override_usage("  grove plan [-D NAME=BOOL]... [--options FILE] -- [FLAGS]...")
        .after_help(
            r#"EXAMPLES:
  grove plan -- --language zig json       # two modules
  grove plan -- --all-languages           # everything
  grove plan -D zig=false -- --all-languages
  GROVE_LANG_SWIFT=1 grove plan           # from the environment"#,
        )
        .arg(define_arg())
        .arg(options_file_arg())
        .arg(user_flags_arg())
}

/// Run the whole pipeline.
pub fn build_command() -> Command {
    Command::new("build")
        .about("Fetch, generate and compile the selected modules")
        .override_usage(
            "\
  grove build -o <DIR> --grammars-dir <DIR> [OPTIONS] -- [FLAGS]...
  grove build -o <DIR> --manifest-path <FILE> [OPTIONS] -- [FLAGS]...",
        )
        .after_help(
            r#"EXAMPLES:
  grove build -o out --grammars-dir vendor -- --language zig json
  grove build -o out --manifest-path grammars/Cargo.toml -- --all-languages
  grove build -o out --grammars-dir vendor -D swift=false -- --all-languages"#,
        )
        .arg(out_dir_arg())
        .arg(grammars_dir_arg())
        .arg(manifest_path_arg())
        .arg(lock_arg())
        .arg(target_arg())
        .arg(opt_level_arg())
        .arg(jobs_arg())
        .arg(tree_sitter_arg())
        .arg(core_lib_dir_arg())
        .arg(emit_cargo_arg())
        .arg(define_arg())
        .arg(options_file_arg())
        .arg(user_flags_arg())
}

/// Print a module's synthesized header.
pub fn header_command() -> Command {
    Command::new("header")
        .about("Print the public header synthesized for a module")
        .arg(module_arg())
}

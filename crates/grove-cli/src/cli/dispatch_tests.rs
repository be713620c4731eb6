//! Tests for CLI dispatch logic.
//!
//! These tests verify:
//! 1. Selection flags after `--` reach the intent reader untouched
//! 2. Declarative options accumulate in order
//! 3. Build params: required args, defaults and conflicts

use std::path::PathBuf;

use super::*;
use crate::cli::commands::{build_command, header_command, list_command, plan_command};

#[test]
fn plan_collects_flags_after_separator() {
    let m = plan_command()
        .try_get_matches_from(["plan", "--", "--language", "zig", "json", "--all-languages"])
        .unwrap();
    let params = PlanParams::from_matches(&m);
    assert_eq!(
        params.intent_args,
        ["--", "--language", "zig", "json", "--all-languages"]
    );
    assert!(params.defines.is_empty());
    assert_eq!(params.options_file, None);
}

#[test]
fn plan_without_flags_still_has_separator() {
    let m = plan_command().try_get_matches_from(["plan"]).unwrap();
    let params = PlanParams::from_matches(&m);
    assert_eq!(params.intent_args, ["--"]);
}

#[test]
fn defines_accumulate_in_order() {
    let m = plan_command()
        .try_get_matches_from([
            "plan",
            "-D",
            "all=true",
            "-Dzig=false",
            "--options",
            "opts.json",
            "--",
            "--all-languages",
        ])
        .unwrap();
    let params = PlanParams::from_matches(&m);
    assert_eq!(params.defines, ["all=true", "zig=false"]);
    assert_eq!(params.options_file, Some(PathBuf::from("opts.json")));
    assert_eq!(params.intent_args, ["--", "--all-languages"]);
}

#[test]
fn flags_before_separator_are_rejected() {
    let result = plan_command().try_get_matches_from(["plan", "--language", "zig"]);
    assert!(result.is_err());
}

#[test]
fn build_requires_out_dir() {
    let result = build_command().try_get_matches_from(["build", "--grammars-dir", "vendor"]);
    assert!(result.is_err());
}

#[test]
fn build_defaults() {
    let m = build_command()
        .try_get_matches_from(["build", "-o", "out", "--grammars-dir", "vendor"])
        .unwrap();
    let params = BuildParams::from_matches(&m);
    assert_eq!(params.out_dir, PathBuf::from("out"));
    assert_eq!(params.grammars_dir, Some(PathBuf::from("vendor")));
    assert_eq!(params.manifest_path, None);
    assert_eq!(params.opt_level, "3");
    assert_eq!(params.target, env!("GROVE_HOST_TRIPLE"));
    assert_eq!(params.jobs, None);
    assert!(!params.emit_cargo);
    assert_eq!(params.intent_args, ["--"]);
}

#[test]
fn build_all_options() {
    let m = build_command()
        .try_get_matches_from([
            "build",
            "--out-dir",
            "out",
            "--manifest-path",
            "grammars/Cargo.toml",
            "--lock",
            "grove.lock",
            "--target",
            "aarch64-apple-darwin",
            "--opt-level",
            "s",
            "-j",
            "4",
            "--tree-sitter",
            "/opt/bin/tree-sitter",
            "--core-lib-dir",
            "/opt/lib",
            "--emit-cargo",
            "-D",
            "swift=false",
            "--",
            "--all-languages",
        ])
        .unwrap();
    let params = BuildParams::from_matches(&m);
    assert_eq!(params.manifest_path, Some(PathBuf::from("grammars/Cargo.toml")));
    assert_eq!(params.lock, Some(PathBuf::from("grove.lock")));
    assert_eq!(params.target, "aarch64-apple-darwin");
    assert_eq!(params.opt_level, "s");
    assert_eq!(params.jobs, Some(4));
    assert_eq!(params.tree_sitter, Some(PathBuf::from("/opt/bin/tree-sitter")));
    assert_eq!(params.core_lib_dir, Some(PathBuf::from("/opt/lib")));
    assert!(params.emit_cargo);
    assert_eq!(params.defines, ["swift=false"]);
    assert_eq!(params.intent_args, ["--", "--all-languages"]);
}

#[test]
fn grammars_dir_conflicts_with_manifest() {
    let result = build_command().try_get_matches_from([
        "build",
        "-o",
        "out",
        "--grammars-dir",
        "vendor",
        "--manifest-path",
        "Cargo.toml",
    ]);
    assert!(result.is_err());
}

#[test]
fn jobs_must_be_positive() {
    let err = build_command()
        .try_get_matches_from(["build", "-o", "out", "-j", "0"])
        .unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);

    let m = build_command()
        .try_get_matches_from(["build", "-o", "out", "-j", "1"])
        .unwrap();
    assert_eq!(BuildParams::from_matches(&m).jobs, Some(1));
}

#[test]
fn header_takes_module_name() {
    let m = header_command().try_get_matches_from(["header", "zig"]).unwrap();
    assert_eq!(HeaderParams::from_matches(&m).module, "zig");
    assert!(header_command().try_get_matches_from(["header"]).is_err());
}

#[test]
fn list_json_flag() {
    let m = list_command().try_get_matches_from(["list", "--json"]).unwrap();
    assert!(ListParams::from_matches(&m).json);
}

#[test]
fn verbose_is_global() {
    let m = build_cli()
        .try_get_matches_from(["grove", "plan", "-vv", "--", "--all-languages"])
        .unwrap();
    assert_eq!(verbosity(&m), 2);
}

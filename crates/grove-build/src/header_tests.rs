use std::fs;

use crate::header::{stage_and_install, synthesize_header, write_header};
use crate::test_utils::Fixture;
use crate::Error;

#[test]
fn zig_header() {
    insta::assert_snapshot!(synthesize_header("zig"), @r#"
    #ifndef TREE_SITTER_ZIG_H_
    #define TREE_SITTER_ZIG_H_

    typedef struct TSLanguage TSLanguage;

    #ifdef __cplusplus
    extern "C" {
    #endif

    const TSLanguage *tree_sitter_zig(void);

    #ifdef __cplusplus
    }
    #endif

    #endif // TREE_SITTER_ZIG_H_
    "#);
}

#[test]
fn header_is_deterministic() {
    assert_eq!(synthesize_header("zig"), synthesize_header("zig"));
    assert_ne!(synthesize_header("zig"), synthesize_header("c_sharp"));
}

#[test]
fn c_sharp_keeps_underscore_in_accessor() {
    let header = synthesize_header("c_sharp");
    assert!(header.starts_with("#ifndef TREE_SITTER_C_SHARP_H_\n"));
    assert!(header.contains("const TSLanguage *tree_sitter_c_sharp(void);"));
    assert_eq!(header.matches("tree_sitter_").count(), 1);
}

#[test]
fn stage_and_install_writes_both_copies() {
    let fixture = Fixture::new();
    let ctx = fixture.ctx();
    let spec = fixture.spec("zig");

    let installed = stage_and_install(&ctx, &spec).unwrap();
    assert_eq!(fixture.rel(&installed), "out/include/tree_sitter/tree-sitter-zig.h");

    let staged = fixture.out_dir().join("modules/zig/include/tree-sitter-zig.h");
    let first = fs::read(&installed).unwrap();
    assert_eq!(first, fs::read(&staged).unwrap());
    assert_eq!(first, synthesize_header("zig").into_bytes());

    stage_and_install(&ctx, &spec).unwrap();
    assert_eq!(fs::read(&installed).unwrap(), first);
}

#[test]
fn header_never_touches_fetched_package() {
    let fixture = Fixture::new();
    let spec = fixture.spec("zig");
    stage_and_install(&fixture.ctx(), &spec).unwrap();

    let package = fixture.packages().join("tree-sitter-zig");
    let entries: Vec<_> = walkdir::WalkDir::new(&package)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, ["parser.c"]);
}

#[test]
fn write_failure_names_module_and_path() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let path = blocker.join("tree-sitter-zig.h");
    let err = write_header("zig", &path, "x").unwrap_err();
    assert!(matches!(err, Error::Header { ref module, path: ref p, .. } if module == "zig" && *p == path));
    assert_eq!(err.module(), Some("zig"));
}

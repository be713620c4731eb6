use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use grove_core::Registry;

use super::build::{BuildArgs, build};
use super::options_loader::OptionSources;

fn args(out_dir: PathBuf, grammars_dir: PathBuf, flags: &[&str]) -> BuildArgs {
    BuildArgs {
        out_dir,
        grammars_dir: Some(grammars_dir),
        manifest_path: None,
        lock: None,
        target: env!("GROVE_HOST_TRIPLE").to_owned(),
        opt_level: "0".to_owned(),
        jobs: Some(1),
        tree_sitter: None,
        core_lib_dir: None,
        emit_cargo: false,
        options: OptionSources::default(),
        intent_args: std::iter::once("--")
            .chain(flags.iter().copied())
            .map(str::to_owned)
            .collect(),
    }
}

#[test]
fn empty_selection_writes_outputs_only() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let args = args(out.clone(), dir.path().into(), &[]);
    let composed = build(&Registry::builtin(), &args).unwrap();

    assert!(composed.units.is_empty());
    assert!(out.join("build_options.rs").is_file());
    let resolved = fs::read_to_string(out.join("resolved.json")).unwrap();
    assert!(resolved.contains("\"all\": false"));
}

#[test]
fn missing_package_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = build(
        &Registry::builtin(),
        &args(dir.path().join("out"), dir.path().join("vendor"), &["--language", "zig"]),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "package 'tree-sitter-zig' for module 'zig' is not declared"
    );
    assert!(!dir.path().join("out/build_options.rs").exists());
}

#[test]
fn missing_lock_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = args(dir.path().join("out"), dir.path().into(), &[]);
    args.lock = Some(dir.path().join("grove.lock"));
    let err = build(&Registry::builtin(), &args).unwrap_err();
    assert_eq!(err.kind(), grove_core::ErrorKind::Io);
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn resolved_selection_is_logged_at_debug() {
    let dir = tempfile::tempdir().unwrap();
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let args = args(dir.path().join("out"), dir.path().into(), &[]);
    tracing::subscriber::with_default(subscriber, || build(&Registry::builtin(), &args)).unwrap();

    let logs = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(logs.contains("resolved selection"), "{logs}");
    assert!(logs.contains("all=false"), "{logs}");
}

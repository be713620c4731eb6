use std::collections::HashMap;
use std::io::Write;

use indoc::indoc;

use crate::options::{DeclarativeOptions, parse_bool};
use crate::registry::Registry;
use crate::Error;

#[test]
fn parse_bool_values() {
    assert_eq!(parse_bool("zig", "true"), Ok(true));
    assert_eq!(parse_bool("zig", "FALSE"), Ok(false));
    assert_eq!(parse_bool("zig", "1"), Ok(true));
    assert_eq!(parse_bool("zig", "0"), Ok(false));
    assert_eq!(
        parse_bool("zig", "maybe"),
        Err(Error::InvalidOptionValue {
            name: "zig".to_owned(),
            value: "maybe".to_owned()
        })
    );
}

#[test]
fn pairs_set_modules_and_aggregate() {
    let registry = Registry::builtin();
    let options = DeclarativeOptions::from_pairs(&registry, ["zig=false", "all=true"]).unwrap();
    assert_eq!(options.get("zig"), Some(false));
    assert_eq!(options.get("rust"), None);
    assert_eq!(options.all(), Some(true));
}

#[test]
fn pair_without_equals_is_malformed() {
    let registry = Registry::builtin();
    let err = DeclarativeOptions::from_pairs(&registry, ["zig"]).unwrap_err();
    assert!(matches!(err, Error::MalformedOption { ref token } if token == "zig"));
}

#[test]
fn unknown_option_is_fatal() {
    let registry = Registry::builtin();
    let err = DeclarativeOptions::from_pairs(&registry, ["cobol=true"]).unwrap_err();
    assert_eq!(err.to_string(), "unknown build option 'cobol'");
}

#[test]
fn env_lookup() {
    let registry = Registry::builtin();
    let env: HashMap<&str, &str> = [
        ("GROVE_LANG_C_SHARP", "1"),
        ("GROVE_LANG_ZIG", "false"),
        ("GROVE_ALL_LANGUAGES", "true"),
        ("GROVE_LANG_COBOL", "true"),
    ]
    .into_iter()
    .collect();

    let options =
        DeclarativeOptions::from_env_with(&registry, |key| env.get(key).map(|v| v.to_string()))
            .unwrap();

    assert_eq!(options.get("c_sharp"), Some(true));
    assert_eq!(options.get("zig"), Some(false));
    assert_eq!(options.all(), Some(true));
    assert_eq!(options.get("rust"), None);
}

#[test]
fn env_invalid_value_names_variable() {
    let registry = Registry::builtin();
    let err = DeclarativeOptions::from_env_with(&registry, |key| {
        (key == "GROVE_LANG_RUST").then(|| "yes please".to_owned())
    })
    .unwrap_err();
    assert_eq!(err.offending_token(), "GROVE_LANG_RUST");
}

#[test]
fn json_object() {
    let registry = Registry::builtin();
    let json = indoc! {r#"
        {
          "all": true,
          "swift": false,
          "zig": false
        }
    "#};
    let options = DeclarativeOptions::from_json(&registry, "inline", json).unwrap();
    assert_eq!(options.all(), Some(true));
    assert_eq!(options.get("swift"), Some(false));
    assert_eq!(options.get("zig"), Some(false));
}

#[test]
fn json_non_bool_value() {
    let registry = Registry::builtin();
    let err = DeclarativeOptions::from_json(&registry, "inline", r#"{"zig": "yes"}"#).unwrap_err();
    assert_eq!(
        err,
        Error::InvalidOptionValue {
            name: "zig".to_owned(),
            value: "\"yes\"".to_owned()
        }
    );
}

#[test]
fn json_syntax_error_names_origin() {
    let registry = Registry::builtin();
    let err = DeclarativeOptions::from_json(&registry, "opts.json", "{").unwrap_err();
    assert!(matches!(err, Error::OptionsFile { ref path, .. } if path == "opts.json"));
}

#[test]
fn json_file() {
    let registry = Registry::builtin();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"rust": true}}"#).unwrap();

    let options = DeclarativeOptions::load_json_file(&registry, file.path()).unwrap();
    assert_eq!(options.get("rust"), Some(true));
}

#[test]
fn missing_json_file() {
    let registry = Registry::builtin();
    let dir = tempfile::tempdir().unwrap();
    let err = DeclarativeOptions::load_json_file(&registry, &dir.path().join("nope.json"))
        .unwrap_err();
    assert!(matches!(err, Error::OptionsFile { .. }));
}

#[test]
fn layering_prefers_higher_source() {
    let registry = Registry::builtin();
    let env = DeclarativeOptions::from_pairs(&registry, ["zig=true", "rust=true", "all=false"])
        .unwrap();
    let cli = DeclarativeOptions::from_pairs(&registry, ["zig=false"]).unwrap();

    let merged = env.overridden_by(cli);
    assert_eq!(merged.get("zig"), Some(false));
    assert_eq!(merged.get("rust"), Some(true));
    assert_eq!(merged.all(), Some(false));
}

#[test]
fn empty_options() {
    assert!(DeclarativeOptions::new().is_empty());
    let registry = Registry::builtin();
    assert!(!DeclarativeOptions::from_pairs(&registry, ["all=0"]).unwrap().is_empty());
}

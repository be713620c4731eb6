//! Naming conventions shared by every stage of the build.
//!
//! A module name is the single source for its package name, archive name,
//! exported symbol, header guard, Cargo feature and environment variable.

/// Prefix of every exported accessor symbol.
pub const ACCESSOR_PREFIX: &str = "tree_sitter";

/// Prefix of every Cargo feature that selects a module.
pub const FEATURE_PREFIX: &str = "lang-";

/// Prefix of the per-module environment option.
pub const ENV_OPTION_PREFIX: &str = "GROVE_LANG_";

/// `[a-z_][a-z0-9_]*`
pub fn is_valid_module_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_lowercase() || first == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Upper-cased form used in C macros and Rust constants.
///
/// # Examples
/// ```
/// use grove_core::utils::to_macro_case;
/// assert_eq!(to_macro_case("c_sharp"), "C_SHARP");
/// ```
pub fn to_macro_case(name: &str) -> String {
    name.to_ascii_uppercase()
}

/// `tree_sitter_<name>`
pub fn accessor_name(name: &str) -> String {
    format!("{ACCESSOR_PREFIX}_{name}")
}

/// `TREE_SITTER_<NAME>_H_`
pub fn header_guard(name: &str) -> String {
    format!("{}_{}_H_", to_macro_case(ACCESSOR_PREFIX), to_macro_case(name))
}

/// Upstream package name: `c_sharp` → `tree-sitter-c-sharp`.
pub fn package_name(name: &str) -> String {
    format!("tree-sitter-{}", name.replace('_', "-"))
}

/// Static archive name: `zig` → `tree-sitter-zig` (`libtree-sitter-zig.a`).
pub fn library_name(name: &str) -> String {
    format!("tree-sitter-{name}")
}

/// Installed header file name.
pub fn header_file_name(name: &str) -> String {
    format!("{}.h", library_name(name))
}

/// Cargo feature selecting the module: `c_sharp` → `lang-c-sharp`.
pub fn feature_name(name: &str) -> String {
    format!("{FEATURE_PREFIX}{}", name.replace('_', "-"))
}

/// Module name behind a `CARGO_FEATURE_LANG_*` suffix: `C_SHARP` → `c_sharp`.
pub fn module_from_feature_env(suffix: &str) -> String {
    suffix.to_ascii_lowercase()
}

/// `GROVE_LANG_<NAME>`
pub fn env_option_key(name: &str) -> String {
    format!("{ENV_OPTION_PREFIX}{}", to_macro_case(name))
}

/// Largest edit distance still worth a "did you mean" hint.
const MAX_SUGGESTION_DISTANCE: usize = 2;

/// Closest candidate within [`MAX_SUGGESTION_DISTANCE`]; ties go to the earlier candidate.
pub fn suggest<'a>(input: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let input: Vec<char> = input.to_lowercase().chars().collect();
    let mut best: Option<(usize, &'a str)> = None;
    for candidate in candidates {
        let distance = edit_distance(&input, candidate);
        if distance > MAX_SUGGESTION_DISTANCE {
            continue;
        }
        if best.is_none_or(|(closest, _)| distance < closest) {
            best = Some((distance, candidate));
        }
    }
    best.map(|(_, candidate)| candidate)
}

/// Levenshtein distance over chars, keeping a single row.
fn edit_distance(input: &[char], candidate: &str) -> usize {
    let mut row: Vec<usize> = (0..=input.len()).collect();
    for (i, c) in candidate.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &ic) in input.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if c == ic {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }
    row[input.len()]
}

//! Tree-sitter grammars compiled by grove and selected with Cargo features.
//!
//! Enable `lang-<name>` features (or `all-languages`) to compile grammar
//! modules into this crate. The build script resolves the selection once;
//! the result is visible both as `cfg(grove_lang = "<name>")` switches and
//! as the constants in [`build_options`].

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub use tree_sitter::{Language, LanguageFn};

/// Inclusion decision for every registered module, as resolved at build time.
pub mod build_options {
    include!(concat!(env!("OUT_DIR"), "/build_options.rs"));
}

/// Directory holding the installed `tree_sitter/tree-sitter-<name>.h` headers.
pub const INCLUDE_DIR: &str = env!("GROVE_INCLUDE_DIR");

/// A grammar module compiled into this crate.
#[derive(Clone, Copy)]
pub struct Grammar {
    name: &'static str,
    language: LanguageFn,
}

impl Grammar {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn language_fn(&self) -> LanguageFn {
        self.language
    }

    pub fn language(&self) -> Language {
        self.language.into()
    }
}

impl std::fmt::Debug for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grammar").field("name", &self.name).finish()
    }
}

macro_rules! define_langs {
    ($($name:ident => $cfg:literal),* $(,)?) => {
        paste::paste! {
            $(
                #[cfg(grove_lang = $cfg)]
                unsafe extern "C" {
                    fn [<tree_sitter_ $name>]() -> *const ();
                }

                #[cfg(grove_lang = $cfg)]
                pub const [<$name:upper _LANGUAGE>]: LanguageFn =
                    unsafe { LanguageFn::from_raw([<tree_sitter_ $name>]) };

                #[cfg(grove_lang = $cfg)]
                pub fn $name() -> Grammar {
                    Grammar {
                        name: $cfg,
                        language: [<$name:upper _LANGUAGE>],
                    }
                }
            )*
        }

        /// Look up a compiled-in grammar by module name.
        pub fn from_name(s: &str) -> Option<Grammar> {
            match s.to_ascii_lowercase().as_str() {
                $(
                    #[cfg(grove_lang = $cfg)]
                    $cfg => Some($name()),
                )*
                _ => None,
            }
        }

        /// Every compiled-in grammar, in registry order.
        pub fn all() -> Vec<Grammar> {
            vec![
                $(
                    #[cfg(grove_lang = $cfg)]
                    $name(),
                )*
            ]
        }
    };
}

define_langs! {
    bash => "bash",
    c => "c",
    cpp => "cpp",
    css => "css",
    c_sharp => "c_sharp",
    dart => "dart",
    dockerfile => "dockerfile",
    elixir => "elixir",
    elm => "elm",
    erlang => "erlang",
    fsharp => "fsharp",
    go => "go",
    haskell => "haskell",
    html => "html",
    java => "java",
    javascript => "javascript",
    json => "json",
    julia => "julia",
    kotlin => "kotlin",
    lua => "lua",
    make => "make",
    markdown => "markdown",
    nim => "nim",
    ocaml => "ocaml",
    perl => "perl",
    php => "php",
    python => "python",
    r => "r",
    ruby => "ruby",
    rust => "rust",
    scala => "scala",
    sql => "sql",
    swift => "swift",
    toml => "toml",
    typescript => "typescript",
    yaml => "yaml",
    zig => "zig",
}

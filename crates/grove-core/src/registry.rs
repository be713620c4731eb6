//! Static catalog of grammar modules.
//!
//! The registry is pure data: it never changes after construction and is
//! passed explicitly to every component that needs to validate module names.

use std::collections::HashMap;

use serde::Serialize;

use crate::utils;
use crate::{Error, Result};

/// Default location of the C sources inside a fetched grammar package.
pub const DEFAULT_SOURCE_ROOT: &str = "src";

/// One registered grammar module and its build quirks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModuleSpec {
    pub name: &'static str,
    pub source_root: &'static str,
    pub has_scanner: bool,
    pub needs_generation: bool,
}

impl ModuleSpec {
    /// A module with the conventional layout: `src/parser.c` plus `src/scanner.c`.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            source_root: DEFAULT_SOURCE_ROOT,
            has_scanner: true,
            needs_generation: false,
        }
    }

    pub const fn source_root(mut self, source_root: &'static str) -> Self {
        self.source_root = source_root;
        self
    }

    pub const fn scanner(mut self, has_scanner: bool) -> Self {
        self.has_scanner = has_scanner;
        self
    }

    pub const fn generate(mut self, needs_generation: bool) -> Self {
        self.needs_generation = needs_generation;
        self
    }

    /// Name of the upstream package, e.g. `tree-sitter-c-sharp`.
    pub fn package_name(&self) -> String {
        utils::package_name(self.name)
    }

    /// Name of the static archive produced for this module.
    pub fn library_name(&self) -> String {
        utils::library_name(self.name)
    }

    /// Exported accessor symbol, e.g. `tree_sitter_zig`.
    pub fn accessor(&self) -> String {
        utils::accessor_name(self.name)
    }
}

macro_rules! define_modules {
    (
        $(
            $name:ident => { $($key:ident: $value:expr),* $(,)? }
        ),* $(,)?
    ) => {
        /// Built-in catalog, in registry order.
        pub const BUILTIN_MODULES: &[ModuleSpec] = &[
            $(
                ModuleSpec::new(stringify!($name))$(.$key($value))*,
            )*
        ];
    };
}

define_modules! {
    bash => {},
    c => { scanner: false },
    cpp => {},
    css => {},
    c_sharp => {},
    dart => {},
    dockerfile => {},
    elixir => {},
    elm => {},
    erlang => { scanner: false },
    fsharp => { source_root: "fsharp/src" },
    go => { scanner: false },
    haskell => {},
    html => {},
    java => { scanner: false },
    javascript => {},
    json => { scanner: false },
    julia => {},
    kotlin => {},
    lua => {},
    make => { scanner: false },
    markdown => { source_root: "tree-sitter-markdown/src" },
    nim => {},
    ocaml => { source_root: "grammars/ocaml/src" },
    perl => {},
    php => { source_root: "php/src" },
    python => {},
    r => {},
    ruby => {},
    rust => {},
    scala => {},
    sql => {},
    swift => { generate: true },
    toml => {},
    typescript => { source_root: "typescript/src" },
    yaml => {},
    zig => { scanner: false },
}

/// Ordered, name-indexed collection of [`ModuleSpec`]s.
#[derive(Debug, Clone)]
pub struct Registry {
    modules: Vec<ModuleSpec>,
    index: HashMap<&'static str, usize>,
}

impl Registry {
    /// Build a registry, rejecting duplicate or syntactically invalid names.
    pub fn new(modules: impl IntoIterator<Item = ModuleSpec>) -> Result<Self> {
        let mut registry = Self {
            modules: Vec::new(),
            index: HashMap::new(),
        };
        for spec in modules {
            if !utils::is_valid_module_name(spec.name) {
                return Err(Error::InvalidModuleName {
                    name: spec.name.to_owned(),
                });
            }
            if registry.index.contains_key(spec.name) {
                return Err(Error::DuplicateRegistryEntry {
                    name: spec.name.to_owned(),
                });
            }
            registry.index.insert(spec.name, registry.modules.len());
            registry.modules.push(spec);
        }
        Ok(registry)
    }

    /// The built-in catalog.
    pub fn builtin() -> Self {
        let modules = BUILTIN_MODULES.to_vec();
        let index = modules
            .iter()
            .enumerate()
            .map(|(i, spec)| (spec.name, i))
            .collect();
        Self { modules, index }
    }

    pub fn lookup(&self, name: &str) -> Option<&ModuleSpec> {
        self.index.get(name).map(|&i| &self.modules[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All modules in registry order.
    pub fn all(&self) -> &[ModuleSpec] {
        &self.modules
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.modules.iter().map(|spec| spec.name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

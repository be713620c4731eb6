//! Declarative per-module build options.
//!
//! Each registered module, plus the aggregate `all`, may carry an explicit
//! boolean. An absent entry means "unspecified, defer to other sources".
//! Options come from `name=bool` pairs, JSON option files and `GROVE_*`
//! environment variables; [`DeclarativeOptions::overridden_by`] layers them.

use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;

use crate::registry::Registry;
use crate::utils;
use crate::{Error, Result};

/// Name of the aggregate option.
pub const ALL_OPTION: &str = "all";

/// Environment variable carrying the aggregate option.
pub const ALL_ENV_OPTION: &str = "GROVE_ALL_LANGUAGES";

/// Explicit booleans keyed by module name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeclarativeOptions {
    modules: IndexMap<&'static str, bool>,
    all: Option<bool>,
}

impl DeclarativeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit value for one module, if any.
    pub fn get(&self, name: &str) -> Option<bool> {
        self.modules.get(name).copied()
    }

    /// Explicit value for the aggregate option, if any.
    pub fn all(&self) -> Option<bool> {
        self.all
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.all.is_none()
    }

    /// Set an option by name; `all` addresses the aggregate.
    pub fn set(&mut self, registry: &Registry, name: &str, value: bool) -> Result<()> {
        if name == ALL_OPTION {
            self.all = Some(value);
            return Ok(());
        }
        let Some(spec) = registry.lookup(name) else {
            return Err(Error::UnknownOption {
                name: name.to_owned(),
            });
        };
        self.modules.insert(spec.name, value);
        Ok(())
    }

    /// Parse `name=bool` pairs, as given to `-D`.
    pub fn from_pairs<I, S>(registry: &Registry, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let Some((name, value)) = pair.split_once('=') else {
                return Err(Error::MalformedOption {
                    token: pair.to_owned(),
                });
            };
            let name = name.trim();
            options.set(registry, name, parse_bool(name, value.trim())?)?;
        }
        Ok(options)
    }

    /// Read `GROVE_LANG_<NAME>` for every module and `GROVE_ALL_LANGUAGES`
    /// through `lookup`.
    pub fn from_env_with<F>(registry: &Registry, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::new();
        if let Some(value) = lookup(ALL_ENV_OPTION) {
            options.all = Some(parse_bool(ALL_ENV_OPTION, &value)?);
        }
        for spec in registry.all() {
            let key = utils::env_option_key(spec.name);
            if let Some(value) = lookup(&key) {
                options.modules.insert(spec.name, parse_bool(&key, &value)?);
            }
        }
        Ok(options)
    }

    /// [`Self::from_env_with`] over the process environment.
    pub fn from_env(registry: &Registry) -> Result<Self> {
        Self::from_env_with(registry, |key| std::env::var(key).ok())
    }

    /// Parse a JSON object of `name: bool` entries.
    pub fn from_json(registry: &Registry, origin: &str, json: &str) -> Result<Self> {
        let raw: IndexMap<String, serde_json::Value> =
            serde_json::from_str(json).map_err(|e| Error::OptionsFile {
                path: origin.to_owned(),
                message: e.to_string(),
            })?;

        let mut options = Self::new();
        for (name, value) in raw {
            let serde_json::Value::Bool(value) = value else {
                return Err(Error::InvalidOptionValue {
                    name,
                    value: value.to_string(),
                });
            };
            options.set(registry, &name, value)?;
        }
        Ok(options)
    }

    pub fn load_json_file(registry: &Registry, path: &Path) -> Result<Self> {
        let origin = path.display().to_string();
        let json = std::fs::read_to_string(path).map_err(|e| Error::OptionsFile {
            path: origin.clone(),
            message: e.to_string(),
        })?;
        Self::from_json(registry, &origin, &json)
    }

    /// Layer `higher` on top of `self`: its explicit values win.
    pub fn overridden_by(mut self, higher: Self) -> Self {
        for (name, value) in higher.modules {
            self.modules.insert(name, value);
        }
        if higher.all.is_some() {
            self.all = higher.all;
        }
        self
    }
}

/// `true`/`false`/`1`/`0`, case-insensitive.
pub fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(Error::InvalidOptionValue {
            name: name.to_owned(),
            value: value.to_owned(),
        }),
    }
}

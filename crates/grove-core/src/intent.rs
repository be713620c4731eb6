//! Selection intent read from a process argument vector.
//!
//! Tokens before the first `--` belong to the build system and are skipped.
//! After it, `--all-languages` requests every module and `--language` opens a
//! list of module names that runs until the next token starting with `-`.

use serde::Serialize;

use crate::registry::Registry;
use crate::{Error, Result};

/// Separates build-system arguments from user flags.
pub const SEPARATOR: &str = "--";
pub const ALL_LANGUAGES_FLAG: &str = "--all-languages";
pub const LANGUAGE_FLAG: &str = "--language";

/// What the argument vector asked for, before option overrides are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionIntent {
    languages: Vec<&'static str>,
    all_languages: bool,
}

impl SelectionIntent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Modules named explicitly, in the order they were given.
    pub fn languages(&self) -> &[&'static str] {
        &self.languages
    }

    pub fn all_languages(&self) -> bool {
        self.all_languages
    }

    pub fn contains(&self, name: &str) -> bool {
        self.languages.iter().any(|&listed| listed == name)
    }

    pub fn set_all_languages(&mut self) {
        self.all_languages = true;
    }

    /// Append a module to the explicit list.
    ///
    /// Fails on names the registry does not know and on names already listed.
    pub fn push_language(&mut self, registry: &Registry, token: &str) -> Result<()> {
        let Some(spec) = registry.lookup(token) else {
            return Err(Error::UnknownModule {
                token: token.to_owned(),
            });
        };
        if self.contains(spec.name) {
            return Err(Error::DuplicateModule {
                token: token.to_owned(),
            });
        }
        self.languages.push(spec.name);
        Ok(())
    }

    /// Interpret one dash-prefixed user flag and return the state that follows it.
    fn scan_flag(&mut self, token: &str) -> ScanState {
        match token {
            ALL_LANGUAGES_FLAG => {
                self.set_all_languages();
                ScanState::AfterSeparator
            }
            LANGUAGE_FLAG => ScanState::InLanguageList,
            _ => {
                tracing::debug!(token, "ignoring unrecognized user flag");
                ScanState::AfterSeparator
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Build-system arguments; nothing is interpreted.
    BeforeSeparator,
    /// Looking for user flags.
    AfterSeparator,
    /// Consuming module names after `--language`.
    InLanguageList,
}

/// Read a [`SelectionIntent`] from a full argument vector.
///
/// The first configuration problem aborts the scan.
pub fn read_intent<S: AsRef<str>>(registry: &Registry, argv: &[S]) -> Result<SelectionIntent> {
    let mut intent = SelectionIntent::new();
    let mut state = ScanState::BeforeSeparator;

    for token in argv {
        let token: &str = token.as_ref();
        state = match state {
            ScanState::BeforeSeparator if token == SEPARATOR => ScanState::AfterSeparator,
            ScanState::BeforeSeparator => ScanState::BeforeSeparator,
            ScanState::AfterSeparator => {
                if token.starts_with('-') {
                    intent.scan_flag(token)
                } else {
                    tracing::debug!(token, "ignoring stray argument");
                    ScanState::AfterSeparator
                }
            }
            // A dash token ends the list and is interpreted as a flag in its own right.
            ScanState::InLanguageList if token.starts_with('-') => intent.scan_flag(token),
            ScanState::InLanguageList => {
                intent.push_language(registry, token)?;
                ScanState::InLanguageList
            }
        };
    }

    Ok(intent)
}

//! Dependency materialization: from a module name to a fetched source tree.
//!
//! Fetching itself is the package manager's job. A [`Materializer`] only maps
//! a module to the root of its already-fetched package, failing loudly when
//! the package was never declared.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use grove_core::ModuleSpec;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::compile::PARSER_SOURCE;
use crate::context::TargetParams;
use crate::{Error, Result};

pub trait Materializer: Send + Sync {
    /// Root directory of the package providing `spec`.
    fn materialize(&self, spec: &ModuleSpec, target: &TargetParams) -> Result<PathBuf>;
}

impl<M: Materializer + ?Sized> Materializer for Box<M> {
    fn materialize(&self, spec: &ModuleSpec, target: &TargetParams) -> Result<PathBuf> {
        (**self).materialize(spec, target)
    }
}

/// Packages fetched ahead of time into one directory.
///
/// A module is found at `<root>/tree-sitter-<kebab-name>/` or `<root>/<name>/`.
#[derive(Debug, Clone)]
pub struct DirectoryMaterializer {
    root: PathBuf,
}

impl DirectoryMaterializer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Materializer for DirectoryMaterializer {
    fn materialize(&self, spec: &ModuleSpec, _target: &TargetParams) -> Result<PathBuf> {
        let package = spec.package_name();
        [self.root.join(&package), self.root.join(spec.name)]
            .into_iter()
            .find(|candidate| candidate.is_dir())
            .ok_or_else(|| Error::PackageNotDeclared {
                module: spec.name.to_owned(),
                package,
            })
    }
}

/// Packages declared in a Cargo manifest, fetched and checksummed by Cargo.
#[derive(Debug, Clone)]
pub struct CargoMaterializer {
    packages: HashMap<String, PathBuf>,
}

impl CargoMaterializer {
    /// Run `cargo metadata` on `manifest_path`, restricted to `target`.
    pub fn load(manifest_path: &Path, target: &TargetParams) -> Result<Self> {
        let metadata = cargo_metadata::MetadataCommand::new()
            .manifest_path(manifest_path)
            .other_options(vec!["--filter-platform".to_owned(), target.target.clone()])
            .exec()
            .map_err(|e| Error::Metadata {
                manifest: manifest_path.to_path_buf(),
                message: e.to_string(),
            })?;

        let packages = metadata
            .packages
            .iter()
            .filter_map(|package| {
                let name: &str = &package.name;
                if !name.starts_with("tree-sitter-") {
                    return None;
                }
                let root = package.manifest_path.parent()?.as_std_path().to_path_buf();
                Some((name.to_owned(), root))
            })
            .collect();

        Ok(Self { packages })
    }

    pub fn from_packages(packages: impl IntoIterator<Item = (String, PathBuf)>) -> Self {
        Self {
            packages: packages.into_iter().collect(),
        }
    }
}

impl Materializer for CargoMaterializer {
    fn materialize(&self, spec: &ModuleSpec, _target: &TargetParams) -> Result<PathBuf> {
        let package = spec.package_name();
        let Some(root) = self.packages.get(&package) else {
            return Err(Error::PackageNotDeclared {
                module: spec.name.to_owned(),
                package,
            });
        };
        if !root.is_dir() {
            return Err(Error::Fetch {
                module: spec.name.to_owned(),
                message: format!("package directory {} does not exist", root.display()),
            });
        }
        Ok(root.clone())
    }
}

/// Pinned SHA-256 digests of module sources, keyed by module name.
///
/// The pinned file is `<source_root>/parser.c`, or `grammar.js` for modules
/// whose parser is generated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarLock {
    #[serde(flatten)]
    entries: BTreeMap<String, LockEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockEntry {
    pub sha256: String,
}

impl GrammarLock {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&json).map_err(|e| Error::Metadata {
            manifest: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn pin(&mut self, module: &str, sha256: impl Into<String>) {
        self.entries.insert(
            module.to_owned(),
            LockEntry {
                sha256: sha256.into(),
            },
        );
    }

    pub fn get(&self, module: &str) -> Option<&LockEntry> {
        self.entries.get(module)
    }

    /// Check the pinned digest of `spec`, if any, against `package_root`.
    pub fn verify(&self, spec: &ModuleSpec, package_root: &Path) -> Result<()> {
        let Some(entry) = self.get(spec.name) else {
            return Ok(());
        };

        let pinned = pinned_file(spec, package_root);
        let bytes = fs::read(&pinned).map_err(|e| Error::Fetch {
            module: spec.name.to_owned(),
            message: format!("cannot read {}: {e}", pinned.display()),
        })?;
        let actual = sha256_hex(&bytes);

        if !actual.eq_ignore_ascii_case(&entry.sha256) {
            return Err(Error::IntegrityMismatch {
                module: spec.name.to_owned(),
                expected: entry.sha256.clone(),
                actual,
            });
        }
        Ok(())
    }
}

/// File whose digest identifies a module's sources.
pub fn pinned_file(spec: &ModuleSpec, package_root: &Path) -> PathBuf {
    if spec.needs_generation {
        package_root.join("grammar.js")
    } else {
        package_root.join(spec.source_root).join(PARSER_SOURCE)
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Any materializer, followed by a [`GrammarLock`] check.
#[derive(Debug, Clone)]
pub struct VerifiedMaterializer<M> {
    inner: M,
    lock: GrammarLock,
}

impl<M: Materializer> VerifiedMaterializer<M> {
    pub fn new(inner: M, lock: GrammarLock) -> Self {
        Self { inner, lock }
    }
}

impl<M: Materializer> Materializer for VerifiedMaterializer<M> {
    fn materialize(&self, spec: &ModuleSpec, target: &TargetParams) -> Result<PathBuf> {
        let root = self.inner.materialize(spec, target)?;
        self.lock.verify(spec, &root)?;
        Ok(root)
    }
}

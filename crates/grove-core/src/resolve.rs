//! Merging of all selection sources into one authoritative decision.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::intent::SelectionIntent;
use crate::options::DeclarativeOptions;
use crate::registry::{ModuleSpec, Registry};

/// Frozen inclusion decision for every registered module plus the aggregate.
///
/// Computed once per build invocation. The same value drives compilation and
/// is exported to downstream consumers as compile-time switches, so both
/// sides agree on which modules exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    all: bool,
    modules: IndexMap<String, bool>,
}

impl ResolvedConfig {
    pub fn all(&self) -> bool {
        self.all
    }

    /// Unknown names are reported as not included.
    pub fn is_included(&self, name: &str) -> bool {
        self.modules.get(name).copied().unwrap_or(false)
    }

    /// Every registered module and its decision, in registry order.
    pub fn modules(&self) -> impl Iterator<Item = (&str, bool)> {
        self.modules.iter().map(|(name, &included)| (name.as_str(), included))
    }

    /// Names of included modules, in registry order.
    pub fn included(&self) -> impl Iterator<Item = &str> {
        self.modules()
            .filter_map(|(name, included)| included.then_some(name))
    }

    pub fn included_count(&self) -> usize {
        self.included().count()
    }

    /// Registry entries of included modules, in registry order.
    pub fn included_specs<'r>(&self, registry: &'r Registry) -> Vec<&'r ModuleSpec> {
        registry
            .all()
            .iter()
            .filter(|spec| self.is_included(spec.name))
            .collect()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Resolve the inclusion of every registered module.
///
/// `included(m) = option(m) ?? (all OR cli_list ∋ m)`, where the aggregate is
/// itself `option(all) ?? --all-languages`.
pub fn resolve(
    registry: &Registry,
    intent: &SelectionIntent,
    options: &DeclarativeOptions,
) -> ResolvedConfig {
    let all = options.all().unwrap_or(intent.all_languages());

    let modules = registry
        .all()
        .iter()
        .map(|spec| {
            let included = options
                .get(spec.name)
                .unwrap_or_else(|| all || intent.contains(spec.name));
            (spec.name.to_owned(), included)
        })
        .collect();

    let config = ResolvedConfig { all, modules };
    tracing::debug!(
        all = config.all,
        included = config.included_count(),
        "resolved module selection"
    );
    config
}

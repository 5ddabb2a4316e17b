//! Computed per-kind multipliers.
//!
//! Factor tables only cover discrete options. Inputs such as a physical
//! length need a formula, so a kind may register a rule whose result is
//! multiplied in after the table-driven factors. Rules are shared closures
//! looked up by kind, so an embedding application can register rules that
//! carry their own data; the registry is built once and handed to the range
//! engine.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use lumen_model::{Interval, NodeConfig};

use crate::entry::CatalogEntry;

/// `(config, catalog entry, kind) -> extra multiplier`.
///
/// Returning `None` means the rule does not apply. Results that are not
/// well-formed intervals are discarded by the engine.
pub type RuleFn = Arc<dyn Fn(&NodeConfig, &CatalogEntry, &str) -> Option<Interval> + Send + Sync>;

pub const LIGHT_PIPE_KIND: &str = "LightPipe";

/// Coefficient table read by [`light_pipe_absorption`].
pub const ABSORPTION_PER_MM: &str = "absorptionPerMm";

#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: BTreeMap<String, RuleFn>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in rules.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(LIGHT_PIPE_KIND, light_pipe_absorption);
        registry
    }

    /// Register `rule` for `kind`, returning the rule it replaced.
    pub fn register<F>(&mut self, kind: impl Into<String>, rule: F) -> Option<RuleFn>
    where
        F: Fn(&NodeConfig, &CatalogEntry, &str) -> Option<Interval> + Send + Sync + 'static,
    {
        self.rules.insert(kind.into(), Arc::new(rule))
    }

    pub fn remove(&mut self, kind: &str) -> Option<RuleFn> {
        self.rules.remove(kind)
    }

    pub fn rule_for(&self, kind: &str) -> Option<&RuleFn> {
        self.rules.get(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("kinds", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Bulk absorption along a light pipe: `exp(-alpha * length)`.
///
/// `alpha` comes from the entry's `absorptionPerMm` coefficient for the
/// selected material. Without a material, a coefficient or a positive length
/// the rule does not apply.
pub fn light_pipe_absorption(
    config: &NodeConfig,
    entry: &CatalogEntry,
    _kind: &str,
) -> Option<Interval> {
    let length = config.get("lengthMm")?.as_number();
    if length <= 0.0 {
        return None;
    }
    let material = config.get("material")?.option_key()?;
    let alpha = entry.coefficient(ABSORPTION_PER_MM, &material)?;
    if !alpha.is_finite() || alpha < 0.0 {
        return None;
    }
    Some(Interval::scalar((-alpha * length).exp()))
}

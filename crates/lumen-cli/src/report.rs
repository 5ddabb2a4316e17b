//! Printable views over a project and the catalog.

use lumen_catalog::{Catalog, ModifierInput, RuleRegistry};
use lumen_engine::{RangeEngine, SystemSummary, TargetStatus};
use lumen_store::ProjectState;

/// System summary plus the project's lumen target.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport {
    pub summary: SystemSummary,
    pub target_lumens: f64,
    pub active_function: String,
}

impl SummaryReport {
    pub fn from_state(state: &ProjectState, catalog: &Catalog, rules: &RuleRegistry) -> Self {
        let engine = RangeEngine::new(catalog, rules);
        Self {
            summary: engine.system_summary(state.nodes(), state.chains()),
            target_lumens: state.ui().target_lumens,
            active_function: state.ui().active_function.clone(),
        }
    }

    pub fn with_target(mut self, target_lumens: f64) -> Self {
        self.target_lumens = target_lumens;
        self
    }

    /// Total lumen range against the target; `None` when no target is set.
    pub fn status(&self) -> Option<TargetStatus> {
        (self.target_lumens > 0.0)
            .then(|| TargetStatus::classify(self.summary.total_lumens, self.target_lumens))
    }
}

/// One modifier of one catalog kind, flattened for a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    pub kind: String,
    pub label: String,
    pub modifier: String,
    pub input: &'static str,
    pub options: String,
}

pub fn catalog_rows(catalog: &Catalog) -> Vec<CatalogRow> {
    let mut rows = Vec::new();
    for (kind, entry) in catalog.kinds() {
        let label = catalog.label(kind).to_string();
        if entry.modifiers.is_empty() {
            rows.push(CatalogRow {
                kind: kind.to_string(),
                label,
                modifier: String::new(),
                input: "",
                options: String::new(),
            });
            continue;
        }
        for modifier in &entry.modifiers {
            let (input, options) = match &modifier.input {
                ModifierInput::Select { options } => ("select", options.join(", ")),
                ModifierInput::Number { min, max, step } => ("number", number_bounds(*min, *max, *step)),
            };
            rows.push(CatalogRow {
                kind: kind.to_string(),
                label: label.clone(),
                modifier: modifier.display_label().to_string(),
                input,
                options,
            });
        }
    }
    rows
}

fn number_bounds(min: Option<f64>, max: Option<f64>, step: Option<f64>) -> String {
    let mut parts = Vec::new();
    if let Some(min) = min {
        parts.push(format!("min {min}"));
    }
    if let Some(max) = max {
        parts.push(format!("max {max}"));
    }
    if let Some(step) = step {
        parts.push(format!("step {step}"));
    }
    parts.join(", ")
}

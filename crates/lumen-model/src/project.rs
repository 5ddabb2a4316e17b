//! The project document: everything the editor persists and restores.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chain::Chain;
use crate::error::Result;
use crate::ids::NodeId;
use crate::lenient;
use crate::node::Node;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub ids: Vec<NodeId>,
}

impl Selection {
    pub fn single(id: NodeId) -> Self {
        Self { ids: vec![id] }
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.ids.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Drop `id`; returns whether it was selected.
    pub fn remove(&mut self, id: &NodeId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|selected| selected != id);
        self.ids.len() != before
    }
}

/// Board pan/zoom. UI-only, carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    #[serde(default, deserialize_with = "lenient::signed")]
    pub x: f64,
    #[serde(default, deserialize_with = "lenient::signed")]
    pub y: f64,
    #[serde(default = "unit_zoom", deserialize_with = "lenient::zoom")]
    pub k: f64,
    /// Editor-specific keys kept as-is.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn unit_zoom() -> f64 {
    1.0
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            k: 1.0,
            extra: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub k: Option<f64>,
}

impl ViewportPatch {
    pub fn apply(&self, viewport: &mut Viewport) -> bool {
        let before = viewport.clone();
        if let Some(x) = self.x.filter(|v| v.is_finite()) {
            viewport.x = x;
        }
        if let Some(y) = self.y.filter(|v| v.is_finite()) {
            viewport.y = y;
        }
        if let Some(k) = self.k.filter(|v| v.is_finite() && *v > 0.0) {
            viewport.k = k;
        }
        *viewport != before
    }
}

/// UI-scoped settings: the active lamp function and its lumen target, plus
/// whatever else the embedding application stores here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSettings {
    #[serde(default, deserialize_with = "lenient::non_negative")]
    pub target_lumens: f64,
    #[serde(default)]
    pub active_function: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiPatch {
    pub target_lumens: Option<f64>,
    pub active_function: Option<String>,
    pub extra: BTreeMap<String, Value>,
}

impl UiPatch {
    pub fn target_lumens(mut self, lumens: f64) -> Self {
        self.target_lumens = Some(lumens);
        self
    }

    pub fn active_function(mut self, id: impl Into<String>) -> Self {
        self.active_function = Some(id.into());
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn apply(&self, ui: &mut UiSettings) -> bool {
        let before = ui.clone();
        if let Some(lumens) = self.target_lumens {
            ui.target_lumens = lenient::coerce_number(lumens);
        }
        if let Some(function) = &self.active_function {
            ui.active_function.clone_from(function);
        }
        for (key, value) in &self.extra {
            ui.extra.insert(key.clone(), value.clone());
        }
        *ui != before
    }
}

/// Whole-state document used for export, import and history entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    #[serde(default)]
    pub chains: Vec<Chain>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub selection: Selection,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub ui: UiSettings,
}

impl ProjectSnapshot {
    /// Parse a project document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ModelError::Json`] when the text is not a project
    /// document.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Render the document as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ModelError::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let doc = ProjectSnapshot::from_json("{}").unwrap();
        assert!(doc.chains.is_empty());
        assert_eq!(doc.viewport, Viewport::default());
        assert_eq!(doc.ui.target_lumens, 0.0);
    }

    #[test]
    fn ui_extras_survive_round_trip() {
        let text = r#"{"ui":{"targetLumens":"450","activeFunction":"DRL","theme":"dark"}}"#;
        let doc = ProjectSnapshot::from_json(text).unwrap();
        assert_eq!(doc.ui.target_lumens, 450.0);
        assert_eq!(doc.ui.extra["theme"], serde_json::json!("dark"));
        let again = ProjectSnapshot::from_json(&doc.to_json_pretty().unwrap()).unwrap();
        assert_eq!(again, doc);
    }

    #[test]
    fn selection_remove_reports_membership() {
        let id = NodeId::new("n1").unwrap();
        let mut selection = Selection::single(id.clone());
        assert!(selection.remove(&id));
        assert!(!selection.remove(&id));
        assert!(selection.is_empty());
    }

    #[test]
    fn viewport_patch_ignores_bad_zoom() {
        let mut viewport = Viewport::default();
        let patch = ViewportPatch {
            x: Some(10.0),
            y: None,
            k: Some(0.0),
        };
        assert!(patch.apply(&mut viewport));
        assert_eq!(viewport.x, 10.0);
        assert_eq!(viewport.k, 1.0);
    }
}

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::{ChainId, NodeId};
use crate::lenient;

/// Catalog key reserved for the emitter anchoring a chain.
pub const LIGHT_SOURCE_KIND: &str = "LightSource";

/// Modifier key -> selected value.
pub type NodeConfig = BTreeMap<String, ConfigValue>;

/// A selected modifier value as produced by an editor.
///
/// Select inputs produce text, numeric inputs produce numbers. Validation
/// happens when the catalog resolves the value, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Lists, objects and anything else an editor stored; carried through,
    /// never matched.
    Other(Value),
}

impl ConfigValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// Key used to look the value up in a factor table.
    ///
    /// Whole numbers render without a fractional part so `2.0` matches an
    /// option named `"2"`. `Null` means "not selected".
    pub fn option_key(&self) -> Option<Cow<'_, str>> {
        match self {
            ConfigValue::Null | ConfigValue::Other(_) => None,
            ConfigValue::Bool(flag) => Some(Cow::Borrowed(if *flag { "true" } else { "false" })),
            ConfigValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(Cow::Owned(format!("{}", *n as i64)))
            }
            ConfigValue::Number(n) => Some(Cow::Owned(n.to_string())),
            ConfigValue::Text(text) => Some(Cow::Borrowed(text.as_str())),
        }
    }

    /// Numeric reading of the value; non-numeric input becomes `0`.
    pub fn as_number(&self) -> f64 {
        match self {
            ConfigValue::Number(n) => lenient::coerce_number(*n),
            ConfigValue::Text(text) => lenient::parse_number(text),
            ConfigValue::Null | ConfigValue::Bool(_) | ConfigValue::Other(_) => 0.0,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Text(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Number(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

/// A light source or one attenuating component within a chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub chain_id: ChainId,
    pub kind: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub config: NodeConfig,
    /// Stashed: excluded from range computation and active chain membership.
    #[serde(default)]
    pub disabled: bool,
    /// Position among the chain's components; light sources are unordered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    /// Layout and editor fields carried through untouched (board position etc.).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Node {
    pub fn is_light_source(&self) -> bool {
        self.kind == LIGHT_SOURCE_KIND
    }

    /// Enabled, non-light-source member of `chain_id`.
    pub fn is_active_component_of(&self, chain_id: &ChainId) -> bool {
        &self.chain_id == chain_id && !self.is_light_source() && !self.disabled
    }
}

/// Input for `add_node`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNode {
    /// Explicit id; the store mints one when absent or already taken.
    pub id: Option<NodeId>,
    pub chain_id: ChainId,
    pub kind: String,
    pub label: String,
    pub config: NodeConfig,
    pub disabled: bool,
    pub order: Option<u32>,
}

impl NewNode {
    pub fn new(chain_id: ChainId, kind: impl Into<String>) -> Self {
        Self {
            id: None,
            chain_id,
            kind: kind.into(),
            label: String::new(),
            config: NodeConfig::new(),
            disabled: false,
            order: None,
        }
    }

    pub fn light_source(chain_id: ChainId) -> Self {
        Self::new(chain_id, LIGHT_SOURCE_KIND).label("Light Source")
    }

    pub fn with_id(mut self, id: NodeId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn config(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }
}

/// Shallow patch applied by `update_node`.
///
/// `config` replaces the whole modifier map, matching how editors submit the
/// full form. `extra` entries are merged key by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub kind: Option<String>,
    pub label: Option<String>,
    pub config: Option<NodeConfig>,
    pub extra: BTreeMap<String, Value>,
}

impl NodePatch {
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn config(mut self, config: NodeConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Merge into `node`; returns whether anything changed.
    pub fn apply(&self, node: &mut Node) -> bool {
        let before = node.clone();
        if let Some(kind) = &self.kind {
            node.kind.clone_from(kind);
        }
        if let Some(label) = &self.label {
            node.label.clone_from(label);
        }
        if let Some(config) = &self.config {
            node.config.clone_from(config);
        }
        for (key, value) in &self.extra {
            node.extra.insert(key.clone(), value.clone());
        }
        *node != before
    }
}

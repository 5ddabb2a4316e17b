//! Per-kind catalog entries: editable modifiers and their factor tables.

use std::collections::BTreeMap;

use lumen_model::{ConfigValue, Interval};
use serde::{Deserialize, Serialize};

/// One value in a factor table.
///
/// Documents may store a full tolerance interval or a bare number. Anything
/// else is kept so the document round-trips, but contributes nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactorValue {
    Scalar(f64),
    Range(Interval),
    Unrecognized(serde_json::Value),
}

impl FactorValue {
    /// The multiplier this value represents, if it is well formed.
    pub fn interval(&self) -> Option<Interval> {
        let interval = match self {
            FactorValue::Scalar(x) => Interval::scalar(*x),
            FactorValue::Range(range) => *range,
            FactorValue::Unrecognized(_) => return None,
        };
        interval.is_well_formed().then_some(interval)
    }
}

impl From<Interval> for FactorValue {
    fn from(value: Interval) -> Self {
        FactorValue::Range(value)
    }
}

impl From<f64> for FactorValue {
    fn from(value: f64) -> Self {
        FactorValue::Scalar(value)
    }
}

/// How an editor collects a modifier value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "input", rename_all = "lowercase")]
pub enum ModifierInput {
    Select {
        #[serde(default)]
        options: Vec<String>,
    },
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(flatten)]
    pub input: ModifierInput,
}

impl Modifier {
    pub fn select<I, S>(key: impl Into<String>, label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: key.into(),
            label: label.into(),
            input: ModifierInput::Select {
                options: options.into_iter().map(Into::into).collect(),
            },
        }
    }

    pub fn number(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            input: ModifierInput::Number {
                min: None,
                max: None,
                step: None,
            },
        }
    }

    pub fn options(&self) -> &[String] {
        match &self.input {
            ModifierInput::Select { options } => options,
            ModifierInput::Number { .. } => &[],
        }
    }

    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.key
        } else {
            &self.label
        }
    }
}

/// Catalog description of one component kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    /// modifier key -> option value -> multiplier.
    #[serde(default)]
    pub factors: BTreeMap<String, BTreeMap<String, FactorValue>>,
    /// coefficient name -> option value -> constant, read by computed rules.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub coefficients: BTreeMap<String, BTreeMap<String, f64>>,
}

impl CatalogEntry {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_factor(
        mut self,
        key: impl Into<String>,
        option: impl Into<String>,
        value: impl Into<FactorValue>,
    ) -> Self {
        self.factors
            .entry(key.into())
            .or_default()
            .insert(option.into(), value.into());
        self
    }

    pub fn with_coefficient(
        mut self,
        name: impl Into<String>,
        option: impl Into<String>,
        value: f64,
    ) -> Self {
        self.coefficients
            .entry(name.into())
            .or_default()
            .insert(option.into(), value);
        self
    }

    pub fn modifier(&self, key: &str) -> Option<&Modifier> {
        self.modifiers.iter().find(|m| m.key == key)
    }

    /// Registered multiplier for `key = value`, if any.
    pub fn factor_for(&self, key: &str, value: &ConfigValue) -> Option<Interval> {
        let option = value.option_key()?;
        self.factors.get(key)?.get(option.as_ref())?.interval()
    }

    pub fn coefficient(&self, name: &str, option: &str) -> Option<f64> {
        self.coefficients.get(name)?.get(option).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_factor_is_degenerate_interval() {
        assert_eq!(
            FactorValue::Scalar(0.9).interval(),
            Some(Interval::scalar(0.9))
        );
    }

    #[test]
    fn malformed_factors_yield_nothing() {
        assert_eq!(FactorValue::Scalar(-1.0).interval(), None);
        assert_eq!(
            FactorValue::Range(Interval { min: 0.9, max: 0.5 }).interval(),
            None
        );
        assert_eq!(
            FactorValue::Unrecognized(serde_json::json!("high")).interval(),
            None
        );
    }

    #[test]
    fn factor_values_parse_by_shape() {
        let table: BTreeMap<String, FactorValue> = serde_json::from_str(
            r#"{"a": 0.5, "b": {"min": 0.1, "max": 0.2}, "c": "oops", "d": {"min": 1}}"#,
        )
        .unwrap();
        assert_eq!(table["a"], FactorValue::Scalar(0.5));
        assert!(matches!(table["b"], FactorValue::Range(_)));
        assert!(matches!(table["c"], FactorValue::Unrecognized(_)));
        assert!(matches!(table["d"], FactorValue::Unrecognized(_)));
    }

    #[test]
    fn modifiers_parse_by_input_tag() {
        let mods: Vec<Modifier> = serde_json::from_str(
            r#"[{"key":"type","label":"Type","input":"select","options":["Single"]},
                {"key":"lengthMm","input":"number","min":0,"step":1}]"#,
        )
        .unwrap();
        assert_eq!(mods[0].options().to_vec(), vec!["Single".to_string()]);
        assert_eq!(mods[1].display_label(), "lengthMm");
        assert!(matches!(
            mods[1].input,
            ModifierInput::Number {
                min: Some(_),
                max: None,
                ..
            }
        ));
    }

    #[test]
    fn factor_lookup_uses_option_key() {
        let entry = CatalogEntry::new("Lens").with_factor("stages", "2", 0.8);
        assert_eq!(
            entry.factor_for("stages", &ConfigValue::Number(2.0)),
            Some(Interval::scalar(0.8))
        );
        assert_eq!(entry.factor_for("stages", &ConfigValue::Null), None);
        assert_eq!(entry.factor_for("missing", &ConfigValue::from("2")), None);
    }
}

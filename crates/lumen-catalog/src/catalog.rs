#![deny(unsafe_code)]

use std::collections::BTreeMap;

use lumen_model::{ConfigValue, Interval, LIGHT_SOURCE_KIND};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::embedded;
use crate::entry::{CatalogEntry, Modifier};
use crate::error::{CatalogError, CatalogFormat, Result};

/// Registry of component kinds keyed by catalog key.
///
/// A catalog document is a plain mapping `kind -> entry`. Entries that fail
/// to parse are dropped with a warning instead of rejecting the document, so
/// a single bad kind never hides the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, kind: impl Into<String>, entry: CatalogEntry) -> Self {
        self.insert(kind, entry);
        self
    }

    pub fn insert(&mut self, kind: impl Into<String>, entry: CatalogEntry) -> Option<CatalogEntry> {
        self.entries.insert(kind.into(), entry)
    }

    pub fn entry(&self, kind: &str) -> Option<&CatalogEntry> {
        self.entries.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.entries.contains_key(kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Multiplier registered for `kind.key = value`.
    ///
    /// Missing kinds, keys, options and malformed table values all resolve to
    /// the neutral interval.
    pub fn factor_for(&self, kind: &str, key: &str, value: &ConfigValue) -> Interval {
        self.entry(kind)
            .and_then(|entry| entry.factor_for(key, value))
            .unwrap_or(Interval::ONE)
    }

    /// Component kinds an editor can offer, in key order.
    pub fn kinds(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.entries
            .iter()
            .filter(|(kind, _)| kind.as_str() != LIGHT_SOURCE_KIND)
            .map(|(kind, entry)| (kind.as_str(), entry))
    }

    pub fn modifiers(&self, kind: &str) -> &[Modifier] {
        self.entry(kind)
            .map(|entry| entry.modifiers.as_slice())
            .unwrap_or(&[])
    }

    /// Display label for `kind`, falling back to the key itself.
    pub fn label<'a>(&'a self, kind: &'a str) -> &'a str {
        match self.entry(kind) {
            Some(entry) if !entry.label.is_empty() => &entry.label,
            _ => kind,
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| CatalogError::Parse {
            format: CatalogFormat::Json,
            path: None,
            message: e.to_string(),
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| CatalogError::Parse {
            format: CatalogFormat::Toml,
            path: None,
            message: e.to_string(),
        })
    }

    pub fn parse(text: &str, format: CatalogFormat) -> Result<Self> {
        match format {
            CatalogFormat::Json => Self::from_json_str(text),
            CatalogFormat::Toml => Self::from_toml_str(text),
        }
    }

    pub fn render(&self, format: CatalogFormat) -> Result<String> {
        let rendered = match format {
            CatalogFormat::Json => serde_json::to_string_pretty(self).map_err(|e| e.to_string()),
            CatalogFormat::Toml => toml::to_string_pretty(self).map_err(|e| e.to_string()),
        };
        rendered.map_err(|message| CatalogError::Encode { format, message })
    }

    fn from_raw(raw: BTreeMap<String, serde_json::Value>) -> Self {
        let mut entries = BTreeMap::new();
        for (kind, value) in raw {
            match serde_json::from_value::<CatalogEntry>(value) {
                Ok(entry) => {
                    entries.insert(kind, entry);
                }
                Err(error) => warn!(kind = %kind, %error, "skipping malformed catalog entry"),
            }
        }
        Self { entries }
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(Self::from_raw(raw))
    }
}

/// Load the catalog compiled into the binary.
pub fn load_default_catalog() -> Result<Catalog> {
    Catalog::from_toml_str(embedded::DEFAULT_CATALOG)
}

//! Tests for the built-in catalog and catalog documents on disk.

use lumen_catalog::{
    ABSORPTION_PER_MM, Catalog, CatalogEntry, CatalogFormat, LIGHT_PIPE_KIND, ModifierInput,
    RuleRegistry, load_catalog, load_default_catalog, save_catalog,
};
use lumen_model::{ConfigValue, Interval};
use tempfile::tempdir;

#[test]
fn default_catalog_describes_light_pipe() {
    let catalog = load_default_catalog().expect("load default catalog");
    let entry = catalog.entry(LIGHT_PIPE_KIND).expect("light pipe entry");
    assert_eq!(entry.label, "Light Pipe");

    let keys: Vec<_> = entry.modifiers.iter().map(|m| m.key.as_str()).collect();
    assert_eq!(keys, vec!["type", "material", "texture", "lengthMm"]);
    assert!(matches!(
        entry.modifier("lengthMm").unwrap().input,
        ModifierInput::Number { .. }
    ));
    assert_eq!(
        entry.modifier("texture").unwrap().options().to_vec(),
        vec!["MT11020", "MT11030", "MT11040"]
    );
}

#[test]
fn default_factor_tables() {
    let catalog = load_default_catalog().expect("load default catalog");
    let lookup = |key: &str, value: &str| {
        catalog.factor_for(LIGHT_PIPE_KIND, key, &ConfigValue::from(value))
    };
    assert_eq!(lookup("type", "Single"), Interval { min: 0.40, max: 0.50 });
    assert_eq!(lookup("material", "PMMA"), Interval { min: 0.98, max: 0.99 });
    assert_eq!(lookup("texture", "MT11020"), Interval { min: 0.60, max: 0.65 });
    assert_eq!(lookup("texture", "MT99999"), Interval::ONE);
}

#[test]
fn default_catalog_carries_absorption_coefficients() {
    let catalog = load_default_catalog().expect("load default catalog");
    let entry = catalog.entry(LIGHT_PIPE_KIND).unwrap();
    assert_eq!(entry.coefficient(ABSORPTION_PER_MM, "PMMA"), Some(0.0010));
    assert_eq!(entry.coefficient(ABSORPTION_PER_MM, "Glass"), Some(0.0003));
}

#[test]
fn builtin_rules_cover_light_pipe() {
    let rules = RuleRegistry::builtin();
    assert!(rules.rule_for(LIGHT_PIPE_KIND).is_some());
    assert_eq!(rules.kinds().collect::<Vec<_>>(), vec![LIGHT_PIPE_KIND]);
}

#[test]
fn json_and_toml_files_round_trip() {
    let dir = tempdir().unwrap();
    let catalog = load_default_catalog().expect("load default catalog");
    for name in ["catalog.json", "catalog.toml"] {
        let path = dir.path().join(name);
        save_catalog(&catalog, &path).expect("save catalog");
        let loaded = load_catalog(&path).expect("load catalog");
        assert_eq!(loaded, catalog, "{name}");
    }
}

#[test]
fn format_follows_extension() {
    assert_eq!(
        CatalogFormat::from_path(std::path::Path::new("a/catalog.TOML")),
        CatalogFormat::Toml
    );
    assert_eq!(
        CatalogFormat::from_path(std::path::Path::new("catalog")),
        CatalogFormat::Json
    );
}

#[test]
fn imported_document_replaces_kinds() {
    let text = r#"{
        "Diffuser": {
            "label": "Diffuser",
            "modifiers": [{"key": "grade", "input": "select", "options": ["A", "B"]}],
            "factors": {"grade": {"A": {"min": 0.8, "max": 0.85}, "B": 0.7}}
        }
    }"#;
    let catalog = Catalog::from_json_str(text).expect("parse catalog");
    assert!(!catalog.contains(LIGHT_PIPE_KIND));
    assert_eq!(
        catalog.factor_for("Diffuser", "grade", &ConfigValue::from("B")),
        Interval::scalar(0.7)
    );
    let entry: &CatalogEntry = catalog.entry("Diffuser").unwrap();
    assert_eq!(entry.modifiers[0].display_label(), "grade");
}

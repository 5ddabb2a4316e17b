//! Tests for project document parsing.

use lumen_model::{ChainId, ConfigValue, LIGHT_SOURCE_KIND, ProjectSnapshot};
use serde_json::json;

const DOCUMENT: &str = r#"{
  "chains": [
    { "id": "c1", "label": "Low beam", "ledCount": "12", "lmPerLed": 85 },
    { "id": "c2", "label": "DRL", "ledCount": null, "lmPerLed": "n/a" }
  ],
  "nodes": [
    { "id": "ls1", "chainId": "c1", "kind": "LightSource", "label": "Light Source", "x": 120, "y": 120 },
    { "id": "p1", "chainId": "c1", "kind": "LightPipe", "label": "Pipe", "order": 0,
      "config": { "type": "Single", "material": "PMMA", "lengthMm": "40" } }
  ],
  "selection": { "ids": ["p1"] },
  "viewport": { "x": 10, "y": -4, "k": 1.5 },
  "ui": { "targetLumens": 900, "activeFunction": "low-beam" }
}"#;

#[test]
fn parses_full_document() {
    let doc = ProjectSnapshot::from_json(DOCUMENT).expect("parse project");
    assert_eq!(doc.chains.len(), 2);
    assert_eq!(doc.chains[0].led_count, 12);
    assert_eq!(doc.chains[0].source_lumens(), 1020.0);
    assert_eq!(doc.nodes[0].kind, LIGHT_SOURCE_KIND);
    assert!(doc.nodes[0].is_light_source());
    assert_eq!(doc.nodes[1].order, Some(0));
    assert_eq!(doc.nodes[1].config["lengthMm"].as_number(), 40.0);
    assert_eq!(doc.selection.ids[0].as_str(), "p1");
    assert_eq!(doc.viewport.k, 1.5);
    assert_eq!(doc.ui.active_function, "low-beam");
}

#[test]
fn malformed_numbers_default_to_zero() {
    let doc = ProjectSnapshot::from_json(DOCUMENT).expect("parse project");
    let drl = &doc.chains[1];
    assert_eq!(drl.led_count, 0);
    assert_eq!(drl.lm_per_led, 0.0);
    assert_eq!(drl.source_lumens(), 0.0);
}

#[test]
fn active_membership_excludes_light_source() {
    let doc = ProjectSnapshot::from_json(DOCUMENT).expect("parse project");
    let c1 = ChainId::new("c1").unwrap();
    let active: Vec<_> = doc
        .nodes
        .iter()
        .filter(|n| n.is_active_component_of(&c1))
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(active, vec!["p1"]);
}

#[test]
fn export_round_trips() {
    let doc = ProjectSnapshot::from_json(DOCUMENT).expect("parse project");
    let text = doc.to_json_pretty().expect("serialize");
    let again = ProjectSnapshot::from_json(&text).expect("reparse");
    assert_eq!(again, doc);
    assert_eq!(again.nodes[1].config["type"], ConfigValue::from("Single"));
}

#[test]
fn rejects_non_documents() {
    assert!(ProjectSnapshot::from_json("[1, 2, 3]").is_err());
    assert!(ProjectSnapshot::from_json(r#"{"chains": [{"label": "no id"}]}"#).is_err());
}

#[test]
fn free_form_config_values_are_kept_and_neutral() {
    let doc = ProjectSnapshot::from_json(
        r#"{
  "chains": [{ "id": "c1", "ledCount": 1, "lmPerLed": 100 }],
  "nodes": [{ "id": "p1", "chainId": "c1", "kind": "LightPipe",
    "config": { "type": "Single", "notes": ["a", "b"], "meta": { "by": "lab" } } }]
}"#,
    )
    .expect("parse project");
    let config = &doc.nodes[0].config;
    assert_eq!(config["type"], ConfigValue::from("Single"));
    assert_eq!(config["notes"], ConfigValue::Other(json!(["a", "b"])));
    assert_eq!(config["notes"].option_key(), None);
    assert_eq!(config["meta"].as_number(), 0.0);

    let again = ProjectSnapshot::from_json(&doc.to_json_pretty().expect("serialize"))
        .expect("reparse");
    assert_eq!(again, doc);
}

#[test]
fn viewport_is_lenient_and_keeps_unknown_keys() {
    let doc = ProjectSnapshot::from_json(
        r#"{ "viewport": { "x": "15", "y": -3, "k": null, "grid": 8 } }"#,
    )
    .expect("parse project");
    assert_eq!(doc.viewport.x, 15.0);
    assert_eq!(doc.viewport.y, -3.0);
    assert_eq!(doc.viewport.k, 1.0);
    assert_eq!(doc.viewport.extra["grid"], json!(8));

    let text = doc.to_json_pretty().expect("serialize");
    let value: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert_eq!(value["viewport"]["grid"], json!(8));
}

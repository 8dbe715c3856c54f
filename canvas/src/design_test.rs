#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::element::{Element, GemstoneType, TextSpec};

fn sample_scene() -> Scene {
    let mut scene = Scene::new();
    scene.add(Element::gemstone(GemstoneType::Ruby, 400.0, 300.0).unwrap(), None).unwrap();
    scene.add(Element::text(&TextSpec::new("Eternal"), 100.0, 50.0), None).unwrap();
    scene
}

#[test]
fn from_scene_summarizes_each_element() {
    let design = DesignDocument::from_scene("My Ring", &sample_scene()).unwrap();
    assert_eq!(design.name, "My Ring");
    assert_eq!(design.elements.len(), 2);
    assert_eq!(design.elements[0].name, "Ruby");
    assert_eq!(design.elements[0].kind, ElementKind::Gemstone);
    assert_eq!(design.elements[1].properties.left, 100.0);
}

#[test]
fn blank_name_becomes_untitled() {
    let design = DesignDocument::from_scene("   ", &Scene::new()).unwrap();
    assert_eq!(design.name, UNTITLED_DESIGN);
    assert!(design.elements.is_empty());
}

#[test]
fn json_shape_matches_save_contract() {
    let design = DesignDocument::from_scene("Ring", &sample_scene()).unwrap();
    let value = serde_json::to_value(&design).unwrap();
    assert_eq!(value["name"], "Ring");
    assert_eq!(value["canvas_data"]["version"], 1);
    assert_eq!(value["elements"][0]["type"], "gemstone");
    assert_eq!(
        value["elements"][0]["properties"],
        json!({ "left": 400.0, "top": 300.0, "scaleX": 1.0, "scaleY": 1.0, "angle": 0.0, "opacity": 1.0 })
    );
}

#[test]
fn scene_roundtrips_through_design() {
    let scene = sample_scene();
    let design = DesignDocument::from_scene("Ring", &scene).unwrap();
    let text = serde_json::to_string(&design).unwrap();
    let back: DesignDocument = serde_json::from_str(&text).unwrap();
    assert_eq!(back.scene().unwrap(), scene);
}

#[test]
fn elements_summary_is_optional_on_load() {
    let value = json!({ "name": "Bare", "canvas_data": { "version": 1, "objects": [] } });
    let design: DesignDocument = serde_json::from_value(value).unwrap();
    assert!(design.elements.is_empty());
    assert!(design.scene().unwrap().is_empty());
}

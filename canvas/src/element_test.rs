#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

// =============================================================
// Kind and gemstone type names
// =============================================================

#[test]
fn kind_serde_all_variants() {
    let cases = [
        (ElementKind::Gemstone, "\"gemstone\""),
        (ElementKind::Bezel, "\"bezel\""),
        (ElementKind::Text, "\"text\""),
        (ElementKind::Custom, "\"custom\""),
    ];
    for (kind, expected) in cases {
        assert_eq!(serde_json::to_string(&kind).unwrap(), expected);
        assert_eq!(ElementKind::parse(kind.as_str()), Some(kind));
    }
}

#[test]
fn kind_deserialize_invalid_rejects() {
    assert!(serde_json::from_str::<ElementKind>("\"sticker\"").is_err());
    assert_eq!(ElementKind::parse("Gemstone"), None);
}

#[test]
fn gemstone_type_parse_is_lenient() {
    assert_eq!(GemstoneType::parse("Ruby"), GemstoneType::Ruby);
    assert_eq!(GemstoneType::parse(" topaz "), GemstoneType::Topaz);
    assert_eq!(GemstoneType::parse("opal"), GemstoneType::Other);
}

#[test]
fn bezel_choice_names_parse_case_insensitively() {
    assert_eq!(BezelStyle::parse("Serrated"), Some(BezelStyle::Serrated));
    assert_eq!(BezelStyle::parse("wavy"), None);
    assert_eq!(BezelMetal::parse("GOLD"), Some(BezelMetal::Gold));
    assert_eq!(BezelMetal::parse("platinum"), None);
}

// =============================================================
// Catalogue
// =============================================================

#[test]
fn catalogue_covers_every_named_stone() {
    for gem in GemstoneType::ALL {
        let entry = gem.catalogue();
        assert_eq!(entry.is_some(), gem != GemstoneType::Other, "{gem:?}");
    }
}

#[test]
fn catalogue_shapes_match_stone_family() {
    let shape = |gem: GemstoneType| gem.catalogue().map(|(g, _, _)| g);
    assert!(matches!(shape(GemstoneType::Diamond), Some(Geometry::Polygon { ref points }) if points.len() == 4));
    assert!(matches!(shape(GemstoneType::Topaz), Some(Geometry::Polygon { ref points }) if points.len() == 6));
    assert_eq!(shape(GemstoneType::Ruby), Some(Geometry::Circle { radius: 20.0 }));
    assert_eq!(shape(GemstoneType::Emerald), Some(Geometry::Rect { half_width: 15.0, half_height: 15.0 }));
    assert_eq!(shape(GemstoneType::Sapphire), Some(Geometry::Ellipse { rx: 20.0, ry: 15.0 }));
}

#[test]
fn gemstone_constructor_uses_catalogue_style() {
    let ruby = Element::gemstone(GemstoneType::Ruby, 400.0, 300.0).unwrap();
    assert_eq!(ruby.kind, ElementKind::Gemstone);
    assert_eq!(ruby.name, "Ruby");
    assert_eq!(ruby.gemstone_type, Some(GemstoneType::Ruby));
    assert_eq!(ruby.style.fill.as_deref(), Some("#dc143c"));
    assert_eq!(ruby.style.stroke.as_deref(), Some("#b91c2c"));
    assert_eq!(ruby.style.stroke_width, 2.0);
    assert_eq!(ruby.transform.left, 400.0);
    assert_eq!(ruby.transform.top, 300.0);
    assert!(ruby.link_id.is_none());
}

#[test]
fn gemstone_constructor_rejects_other() {
    assert!(Element::gemstone(GemstoneType::Other, 0.0, 0.0).is_none());
}

#[test]
fn gemstones_get_distinct_ids() {
    let a = Element::gemstone(GemstoneType::Ruby, 0.0, 0.0).unwrap();
    let b = Element::gemstone(GemstoneType::Ruby, 0.0, 0.0).unwrap();
    assert_ne!(a.id, b.id);
}

// =============================================================
// Text
// =============================================================

#[test]
fn text_constructor_names_after_content() {
    let el = Element::text(&TextSpec::new("Forever"), 10.0, 20.0);
    assert_eq!(el.kind, ElementKind::Text);
    assert_eq!(el.name, "Text: Forever");
    assert_eq!(el.style.fill.as_deref(), Some("#000000"));
    assert!(matches!(el.geometry, Geometry::Text { ref font_family, font_size, .. }
        if font_family == "Arial" && font_size == 24.0));
}

#[test]
fn text_spec_defaults_fill_in_when_deserialized() {
    let spec: TextSpec = serde_json::from_value(json!({ "text": "A" })).unwrap();
    assert_eq!(spec, TextSpec::new("A"));
}

#[test]
fn text_name_is_truncated() {
    let el = Element::text(&TextSpec::new("x".repeat(80)), 0.0, 0.0);
    assert_eq!(el.name.chars().count(), MAX_NAME_CHARS);
}

// =============================================================
// Names and duplication
// =============================================================

#[test]
fn display_name_falls_back_for_empty() {
    let mut el = Element::gemstone(GemstoneType::Diamond, 0.0, 0.0).unwrap();
    el.name.clear();
    assert_eq!(el.display_name(), UNNAMED_LAYER);
}

#[test]
fn duplicate_offsets_and_renames() {
    let el = Element::gemstone(GemstoneType::Emerald, 100.0, 50.0).unwrap();
    let copy = el.duplicate();
    assert_ne!(copy.id, el.id);
    assert_eq!(copy.name, "Emerald Copy");
    assert_eq!(copy.transform.left, 120.0);
    assert_eq!(copy.transform.top, 70.0);
    assert_eq!(copy.geometry, el.geometry);
    assert_eq!(copy.style, el.style);
}

#[test]
fn duplicate_of_unnamed_is_copy_copy() {
    let mut el = Element::gemstone(GemstoneType::Emerald, 0.0, 0.0).unwrap();
    el.name.clear();
    assert_eq!(el.duplicate().name, "Copy Copy");
}

#[test]
fn clamp_name_counts_chars_not_bytes() {
    let name = "é".repeat(60);
    assert_eq!(clamp_name(&name).chars().count(), 50);
    assert_eq!(clamp_name("short"), "short");
}

// =============================================================
// Serde shape
// =============================================================

#[test]
fn element_serializes_with_camel_case_keys() {
    let el = Element::gemstone(GemstoneType::Sapphire, 1.0, 2.0).unwrap();
    let value = serde_json::to_value(&el).unwrap();
    assert_eq!(value["type"], "gemstone");
    assert_eq!(value["gemstoneType"], "sapphire");
    assert_eq!(value["geometry"]["shape"], "ellipse");
    assert_eq!(value["transform"]["scaleX"], 1.0);
    assert_eq!(value["style"]["strokeWidth"], 2.0);
    assert!(value.get("linkId").is_none());
}

#[test]
fn rect_geometry_uses_camel_case_fields() {
    let value = serde_json::to_value(Geometry::Rect { half_width: 1.0, half_height: 2.0 }).unwrap();
    assert_eq!(value, json!({ "shape": "rect", "halfWidth": 1.0, "halfHeight": 2.0 }));
}

#[test]
fn filter_serializes_tagged() {
    let value = serde_json::to_value(Filter::Pixelate { block_size: 4 }).unwrap();
    assert_eq!(value, json!({ "type": "pixelate", "blockSize": 4 }));
}

#[test]
fn element_deserializes_with_missing_optional_fields() {
    let value = json!({
        "id": "00000000-0000-0000-0000-000000000000",
        "type": "custom",
        "geometry": { "shape": "image", "src": "/a.png", "width": 10.0, "height": 5.0 },
    });
    let el: Element = serde_json::from_value(value).unwrap();
    assert_eq!(el.name, "");
    assert_eq!(el.transform, Transform::default());
    assert_eq!(el.style, Style::default());
    assert!(el.geometry.is_image());
}

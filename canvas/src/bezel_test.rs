#![allow(clippy::float_cmp)]

use super::*;
use crate::element::{GemstoneType, TextSpec};

fn gem(kind: GemstoneType) -> Element {
    Element::gemstone(kind, 400.0, 300.0).unwrap()
}

fn image_gem(scale: f64) -> Element {
    let mut el = gem(GemstoneType::Ruby);
    el.gemstone_type = Some(GemstoneType::Other);
    el.geometry = Geometry::Image { src: "/static/opal.png".into(), width: 120.0, height: 90.0 };
    el.transform.scale_x = scale;
    el.transform.scale_y = scale;
    el
}

fn gold_plain() -> BezelChoice {
    BezelChoice::new(BezelStyle::Plain, BezelMetal::Gold)
}

// =============================================================
// Sizing
// =============================================================

#[test]
fn ruby_bezel_is_radius_plus_five() {
    let bezel = synthesize(&gem(GemstoneType::Ruby), gold_plain()).unwrap();
    assert_eq!(bezel.geometry, Geometry::Circle { radius: 25.0 });
}

#[test]
fn diamond_bezel_ignores_transform_scale() {
    let mut diamond = gem(GemstoneType::Diamond);
    diamond.transform.scale_x = 3.0;
    diamond.transform.scale_y = 3.0;
    let bezel = synthesize(&diamond, gold_plain()).unwrap();
    assert_eq!(bezel.geometry, Geometry::Circle { radius: 30.0 });
    assert_eq!(bezel.transform.scale_x, 1.0);
    assert_eq!(bezel.transform.scale_y, 1.0);
}

#[test]
fn sizes_for_every_catalogue_stone() {
    let cases = [
        (GemstoneType::Diamond, 30.0),
        (GemstoneType::Topaz, 30.0),
        (GemstoneType::Ruby, 25.0),
        (GemstoneType::Amethyst, 25.0),
        (GemstoneType::Emerald, 25.0),
        (GemstoneType::Sapphire, 25.0),
    ];
    for (kind, expected) in cases {
        assert_eq!(bezel_size(&gem(kind)), BezelSize::Radius(expected), "{kind:?}");
    }
}

#[test]
fn ellipse_uses_larger_radius() {
    let mut oval = gem(GemstoneType::Sapphire);
    oval.geometry = Geometry::Ellipse { rx: 10.0, ry: 32.0 };
    assert_eq!(bezel_size(&oval), BezelSize::Radius(37.0));
}

#[test]
fn emerald_bezel_is_square() {
    let bezel = synthesize(&gem(GemstoneType::Emerald), gold_plain()).unwrap();
    assert_eq!(bezel.geometry, Geometry::Rect { half_width: 25.0, half_height: 25.0 });
}

#[test]
fn image_stone_inflates_scale() {
    let stone = image_gem(0.5);
    let BezelSize::Scale { x, y } = bezel_size(&stone) else {
        panic!("expected scale sizing");
    };
    assert!((x - 0.56).abs() < 1e-12);
    assert!((y - 0.56).abs() < 1e-12);
    assert!(x / 0.5 >= 1.10 && x / 0.5 <= 1.15);
}

#[test]
fn image_bezel_reuses_source_and_scales() {
    let stone = image_gem(0.5);
    let bezel = synthesize(&stone, gold_plain()).unwrap();
    assert_eq!(bezel.geometry, stone.geometry);
    assert!((bezel.transform.scale_x - 0.56).abs() < 1e-12);
    assert!(bezel.style.fill.is_none());
}

// =============================================================
// Color
// =============================================================

#[test]
fn color_table() {
    let cases = [
        (BezelMetal::Gold, BezelStyle::Plain, Rgb::new(255, 215, 0)),
        (BezelMetal::Gold, BezelStyle::Serrated, Rgb::new(218, 165, 32)),
        (BezelMetal::Gold, BezelStyle::Scalloped, Rgb::new(255, 223, 0)),
        (BezelMetal::Silver, BezelStyle::Plain, Rgb::new(192, 192, 192)),
        (BezelMetal::Silver, BezelStyle::Serrated, Rgb::new(169, 169, 169)),
        (BezelMetal::Silver, BezelStyle::Scalloped, Rgb::new(211, 211, 211)),
    ];
    for (metal, style, expected) in cases {
        assert_eq!(BezelChoice::new(style, metal).color(), expected);
    }
}

#[test]
fn unknown_style_falls_back_to_metal_plain() {
    let choice = BezelChoice::resolve("unknown", "gold");
    assert_eq!(choice, gold_plain());
    assert_eq!(choice.color(), Rgb::new(255, 215, 0));
}

#[test]
fn unknown_metal_falls_back_to_silver_plain() {
    let choice = BezelChoice::resolve("serrated", "platinum");
    assert_eq!(choice, BezelChoice::new(BezelStyle::Plain, BezelMetal::Silver));
    assert_eq!(choice.color(), Rgb::new(192, 192, 192));
}

#[test]
fn resolve_known_names() {
    assert_eq!(
        BezelChoice::resolve("Scalloped", "silver"),
        BezelChoice::new(BezelStyle::Scalloped, BezelMetal::Silver)
    );
}

#[test]
fn vector_bezel_takes_color_as_fill_and_stroke() {
    let choice = BezelChoice::new(BezelStyle::Serrated, BezelMetal::Gold);
    let bezel = synthesize(&gem(GemstoneType::Ruby), choice).unwrap();
    assert_eq!(bezel.style.fill.as_deref(), Some("#daa520"));
    assert_eq!(bezel.style.stroke.as_deref(), Some("#daa520"));
    assert_eq!(bezel.style.bezel_style, Some(BezelStyle::Serrated));
    assert_eq!(bezel.style.bezel_metal, Some(BezelMetal::Gold));
}

#[test]
fn flatten_matrix_zeroes_rgb_gain_and_keeps_alpha() {
    let m = flatten_matrix(Rgb::new(255, 0, 51));
    for row in 0..3 {
        for col in 0..4 {
            assert_eq!(m[row * 5 + col], 0.0, "row {row} col {col}");
        }
    }
    assert_eq!(m[4], 1.0);
    assert_eq!(m[9], 0.0);
    assert!((m[14] - 0.2).abs() < 1e-9);
    assert_eq!(&m[15..], &[0.0, 0.0, 0.0, 1.0, 0.0]);
}

#[test]
fn image_bezel_gets_color_matrix_first() {
    let choice = BezelChoice::new(BezelStyle::Scalloped, BezelMetal::Silver);
    let bezel = synthesize(&image_gem(1.0), choice).unwrap();
    assert_eq!(
        bezel.style.filters,
        vec![
            Filter::ColorMatrix { matrix: flatten_matrix(Rgb::new(211, 211, 211)) },
            Filter::Blur { amount: SCALLOPED_BLUR },
        ]
    );
}

// =============================================================
// Style effects
// =============================================================

#[test]
fn style_effects() {
    assert_eq!(style_effect(BezelStyle::Plain), None);
    assert!(matches!(style_effect(BezelStyle::Serrated), Some(Filter::Pixelate { .. })));
    assert!(matches!(style_effect(BezelStyle::Scalloped), Some(Filter::Blur { .. })));
}

#[test]
fn effects_do_not_change_size() {
    let ruby = gem(GemstoneType::Ruby);
    for style in [BezelStyle::Plain, BezelStyle::Serrated, BezelStyle::Scalloped] {
        let bezel = synthesize(&ruby, BezelChoice::new(style, BezelMetal::Silver)).unwrap();
        assert_eq!(bezel.geometry, Geometry::Circle { radius: 25.0 });
    }
}

// =============================================================
// Placement
// =============================================================

#[test]
fn bezel_mirrors_position_and_angle() {
    let mut ruby = gem(GemstoneType::Ruby);
    ruby.transform.left = 123.0;
    ruby.transform.top = 45.0;
    ruby.transform.angle = 30.0;
    let bezel = synthesize(&ruby, gold_plain()).unwrap();
    assert_eq!(bezel.kind, ElementKind::Bezel);
    assert_eq!(bezel.link_id, Some(ruby.id));
    assert_ne!(bezel.id, ruby.id);
    assert_eq!((bezel.transform.left, bezel.transform.top, bezel.transform.angle), (123.0, 45.0, 30.0));
    assert_eq!(bezel.name, "Gold Plain Bezel");
}

#[test]
fn synthesize_rejects_non_gemstones() {
    let text = Element::text(&TextSpec::new("hi"), 0.0, 0.0);
    assert!(matches!(synthesize(&text, gold_plain()), Err(BezelError::NotAGemstone(id)) if id == text.id));
}

// =============================================================
// Planning
// =============================================================

#[test]
fn plan_inserts_directly_beneath_gemstone() {
    let topaz = gem(GemstoneType::Topaz);
    let ruby = gem(GemstoneType::Ruby);
    let mut scene = Scene::new();
    scene.add(topaz.clone(), None).unwrap();
    scene.add(ruby.clone(), None).unwrap();

    let plan = plan(&scene, ruby.id, gold_plain()).unwrap();
    assert!(plan.remove.is_empty());
    assert_eq!(plan.insert_at, 1);

    let bezel_id = plan.apply(&mut scene).unwrap();
    let order: Vec<_> = scene.iter().map(|el| el.id).collect();
    assert_eq!(order, vec![topaz.id, bezel_id, ruby.id]);
}

#[test]
fn plan_replaces_existing_bezel() {
    let ruby = gem(GemstoneType::Ruby);
    let mut scene = Scene::new();
    scene.add(ruby.clone(), None).unwrap();
    let first = plan(&scene, ruby.id, gold_plain()).unwrap().apply(&mut scene).unwrap();

    let second_plan = plan(&scene, ruby.id, BezelChoice::new(BezelStyle::Scalloped, BezelMetal::Silver)).unwrap();
    assert_eq!(second_plan.remove, vec![first]);
    assert_eq!(second_plan.insert_at, 0);
    let second = second_plan.apply(&mut scene).unwrap();

    assert_eq!(scene.bezels_for(ruby.id), vec![second]);
    assert_eq!(scene.len(), 2);
    assert_eq!(scene.index_of(second).unwrap() + 1, scene.index_of(ruby.id).unwrap());
}

#[test]
fn plan_removes_stray_bezels_above_gemstone() {
    let ruby = gem(GemstoneType::Ruby);
    let mut scene = Scene::new();
    scene.add(ruby.clone(), None).unwrap();
    let mut stray = synthesize(&ruby, gold_plain()).unwrap();
    stray.id = Uuid::new_v4();
    scene.add(stray.clone(), None).unwrap();

    let plan = plan(&scene, ruby.id, gold_plain()).unwrap();
    assert_eq!(plan.remove, vec![stray.id]);
    assert_eq!(plan.insert_at, 0);
}

#[test]
fn plan_errors() {
    let text = Element::text(&TextSpec::new("hi"), 0.0, 0.0);
    let mut scene = Scene::new();
    scene.add(text.clone(), None).unwrap();
    assert!(matches!(plan(&scene, text.id, gold_plain()), Err(BezelError::NotAGemstone(_))));
    assert!(matches!(
        plan(&scene, Uuid::new_v4(), gold_plain()),
        Err(BezelError::Scene(SceneError::NotFound(_)))
    ));
}

//! Bezel synthesis: derive a metal setting from a gemstone element.
//!
//! DESIGN
//! ======
//! A bezel approximates the gemstone's silhouette instead of tracing it.
//! Vector stones have a known shape, so the bezel gets an exact size from
//! the stone's geometry (fixed radius for cut stones, measured radius plus
//! padding for round and oval stones). Image stones only have pixels, so the
//! bezel reuses the image and inflates its scale by a fixed percentage.
//!
//! Color comes from a fixed `(metal, style)` table. Vector bezels take it as
//! fill and stroke. Image bezels get a color-matrix filter that flattens the
//! image to that single hue while keeping its alpha. The style's edge effect
//! is layered on afterwards and never changes the size.
//!
//! [`synthesize`] is pure. [`plan`] adds what the document needs to keep one
//! bezel per gemstone: the stale bezels to remove and where to insert.

#[cfg(test)]
#[path = "bezel_test.rs"]
mod bezel_test;

use uuid::Uuid;

use crate::color::Rgb;
use crate::consts::{
    BEZEL_RADIUS_PAD, BEZEL_STROKE_WIDTH, IMAGE_BEZEL_INFLATION, POLYGON_BEZEL_RADIUS, RECT_BEZEL_RADIUS,
    SCALLOPED_BLUR, SERRATED_BLOCK_SIZE,
};
use crate::element::{BezelMetal, BezelStyle, Element, ElementId, ElementKind, Filter, Geometry, Style, Transform};
use crate::error::{BezelError, SceneError};
use crate::scene::Scene;

/// A resolved `(style, metal)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BezelChoice {
    pub style: BezelStyle,
    pub metal: BezelMetal,
}

impl BezelChoice {
    #[must_use]
    pub fn new(style: BezelStyle, metal: BezelMetal) -> Self {
        Self { style, metal }
    }

    /// Resolve raw names with the table's fallbacks: an unknown style uses
    /// the metal's plain entry, an unknown metal uses silver/plain.
    #[must_use]
    pub fn resolve(style: &str, metal: &str) -> Self {
        match BezelMetal::parse(metal) {
            Some(metal) => Self::new(BezelStyle::parse(style).unwrap_or(BezelStyle::Plain), metal),
            None => Self::new(BezelStyle::Plain, BezelMetal::Silver),
        }
    }

    /// The metal color for this choice.
    #[must_use]
    pub fn color(self) -> Rgb {
        match (self.metal, self.style) {
            (BezelMetal::Gold, BezelStyle::Plain) => Rgb::new(255, 215, 0),
            (BezelMetal::Gold, BezelStyle::Serrated) => Rgb::new(218, 165, 32),
            (BezelMetal::Gold, BezelStyle::Scalloped) => Rgb::new(255, 223, 0),
            (BezelMetal::Silver, BezelStyle::Plain) => Rgb::new(192, 192, 192),
            (BezelMetal::Silver, BezelStyle::Serrated) => Rgb::new(169, 169, 169),
            (BezelMetal::Silver, BezelStyle::Scalloped) => Rgb::new(211, 211, 211),
        }
    }

    /// Layer name for a bezel of this choice, e.g. `"Gold Serrated Bezel"`.
    #[must_use]
    pub fn label(self) -> String {
        format!("{} {} Bezel", self.metal.label(), self.style.label())
    }
}

/// How big a bezel is relative to its gemstone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BezelSize {
    /// Exact outline radius for a vector stone, in canvas units.
    Radius(f64),
    /// Scale for an image stone whose outline is unknown.
    Scale { x: f64, y: f64 },
}

/// Size a bezel from the gemstone's geometry.
///
/// Vector sizes ignore the gemstone's transform scale; image sizes are the
/// gemstone's current scale inflated by [`IMAGE_BEZEL_INFLATION`].
#[must_use]
pub fn bezel_size(gemstone: &Element) -> BezelSize {
    match &gemstone.geometry {
        Geometry::Polygon { .. } => BezelSize::Radius(POLYGON_BEZEL_RADIUS),
        Geometry::Circle { radius } => BezelSize::Radius(radius + BEZEL_RADIUS_PAD),
        Geometry::Rect { .. } => BezelSize::Radius(RECT_BEZEL_RADIUS),
        Geometry::Ellipse { rx, ry } => BezelSize::Radius(rx.max(*ry) + BEZEL_RADIUS_PAD),
        Geometry::Image { .. } | Geometry::Text { .. } => BezelSize::Scale {
            x: gemstone.transform.scale_x * IMAGE_BEZEL_INFLATION,
            y: gemstone.transform.scale_y * IMAGE_BEZEL_INFLATION,
        },
    }
}

/// Linear channel transform that replaces RGB with `color` and keeps alpha.
#[must_use]
pub fn flatten_matrix(color: Rgb) -> [f64; 20] {
    let [r, g, b] = color.unit_channels();
    #[rustfmt::skip]
    let matrix = [
        0.0, 0.0, 0.0, 0.0, r,
        0.0, 0.0, 0.0, 0.0, g,
        0.0, 0.0, 0.0, 0.0, b,
        0.0, 0.0, 0.0, 1.0, 0.0,
    ];
    matrix
}

/// Edge treatment filter for a style, if any.
#[must_use]
pub fn style_effect(style: BezelStyle) -> Option<Filter> {
    match style {
        BezelStyle::Plain => None,
        BezelStyle::Serrated => Some(Filter::Pixelate { block_size: SERRATED_BLOCK_SIZE }),
        BezelStyle::Scalloped => Some(Filter::Blur { amount: SCALLOPED_BLUR }),
    }
}

/// Build a new bezel for `gemstone`. The result has a fresh id, mirrors the
/// gemstone's position and angle, and links back to it.
///
/// # Errors
///
/// `NotAGemstone` if `gemstone` is not a gemstone element.
pub fn synthesize(gemstone: &Element, choice: BezelChoice) -> Result<Element, BezelError> {
    if !gemstone.is_gemstone() {
        return Err(BezelError::NotAGemstone(gemstone.id));
    }

    let color = choice.color();
    let mut style = Style { bezel_style: Some(choice.style), bezel_metal: Some(choice.metal), ..Style::default() };
    let mut transform = Transform {
        left: gemstone.transform.left,
        top: gemstone.transform.top,
        angle: gemstone.transform.angle,
        ..Transform::default()
    };

    let geometry = match bezel_size(gemstone) {
        BezelSize::Radius(radius) => {
            style.fill = Some(color.to_hex());
            style.stroke = Some(color.to_hex());
            style.stroke_width = BEZEL_STROKE_WIDTH;
            if matches!(gemstone.geometry, Geometry::Rect { .. }) {
                Geometry::Rect { half_width: radius, half_height: radius }
            } else {
                Geometry::Circle { radius }
            }
        }
        BezelSize::Scale { x, y } => {
            transform.scale_x = x;
            transform.scale_y = y;
            style.filters.push(Filter::ColorMatrix { matrix: flatten_matrix(color) });
            gemstone.geometry.clone()
        }
    };
    style.filters.extend(style_effect(choice.style));

    Ok(Element {
        id: Uuid::new_v4(),
        kind: ElementKind::Bezel,
        name: choice.label(),
        gemstone_type: None,
        geometry,
        transform,
        style,
        link_id: Some(gemstone.id),
    })
}

/// Everything needed to attach a bezel while keeping one bezel per gemstone.
#[derive(Debug, Clone)]
pub struct BezelPlan {
    pub bezel: Element,
    /// Existing bezels for the same gemstone, to be removed first.
    pub remove: Vec<ElementId>,
    /// Gemstone index once `remove` is applied; the bezel goes here.
    pub insert_at: usize,
}

/// Plan a bezel for the gemstone `gemstone_id` in `scene`.
///
/// # Errors
///
/// `Scene(NotFound)` if the id is absent, `NotAGemstone` if it is not a
/// gemstone.
pub fn plan(scene: &Scene, gemstone_id: ElementId, choice: BezelChoice) -> Result<BezelPlan, BezelError> {
    let gemstone = scene.get(gemstone_id)?;
    let bezel = synthesize(gemstone, choice)?;
    let gem_index = scene.index_of(gemstone_id)?;
    let remove = scene.bezels_for(gemstone_id);
    let beneath = scene.elements()[..gem_index].iter().filter(|el| remove.contains(&el.id)).count();
    Ok(BezelPlan { bezel, remove, insert_at: gem_index - beneath })
}

impl BezelPlan {
    /// Apply to `scene`: drop the stale bezels, then insert the new one
    /// directly beneath its gemstone. Returns the new bezel's id.
    ///
    /// # Errors
    ///
    /// Propagates scene errors; on error the scene may be partially edited,
    /// so apply to a working copy.
    pub fn apply(self, scene: &mut Scene) -> Result<ElementId, SceneError> {
        for id in &self.remove {
            scene.remove(*id)?;
        }
        let id = self.bezel.id;
        scene.add(self.bezel, Some(self.insert_at))?;
        Ok(id)
    }
}

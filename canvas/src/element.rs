//! Element model: the placeable design units that make up a ring scene.
//!
//! An [`Element`] is plain data. Behavior lives in the [`Scene`](crate::scene)
//! (ordering, lookup, validated edits) and the [`bezel`](crate::bezel)
//! synthesizer. The serde shape of these types is the snapshot format, so
//! field renames here are wire-format changes.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DUPLICATE_OFFSET, MAX_NAME_CHARS};

/// Unique identifier for an element.
pub type ElementId = Uuid;

/// Label shown for elements whose name is empty.
pub const UNNAMED_LAYER: &str = "Unnamed Layer";

/// The kind of a design element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Gemstone,
    /// Decorative metal setting drawn beneath a gemstone.
    Bezel,
    Text,
    /// User-uploaded image.
    Custom,
}

impl ElementKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gemstone => "gemstone",
            Self::Bezel => "bezel",
            Self::Text => "text",
            Self::Custom => "custom",
        }
    }

    /// Parse a lowercase kind name.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "gemstone" => Some(Self::Gemstone),
            "bezel" => Some(Self::Bezel),
            "text" => Some(Self::Text),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Which stone a gemstone element depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GemstoneType {
    Diamond,
    Ruby,
    Amethyst,
    Emerald,
    Sapphire,
    Topaz,
    Other,
}

impl GemstoneType {
    pub const ALL: [Self; 7] =
        [Self::Diamond, Self::Ruby, Self::Amethyst, Self::Emerald, Self::Sapphire, Self::Topaz, Self::Other];

    /// Parse a lowercase stone name. Unrecognized names map to `Other`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "diamond" => Self::Diamond,
            "ruby" => Self::Ruby,
            "amethyst" => Self::Amethyst,
            "emerald" => Self::Emerald,
            "sapphire" => Self::Sapphire,
            "topaz" => Self::Topaz,
            _ => Self::Other,
        }
    }

    /// Display name, used as the default layer name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Diamond => "Diamond",
            Self::Ruby => "Ruby",
            Self::Amethyst => "Amethyst",
            Self::Emerald => "Emerald",
            Self::Sapphire => "Sapphire",
            Self::Topaz => "Topaz",
            Self::Other => "Gemstone",
        }
    }

    /// Built-in vector shape and `(fill, stroke)` colors for this stone.
    ///
    /// `Other` has no built-in shape and must be supplied as an image.
    #[must_use]
    pub fn catalogue(self) -> Option<(Geometry, &'static str, &'static str)> {
        let entry = match self {
            Self::Diamond => (
                Geometry::polygon(&[(30.0, 5.0), (45.0, 20.0), (30.0, 55.0), (15.0, 20.0)]),
                "#dddddd",
                "#999999",
            ),
            Self::Ruby => (Geometry::Circle { radius: 20.0 }, "#dc143c", "#b91c2c"),
            Self::Amethyst => (Geometry::Circle { radius: 20.0 }, "#9c27b0", "#6a1b9a"),
            Self::Emerald => (Geometry::Rect { half_width: 15.0, half_height: 15.0 }, "#50cd1e", "#2e7d32"),
            Self::Sapphire => (Geometry::Ellipse { rx: 20.0, ry: 15.0 }, "#007fff", "#005fbf"),
            Self::Topaz => (
                Geometry::polygon(&[
                    (30.0, 8.0),
                    (46.0, 18.0),
                    (46.0, 42.0),
                    (30.0, 52.0),
                    (14.0, 42.0),
                    (14.0, 18.0),
                ]),
                "#ffa500",
                "#e69500",
            ),
            Self::Other => return None,
        };
        Some(entry)
    }
}

/// Edge treatment of a bezel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BezelStyle {
    Plain,
    Serrated,
    Scalloped,
}

impl BezelStyle {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "plain" => Some(Self::Plain),
            "serrated" => Some(Self::Serrated),
            "scalloped" => Some(Self::Scalloped),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Plain => "Plain",
            Self::Serrated => "Serrated",
            Self::Scalloped => "Scalloped",
        }
    }
}

/// Metal a bezel is cast in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BezelMetal {
    Gold,
    Silver,
}

impl BezelMetal {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "gold" => Some(Self::Gold),
            "silver" => Some(Self::Silver),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Gold => "Gold",
            Self::Silver => "Silver",
        }
    }
}

/// A point in element-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Kind-dependent shape descriptor.
///
/// Carries enough to size a bezel without looking at pixels: radii and
/// half-extents for vector stones, natural pixel size for images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum Geometry {
    Polygon { points: Vec<Point> },
    Circle { radius: f64 },
    Rect { half_width: f64, half_height: f64 },
    Ellipse { rx: f64, ry: f64 },
    /// Raster image; `width`/`height` are the decoded natural size.
    Image { src: String, width: f64, height: f64 },
    Text { text: String, font_family: String, font_size: f64 },
}

impl Geometry {
    #[must_use]
    pub fn polygon(points: &[(f64, f64)]) -> Self {
        Self::Polygon { points: points.iter().map(|&(x, y)| Point { x, y }).collect() }
    }

    /// Whether the outline is only known as a raster image.
    #[must_use]
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image { .. })
    }
}

/// Placement of an element on the canvas. Position is the element center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub left: f64,
    pub top: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Clockwise rotation in degrees, in `[0, 360)`.
    pub angle: f64,
    /// In `[0, 1]`.
    pub opacity: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self { left: 0.0, top: 0.0, scale_x: 1.0, scale_y: 1.0, angle: 0.0, opacity: 1.0 }
    }
}

impl Transform {
    #[must_use]
    pub fn at(left: f64, top: f64) -> Self {
        Self { left, top, ..Self::default() }
    }
}

/// Image filter applied when an image-backed element is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Filter {
    /// Row-major 4×5 linear channel transform (`RGBA` rows, last column is bias).
    ColorMatrix { matrix: [f64; 20] },
    Pixelate { block_size: u32 },
    Blur { amount: f64 },
}

/// Paint attributes of an element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bezel_style: Option<BezelStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bezel_metal: Option<BezelMetal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
}

/// A single placeable unit in the design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemstone_type: Option<GemstoneType>,
    pub geometry: Geometry,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub style: Style,
    /// For bezels: the gemstone this bezel decorates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_id: Option<ElementId>,
}

/// Input for a new text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSpec {
    pub text: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_text_color")]
    pub color: String,
}

fn default_font_family() -> String {
    "Arial".to_owned()
}

fn default_font_size() -> f64 {
    24.0
}

fn default_text_color() -> String {
    "#000000".to_owned()
}

impl TextSpec {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_family: default_font_family(),
            font_size: default_font_size(),
            color: default_text_color(),
        }
    }
}

/// Truncate a user-supplied name to the longest kept length.
#[must_use]
pub fn clamp_name(name: &str) -> String {
    name.chars().take(MAX_NAME_CHARS).collect()
}

impl Element {
    /// A catalogue gemstone centered at `(left, top)`. `None` for
    /// [`GemstoneType::Other`], which has no built-in shape.
    #[must_use]
    pub fn gemstone(gemstone: GemstoneType, left: f64, top: f64) -> Option<Self> {
        let (geometry, fill, stroke) = gemstone.catalogue()?;
        Some(Self {
            id: Uuid::new_v4(),
            kind: ElementKind::Gemstone,
            name: gemstone.label().to_owned(),
            gemstone_type: Some(gemstone),
            geometry,
            transform: Transform::at(left, top),
            style: Style {
                fill: Some(fill.to_owned()),
                stroke: Some(stroke.to_owned()),
                stroke_width: 2.0,
                ..Style::default()
            },
            link_id: None,
        })
    }

    /// A text element centered at `(left, top)`, named `"Text: <content>"`.
    #[must_use]
    pub fn text(spec: &TextSpec, left: f64, top: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ElementKind::Text,
            name: clamp_name(&format!("Text: {}", spec.text)),
            gemstone_type: None,
            geometry: Geometry::Text {
                text: spec.text.clone(),
                font_family: spec.font_family.clone(),
                font_size: spec.font_size,
            },
            transform: Transform::at(left, top),
            style: Style { fill: Some(spec.color.clone()), ..Style::default() },
            link_id: None,
        }
    }

    /// Whether this is a gemstone element.
    #[must_use]
    pub fn is_gemstone(&self) -> bool {
        self.kind == ElementKind::Gemstone
    }

    /// Whether this is a bezel linked to `gemstone_id`.
    #[must_use]
    pub fn is_bezel_of(&self, gemstone_id: ElementId) -> bool {
        self.kind == ElementKind::Bezel && self.link_id == Some(gemstone_id)
    }

    /// The name as shown in the layer list.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() { UNNAMED_LAYER } else { &self.name }
    }

    /// A copy with a fresh id, offset down-right and named `"<name> Copy"`.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        let base = if self.name.is_empty() { "Copy" } else { self.name.as_str() };
        let mut copy = self.clone();
        copy.id = Uuid::new_v4();
        copy.name = clamp_name(&format!("{base} Copy"));
        copy.transform.left += DUPLICATE_OFFSET;
        copy.transform.top += DUPLICATE_OFFSET;
        copy
    }
}

//! Scene: the ordered element list and its snapshot format.
//!
//! Paint order is list order: index 0 is drawn first, the last element is
//! drawn on top. The scene enforces id uniqueness and validates property
//! edits. A bezel always sits directly beneath its gemstone: structural
//! edits finish with [`Scene::seat_bezels`], and snapshots that break the
//! rule are refused on load.
//!
//! Snapshots are full serializations (`{ "version", "objects" }`), used by
//! the history buffer and as the `canvas_data` of a saved design.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::color::normalize_hex_color;
use crate::consts::SNAPSHOT_VERSION;
use crate::element::{Element, ElementId, ElementKind, Geometry, clamp_name};
use crate::error::SceneError;

/// A single validated edit to an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Name(String),
    Left(f64),
    Top(f64),
    /// Sets both axes.
    Scale(f64),
    ScaleX(f64),
    ScaleY(f64),
    Angle(f64),
    Opacity(f64),
    Fill(String),
    Stroke(String),
    StrokeWidth(f64),
    /// Text elements only.
    Text(String),
    FontSize(f64),
    FontFamily(String),
}

impl Property {
    /// The wire key for this property.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Left(_) => "left",
            Self::Top(_) => "top",
            Self::Scale(_) => "scale",
            Self::ScaleX(_) => "scaleX",
            Self::ScaleY(_) => "scaleY",
            Self::Angle(_) => "angle",
            Self::Opacity(_) => "opacity",
            Self::Fill(_) => "fill",
            Self::Stroke(_) => "stroke",
            Self::StrokeWidth(_) => "strokeWidth",
            Self::Text(_) => "text",
            Self::FontSize(_) => "fontSize",
            Self::FontFamily(_) => "fontFamily",
        }
    }

    /// Build a property from a key and a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an unknown key or a value of the wrong type.
    pub fn parse(key: &str, value: &serde_json::Value) -> Result<Self, SceneError> {
        let number = |field: &'static str| {
            value.as_f64().ok_or_else(|| SceneError::validation(field, format!("expected a number, got {value}")))
        };
        let string = |field: &'static str| {
            value
                .as_str()
                .map(str::to_owned)
                .ok_or_else(|| SceneError::validation(field, format!("expected a string, got {value}")))
        };
        let prop = match key {
            "name" => Self::Name(string("name")?),
            "left" => Self::Left(number("left")?),
            "top" => Self::Top(number("top")?),
            "scale" => Self::Scale(number("scale")?),
            "scaleX" => Self::ScaleX(number("scaleX")?),
            "scaleY" => Self::ScaleY(number("scaleY")?),
            "angle" => Self::Angle(number("angle")?),
            "opacity" => Self::Opacity(number("opacity")?),
            "fill" => Self::Fill(string("fill")?),
            "stroke" => Self::Stroke(string("stroke")?),
            "strokeWidth" => Self::StrokeWidth(number("strokeWidth")?),
            "text" => Self::Text(string("text")?),
            "fontSize" => Self::FontSize(number("fontSize")?),
            "fontFamily" => Self::FontFamily(string("fontFamily")?),
            other => return Err(SceneError::validation("key", format!("unknown property `{other}`"))),
        };
        Ok(prop)
    }

    /// Whether this edit moves or rotates the element.
    #[must_use]
    pub fn is_placement(&self) -> bool {
        matches!(self, Self::Left(_) | Self::Top(_) | Self::Angle(_))
    }

    /// Whether this edit resizes the element.
    #[must_use]
    pub fn is_scale(&self) -> bool {
        matches!(self, Self::Scale(_) | Self::ScaleX(_) | Self::ScaleY(_))
    }
}

/// Full serialized scene, as stored in history and saved designs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(serde_json::Value);

impl Snapshot {
    /// Snapshot of a scene with no elements.
    #[must_use]
    pub fn empty() -> Self {
        Self(serde_json::json!({ "version": SNAPSHOT_VERSION, "objects": [] }))
    }

    /// Wrap an already-serialized scene (e.g. `canvas_data` from a saved design).
    #[must_use]
    pub fn from_value(value: serde_json::Value) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

#[derive(Serialize)]
struct SnapshotOut<'a> {
    version: u32,
    objects: &'a [Element],
}

#[derive(Deserialize)]
struct SnapshotIn {
    version: u32,
    #[serde(default)]
    objects: Vec<Element>,
}

/// Normalize an angle in degrees to `[0, 360)`.
#[must_use]
pub fn normalize_angle(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round tiny negatives up to exactly 360.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

fn finite(field: &'static str, value: f64) -> Result<f64, SceneError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SceneError::validation(field, format!("{value} is not a finite number")))
    }
}

fn positive(field: &'static str, value: f64) -> Result<f64, SceneError> {
    let value = finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(SceneError::validation(field, format!("{value} must be greater than zero")))
    }
}

fn color(field: &'static str, value: &str) -> Result<String, SceneError> {
    normalize_hex_color(value).ok_or_else(|| SceneError::validation(field, format!("`{value}` is not a hex color")))
}

/// Ordered collection of elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    elements: Vec<Element>,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Elements in paint order (bottom first).
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Insert an element at `at`, or on top when `at` is `None`. Returns the
    /// index it landed at.
    ///
    /// # Errors
    ///
    /// `DuplicateId` if the id is already present; `Validation` if `at` is
    /// past the end.
    pub fn add(&mut self, element: Element, at: Option<usize>) -> Result<usize, SceneError> {
        if self.contains(element.id) {
            return Err(SceneError::DuplicateId(element.id));
        }
        let index = at.unwrap_or(self.elements.len());
        if index > self.elements.len() {
            return Err(SceneError::validation(
                "index",
                format!("{index} is out of range for {} elements", self.elements.len()),
            ));
        }
        self.elements.insert(index, element);
        Ok(index)
    }

    /// Remove an element. Linked bezels are left in place.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is absent.
    pub fn remove(&mut self, id: ElementId) -> Result<Element, SceneError> {
        let index = self.index_of(id)?;
        Ok(self.elements.remove(index))
    }

    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.iter().any(|el| el.id == id)
    }

    /// Paint index of an element.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is absent.
    pub fn index_of(&self, id: ElementId) -> Result<usize, SceneError> {
        self.elements.iter().position(|el| el.id == id).ok_or(SceneError::NotFound(id))
    }

    /// Look up an element by id.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is absent.
    pub fn get(&self, id: ElementId) -> Result<&Element, SceneError> {
        self.elements.iter().find(|el| el.id == id).ok_or(SceneError::NotFound(id))
    }

    fn get_mut(&mut self, id: ElementId) -> Result<&mut Element, SceneError> {
        self.elements.iter_mut().find(|el| el.id == id).ok_or(SceneError::NotFound(id))
    }

    /// Ids of every bezel linked to `gemstone_id`, in paint order.
    #[must_use]
    pub fn bezels_for(&self, gemstone_id: ElementId) -> Vec<ElementId> {
        self.elements.iter().filter(|el| el.is_bezel_of(gemstone_id)).map(|el| el.id).collect()
    }

    /// Apply a validated edit in place. Opacity is clamped to `[0, 1]` and
    /// angles wrap into `[0, 360)`; everything else out of range is rejected
    /// and leaves the element untouched.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is absent, `Validation` for a bad value.
    pub fn set_property(&mut self, id: ElementId, prop: &Property) -> Result<(), SceneError> {
        let el = self.get_mut(id)?;
        match prop {
            Property::Name(name) => el.name = clamp_name(name),
            Property::Left(v) => el.transform.left = finite("left", *v)?,
            Property::Top(v) => el.transform.top = finite("top", *v)?,
            Property::Scale(v) => {
                let scale = positive("scale", *v)?;
                el.transform.scale_x = scale;
                el.transform.scale_y = scale;
            }
            Property::ScaleX(v) => el.transform.scale_x = positive("scaleX", *v)?,
            Property::ScaleY(v) => el.transform.scale_y = positive("scaleY", *v)?,
            Property::Angle(v) => el.transform.angle = normalize_angle(finite("angle", *v)?),
            Property::Opacity(v) => el.transform.opacity = finite("opacity", *v)?.clamp(0.0, 1.0),
            Property::Fill(v) => el.style.fill = Some(color("fill", v)?),
            Property::Stroke(v) => el.style.stroke = Some(color("stroke", v)?),
            Property::StrokeWidth(v) => {
                let width = finite("strokeWidth", *v)?;
                if width < 0.0 {
                    return Err(SceneError::validation("strokeWidth", "must not be negative"));
                }
                el.style.stroke_width = width;
            }
            Property::Text(_) | Property::FontSize(_) | Property::FontFamily(_) => set_text_property(el, prop)?,
        }
        Ok(())
    }

    /// Move an element to `to_index`, keeping everything else in order.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is absent, `Validation` if `to_index` is past the
    /// last element.
    pub fn reorder(&mut self, id: ElementId, to_index: usize) -> Result<(), SceneError> {
        let from = self.index_of(id)?;
        if to_index >= self.elements.len() {
            return Err(SceneError::validation(
                "index",
                format!("{to_index} is out of range for {} elements", self.elements.len()),
            ));
        }
        let el = self.elements.remove(from);
        self.elements.insert(to_index, el);
        Ok(())
    }

    /// Move every linked bezel back to the slot directly beneath its
    /// gemstone. An element dropped between a bezel and its gemstone ends up
    /// beneath the pair. Bezels whose gemstone is gone stay where they are.
    ///
    /// # Errors
    ///
    /// Propagates lookup errors; none occur on a consistent scene.
    pub fn seat_bezels(&mut self) -> Result<(), SceneError> {
        let links: Vec<(ElementId, ElementId)> = self
            .elements
            .iter()
            .filter(|el| el.kind == ElementKind::Bezel)
            .filter_map(|el| el.link_id.map(|gemstone| (el.id, gemstone)))
            .collect();
        for (bezel, gemstone) in links {
            if !self.contains(gemstone) {
                continue;
            }
            let el = self.remove(bezel)?;
            let at = self.index_of(gemstone)?;
            self.elements.insert(at, el);
        }
        Ok(())
    }

    /// Serialize the whole scene.
    ///
    /// # Errors
    ///
    /// `InvalidSnapshot` if serialization fails.
    pub fn to_snapshot(&self) -> Result<Snapshot, SceneError> {
        let value = serde_json::to_value(SnapshotOut { version: SNAPSHOT_VERSION, objects: &self.elements })?;
        Ok(Snapshot(value))
    }

    /// Rebuild a scene from a snapshot.
    ///
    /// # Errors
    ///
    /// `InvalidSnapshot` if the data does not parse, `Validation` for an
    /// unknown version or a misplaced bezel, `DuplicateId` if two elements
    /// share an id.
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, SceneError> {
        let data = SnapshotIn::deserialize(&snapshot.0)?;
        if data.version > SNAPSHOT_VERSION {
            return Err(SceneError::validation("version", format!("unsupported snapshot version {}", data.version)));
        }
        let mut seen = HashSet::with_capacity(data.objects.len());
        for el in &data.objects {
            if !seen.insert(el.id) {
                return Err(SceneError::DuplicateId(el.id));
            }
        }
        check_bezel_links(&data.objects)?;
        Ok(Self { elements: data.objects })
    }
}

/// One bezel per gemstone, each directly beneath the gemstone it links to.
fn check_bezel_links(elements: &[Element]) -> Result<(), SceneError> {
    let mut linked = HashSet::new();
    for (index, el) in elements.iter().enumerate() {
        if el.kind != ElementKind::Bezel {
            continue;
        }
        let Some(gemstone) = el.link_id else {
            return Err(SceneError::validation("linkId", format!("bezel {} is not linked to a gemstone", el.id)));
        };
        if !linked.insert(gemstone) {
            return Err(SceneError::validation("linkId", format!("gemstone {gemstone} has more than one bezel")));
        }
        let above = elements.get(index + 1);
        if !above.is_some_and(|next| next.id == gemstone && next.is_gemstone()) {
            return Err(SceneError::validation(
                "linkId",
                format!("bezel {} is not directly beneath gemstone {gemstone}", el.id),
            ));
        }
    }
    Ok(())
}

fn set_text_property(el: &mut Element, prop: &Property) -> Result<(), SceneError> {
    let Geometry::Text { text, font_family, font_size } = &mut el.geometry else {
        return Err(SceneError::validation("text", format!("`{}` applies to text elements only", prop.key())));
    };
    match prop {
        Property::Text(value) => {
            if value.trim().is_empty() {
                return Err(SceneError::validation("text", "must not be blank"));
            }
            text.clone_from(value);
        }
        Property::FontSize(value) => *font_size = positive("fontSize", *value)?,
        Property::FontFamily(value) => {
            if value.trim().is_empty() {
                return Err(SceneError::validation("fontFamily", "must not be blank"));
            }
            font_family.clone_from(value);
        }
        _ => {}
    }
    Ok(())
}

impl<'a> IntoIterator for &'a Scene {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

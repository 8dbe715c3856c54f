//! Saved design document: the shape handed to a [`DesignStore`](crate::assets::DesignStore).
//!
//! `canvas_data` is the full scene snapshot and is all that is needed to
//! reopen a design. `elements` is a flat per-layer summary for consumers
//! that do not understand the snapshot format.

#[cfg(test)]
#[path = "design_test.rs"]
mod design_test;

use serde::{Deserialize, Serialize};

use crate::element::{ElementKind, Transform};
use crate::error::SceneError;
use crate::scene::{Scene, Snapshot};

/// Name used when a design is saved without one.
pub const UNTITLED_DESIGN: &str = "Untitled Design";

/// Per-layer summary entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub properties: Transform,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignDocument {
    pub name: String,
    pub canvas_data: Snapshot,
    #[serde(default)]
    pub elements: Vec<ElementSummary>,
}

impl DesignDocument {
    /// Build the document for `scene`. A blank name becomes
    /// [`UNTITLED_DESIGN`].
    ///
    /// # Errors
    ///
    /// `InvalidSnapshot` if the scene cannot be serialized.
    pub fn from_scene(name: &str, scene: &Scene) -> Result<Self, SceneError> {
        let name = name.trim();
        let name = if name.is_empty() { UNTITLED_DESIGN } else { name };
        let elements = scene
            .iter()
            .map(|el| ElementSummary { name: el.name.clone(), kind: el.kind, properties: el.transform })
            .collect();
        Ok(Self { name: name.to_owned(), canvas_data: scene.to_snapshot()?, elements })
    }

    /// Rebuild the scene stored in `canvas_data`.
    ///
    /// # Errors
    ///
    /// Any snapshot error from [`Scene::from_snapshot`].
    pub fn scene(&self) -> Result<Scene, SceneError> {
        Scene::from_snapshot(&self.canvas_data)
    }
}

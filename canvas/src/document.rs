//! Document controller: the command API the host UI calls.
//!
//! DESIGN
//! ======
//! The document owns the scene, the history buffer, the selection and the
//! pending bezel choices. Every mutating command runs against a working copy
//! of the scene; only when the edit and its snapshot both succeed is the
//! copy swapped in and the snapshot committed. A rejected command leaves
//! scene and history exactly as they were and commits nothing.
//!
//! Bezels stay glued to their gemstone here: deleting a gemstone deletes
//! its bezel, moving or rotating it moves the bezel, and reordering it
//! carries the bezel along directly beneath.
//!
//! Observers are notified after each successful command with a [`Change`].

#[cfg(test)]
#[path = "document_test.rs"]
mod document_test;

use crate::assets::{
    DesignStore, ExportRequest, ImageLoader, ImageRequest, Rasterizer, ResolvedImage, UploadFile, Uploader,
    validate_upload,
};
use crate::bezel::{self, BezelChoice};
use crate::color::normalize_hex_color;
use crate::config::DocumentConfig;
use crate::design::DesignDocument;
use crate::element::{Element, ElementId, ElementKind, GemstoneType, TextSpec};
use crate::error::{DocumentError, ErrorCode, SceneError};
use crate::history::History;
use crate::scene::{Property, Scene, Snapshot};

/// Notification emitted after a successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    ElementAdded(ElementId),
    ElementRemoved(ElementId),
    ElementUpdated(ElementId),
    Reordered(ElementId),
    BezelAttached { gemstone: ElementId, bezel: ElementId },
    /// The whole scene was replaced (undo, redo, open).
    Restored,
    SelectionChanged(Option<ElementId>),
}

/// Outcome of an undo or redo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved,
    /// Already at the oldest (undo) or newest (redo) entry; nothing changed.
    AtBoundary,
}

type Observer = Box<dyn FnMut(&Change)>;

pub struct Document {
    scene: Scene,
    history: History,
    config: DocumentConfig,
    selection: Option<ElementId>,
    bezel_style: Option<String>,
    bezel_metal: Option<String>,
    observers: Vec<Observer>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DocumentConfig::default())
    }
}

impl Document {
    /// Start an empty document. The empty scene is the first history entry.
    #[must_use]
    pub fn new(config: DocumentConfig) -> Self {
        let mut history = History::new();
        history.commit(Snapshot::empty());
        Self {
            scene: Scene::new(),
            history,
            config,
            selection: None,
            bezel_style: None,
            bezel_metal: None,
            observers: Vec::new(),
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.selection
    }

    /// Look up an element by id.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is absent.
    pub fn element(&self, id: ElementId) -> Result<&Element, DocumentError> {
        Ok(self.scene.get(id)?)
    }

    /// Whether the add-bezel action should be enabled.
    #[must_use]
    pub fn can_add_bezel(&self) -> bool {
        self.selected_gemstone().is_some() && self.pending_choice().is_some()
    }

    // --- Observers ---

    /// Register a callback run after every successful command.
    pub fn subscribe(&mut self, observer: impl FnMut(&Change) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self, change: &Change) {
        for observer in &mut self.observers {
            observer(change);
        }
    }

    // --- Selection and pending bezel choices ---

    /// Select an element.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is absent.
    pub fn select(&mut self, id: ElementId) -> Result<(), DocumentError> {
        self.scene.get(id)?;
        self.set_selection(Some(id));
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.set_selection(None);
    }

    fn set_selection(&mut self, selection: Option<ElementId>) {
        if self.selection != selection {
            self.selection = selection;
            self.notify(&Change::SelectionChanged(selection));
        }
    }

    /// Choose (or clear) the style used by [`add_bezel_to_selection`](Self::add_bezel_to_selection).
    pub fn set_bezel_style(&mut self, style: Option<&str>) {
        self.bezel_style = style.map(str::to_owned);
    }

    /// Choose (or clear) the metal used by [`add_bezel_to_selection`](Self::add_bezel_to_selection).
    pub fn set_bezel_metal(&mut self, metal: Option<&str>) {
        self.bezel_metal = metal.map(str::to_owned);
    }

    fn selected_gemstone(&self) -> Option<ElementId> {
        let id = self.selection?;
        self.scene.get(id).is_ok_and(Element::is_gemstone).then_some(id)
    }

    fn pending_choice(&self) -> Option<BezelChoice> {
        let style = self.bezel_style.as_deref().filter(|s| !s.trim().is_empty())?;
        let metal = self.bezel_metal.as_deref().filter(|m| !m.trim().is_empty())?;
        Some(BezelChoice::resolve(style, metal))
    }

    // --- Commit plumbing ---

    /// Run `edit` on a working copy; swap it in and commit only on success.
    fn commit<T>(
        &mut self,
        op: &'static str,
        edit: impl FnOnce(&mut Scene) -> Result<T, DocumentError>,
    ) -> Result<T, DocumentError> {
        let mut next = self.scene.clone();
        let result = edit(&mut next).and_then(|out| Ok((out, next.to_snapshot()?)));
        match result {
            Ok((out, snapshot)) => {
                self.scene = next;
                self.history.commit(snapshot);
                tracing::debug!(op, elements = self.scene.len(), entries = self.history.len(), "committed");
                Ok(out)
            }
            Err(err) => Err(rejected(op, err)),
        }
    }

    // --- Adding elements ---

    /// Add an element on top (or at `at`) and select it. An `at` that falls
    /// between a bezel and its gemstone places the element beneath the pair.
    ///
    /// # Errors
    ///
    /// `Validation` for bezels, which must go through [`add_bezel`](Self::add_bezel);
    /// `DuplicateId` / `Validation` from the scene.
    pub fn add_element(&mut self, element: Element, at: Option<usize>) -> Result<ElementId, DocumentError> {
        if element.kind == ElementKind::Bezel {
            let err = SceneError::validation("kind", "bezels are attached to a gemstone with add_bezel");
            return Err(rejected("add_element", err.into()));
        }
        let id = element.id;
        self.commit("add_element", |scene| {
            scene.add(element, at)?;
            Ok(scene.seat_bezels()?)
        })?;
        self.notify(&Change::ElementAdded(id));
        self.set_selection(Some(id));
        Ok(id)
    }

    /// Add a catalogue gemstone at the canvas center.
    ///
    /// # Errors
    ///
    /// `Validation` for [`GemstoneType::Other`], which has no built-in shape.
    pub fn add_gemstone(&mut self, gemstone: GemstoneType) -> Result<ElementId, DocumentError> {
        let (left, top) = self.config.center();
        let Some(element) = Element::gemstone(gemstone, left, top) else {
            let err = SceneError::validation("gemstone", "other gemstones are added from an image");
            return Err(rejected("add_gemstone", err.into()));
        };
        self.add_element(element, None)
    }

    /// Add a text element at the canvas center.
    ///
    /// # Errors
    ///
    /// `Validation` for blank text, a bad color or a non-positive font size.
    pub fn add_text(&mut self, spec: &TextSpec) -> Result<ElementId, DocumentError> {
        let checked = validate_text(spec).map_err(|err| rejected("add_text", err.into()))?;
        let (left, top) = self.config.center();
        self.add_element(Element::text(&checked, left, top), None)
    }

    /// Describe an image element to add once its image has loaded.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty source or a kind other than gemstone/custom.
    pub fn image_request(
        &self,
        src: &str,
        name: &str,
        kind: ElementKind,
        gemstone_type: Option<GemstoneType>,
    ) -> Result<ImageRequest, DocumentError> {
        if src.trim().is_empty() {
            return Err(rejected("image_request", SceneError::validation("src", "must not be empty").into()));
        }
        if !matches!(kind, ElementKind::Gemstone | ElementKind::Custom) {
            let err = SceneError::validation("kind", format!("{} elements cannot be images", kind.as_str()));
            return Err(rejected("image_request", err.into()));
        }
        let gemstone_type = match kind {
            ElementKind::Gemstone => Some(gemstone_type.unwrap_or(GemstoneType::Other)),
            _ => None,
        };
        let (left, top) = self.config.center();
        Ok(ImageRequest { src: src.to_owned(), name: name.to_owned(), kind, gemstone_type, left, top })
    }

    /// Insert a loaded image element and select it.
    ///
    /// # Errors
    ///
    /// Scene errors from [`add_element`](Self::add_element).
    pub fn insert_image(&mut self, image: ResolvedImage) -> Result<ElementId, DocumentError> {
        self.add_element(image.element, None)
    }

    /// Load and insert an image in one call. Holds the document while the
    /// load is pending; use [`ImageRequest::resolve`] + [`insert_image`](Self::insert_image)
    /// to keep several loads in flight.
    ///
    /// # Errors
    ///
    /// `AssetLoadFailed` if loading fails; nothing is inserted or committed.
    pub async fn add_image(
        &mut self,
        loader: &dyn ImageLoader,
        request: ImageRequest,
    ) -> Result<ElementId, DocumentError> {
        let image = request.resolve(loader).await?;
        self.insert_image(image)
    }

    /// Upload a user file and describe the custom element for it.
    ///
    /// # Errors
    ///
    /// `Validation` for a non-image extension, `Collaborator` if the upload
    /// fails.
    pub async fn upload_custom(&self, uploader: &dyn Uploader, file: &UploadFile) -> Result<ImageRequest, DocumentError> {
        validate_upload(&file.file_name).map_err(|err| rejected("upload_custom", err.into()))?;
        let uploaded = uploader.upload(file).await;
        let url = uploaded.map_err(|err| rejected("upload_custom", err.into()))?;
        tracing::info!(file = %file.file_name, %url, "upload complete");
        self.image_request(&url, &file.file_name, ElementKind::Custom, None)
    }

    // --- Editing ---

    /// Delete an element. Deleting a gemstone also deletes its bezel.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is absent.
    pub fn delete_element(&mut self, id: ElementId) -> Result<(), DocumentError> {
        let removed = self.commit("delete_element", |scene| {
            let mut removed = scene.bezels_for(id);
            scene.remove(id)?;
            for bezel in &removed {
                scene.remove(*bezel)?;
            }
            removed.insert(0, id);
            Ok(removed)
        })?;
        for gone in &removed {
            self.notify(&Change::ElementRemoved(*gone));
        }
        if self.selection.is_some_and(|sel| removed.contains(&sel)) {
            self.set_selection(None);
        }
        Ok(())
    }

    /// Copy an element on top, offset by (+20, +20), and select the copy.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is absent; `Validation` for bezels, since a copy
    /// would be a second bezel on the same gemstone.
    pub fn duplicate_element(&mut self, id: ElementId) -> Result<ElementId, DocumentError> {
        let source = self.scene.get(id).map_err(|err| rejected("duplicate_element", err.into()))?;
        if source.kind == ElementKind::Bezel {
            let err = SceneError::validation("kind", "bezels cannot be duplicated; duplicate the gemstone instead");
            return Err(rejected("duplicate_element", err.into()));
        }
        let copy = source.duplicate();
        self.add_element(copy, None)
    }

    /// Apply a property edit. Moving or rotating a gemstone moves and
    /// rotates its bezel too. Gemstones and bezels keep their scale, since a
    /// bezel is sized once from its gemstone.
    ///
    /// # Errors
    ///
    /// `NotFound`, or `Validation` for bad values, for placement edits on a
    /// bezel and for scale edits on a gemstone or bezel.
    pub fn set_property(&mut self, id: ElementId, prop: Property) -> Result<(), DocumentError> {
        let followers = self.commit("set_property", |scene| {
            let target = scene.get(id)?;
            if target.kind == ElementKind::Bezel && prop.is_placement() {
                return Err(SceneError::validation(prop.key(), "bezels follow their gemstone").into());
            }
            if matches!(target.kind, ElementKind::Gemstone | ElementKind::Bezel) && prop.is_scale() {
                return Err(SceneError::validation(prop.key(), "gemstone scaling is locked").into());
            }
            let followers = if target.is_gemstone() && prop.is_placement() { scene.bezels_for(id) } else { Vec::new() };
            scene.set_property(id, &prop)?;
            for bezel in &followers {
                scene.set_property(*bezel, &prop)?;
            }
            Ok(followers)
        })?;
        self.notify(&Change::ElementUpdated(id));
        for bezel in followers {
            self.notify(&Change::ElementUpdated(bezel));
        }
        Ok(())
    }

    /// Move an element to `to_index` in paint order. A gemstone takes its
    /// bezel along, which stays directly beneath it; an index between a
    /// bezel and its gemstone lands beneath the pair.
    ///
    /// # Errors
    ///
    /// `NotFound`; `Validation` for an out-of-range index or a bezel.
    pub fn reorder(&mut self, id: ElementId, to_index: usize) -> Result<(), DocumentError> {
        self.commit("reorder", |scene| {
            if scene.get(id)?.kind == ElementKind::Bezel {
                return Err(SceneError::validation("kind", "bezels move with their gemstone").into());
            }
            scene.reorder(id, to_index)?;
            Ok(scene.seat_bezels()?)
        })?;
        self.notify(&Change::Reordered(id));
        Ok(())
    }

    // --- Bezels ---

    /// Attach a bezel to a gemstone, replacing any bezel it already has.
    /// The new bezel paints directly beneath the gemstone.
    ///
    /// # Errors
    ///
    /// `IncompleteBezelConfig` if style or metal is blank, `NotFound` /
    /// `NotAGemstone` for a bad target.
    pub fn add_bezel(&mut self, gemstone_id: ElementId, style: &str, metal: &str) -> Result<ElementId, DocumentError> {
        if style.trim().is_empty() || metal.trim().is_empty() {
            return Err(rejected("add_bezel", DocumentError::IncompleteBezelConfig));
        }
        self.attach_bezel(gemstone_id, BezelChoice::resolve(style, metal))
    }

    /// Attach a bezel to the selected gemstone using the pending style and
    /// metal.
    ///
    /// # Errors
    ///
    /// `NoSelection` if no gemstone is selected, `IncompleteBezelConfig` if
    /// style or metal is unset.
    pub fn add_bezel_to_selection(&mut self) -> Result<ElementId, DocumentError> {
        let Some(gemstone_id) = self.selected_gemstone() else {
            return Err(rejected("add_bezel", DocumentError::NoSelection));
        };
        let Some(choice) = self.pending_choice() else {
            return Err(rejected("add_bezel", DocumentError::IncompleteBezelConfig));
        };
        self.attach_bezel(gemstone_id, choice)
    }

    fn attach_bezel(&mut self, gemstone_id: ElementId, choice: BezelChoice) -> Result<ElementId, DocumentError> {
        let (bezel, removed) = self.commit("add_bezel", |scene| {
            let plan = bezel::plan(scene, gemstone_id, choice)?;
            let removed = plan.remove.clone();
            let bezel = plan.apply(scene)?;
            Ok((bezel, removed))
        })?;
        tracing::info!(gemstone = %gemstone_id, %bezel, style = ?choice.style, metal = ?choice.metal, "bezel attached");
        for gone in removed {
            self.notify(&Change::ElementRemoved(gone));
        }
        self.notify(&Change::BezelAttached { gemstone: gemstone_id, bezel });
        Ok(bezel)
    }

    // --- History ---

    /// Restore the previous history entry and clear the selection.
    ///
    /// # Errors
    ///
    /// Snapshot errors if the stored entry cannot be restored; the cursor is
    /// put back and the scene is untouched.
    pub fn undo(&mut self) -> Result<Step, DocumentError> {
        let restored = match self.history.undo() {
            None => return Ok(Step::AtBoundary),
            Some(snapshot) => Scene::from_snapshot(snapshot),
        };
        match restored {
            Ok(scene) => Ok(self.restore(scene, "undo")),
            Err(err) => {
                self.history.redo();
                Err(rejected("undo", err.into()))
            }
        }
    }

    /// Restore the next history entry and clear the selection.
    ///
    /// # Errors
    ///
    /// Snapshot errors if the stored entry cannot be restored; the cursor is
    /// put back and the scene is untouched.
    pub fn redo(&mut self) -> Result<Step, DocumentError> {
        let restored = match self.history.redo() {
            None => return Ok(Step::AtBoundary),
            Some(snapshot) => Scene::from_snapshot(snapshot),
        };
        match restored {
            Ok(scene) => Ok(self.restore(scene, "redo")),
            Err(err) => {
                self.history.undo();
                Err(rejected("redo", err.into()))
            }
        }
    }

    fn restore(&mut self, scene: Scene, op: &'static str) -> Step {
        self.scene = scene;
        tracing::debug!(op, cursor = ?self.history.cursor(), elements = self.scene.len(), "restored");
        self.set_selection(None);
        self.notify(&Change::Restored);
        Step::Moved
    }

    // --- Persistence and export ---

    /// The saved-design shape for the current scene.
    ///
    /// # Errors
    ///
    /// `InvalidSnapshot` if the scene cannot be serialized.
    pub fn design_document(&self, name: &str) -> Result<DesignDocument, DocumentError> {
        Ok(DesignDocument::from_scene(name, &self.scene)?)
    }

    /// Replace the document with a saved design. History restarts at it.
    ///
    /// # Errors
    ///
    /// Snapshot errors; the current document is kept.
    pub fn open(&mut self, design: &DesignDocument) -> Result<(), DocumentError> {
        let scene = design.scene().map_err(|err| rejected("open", err.into()))?;
        let snapshot = scene.to_snapshot().map_err(|err| rejected("open", err.into()))?;
        self.scene = scene;
        self.history.reset(snapshot);
        tracing::info!(name = %design.name, elements = self.scene.len(), "design opened");
        self.set_selection(None);
        self.notify(&Change::Restored);
        Ok(())
    }

    /// Save the current scene through `store`, returning the design id.
    ///
    /// # Errors
    ///
    /// `Collaborator` if the store fails.
    pub async fn save(&self, store: &dyn DesignStore, name: &str) -> Result<String, DocumentError> {
        let design = self.design_document(name)?;
        let saved = store.save(&design).await;
        let design_id = saved.map_err(|err| rejected("save", err.into()))?;
        tracing::info!(name = %design.name, %design_id, "design saved");
        Ok(design_id)
    }

    /// Rasterize the scene. `multiplier` defaults to the configured export
    /// multiplier.
    ///
    /// # Errors
    ///
    /// `Validation` for a non-positive multiplier, `Collaborator` if the
    /// rasterizer fails.
    pub async fn export(&self, rasterizer: &dyn Rasterizer, multiplier: Option<f64>) -> Result<Vec<u8>, DocumentError> {
        let multiplier = multiplier.unwrap_or(self.config.export_multiplier);
        if !(multiplier.is_finite() && multiplier > 0.0) {
            let err = SceneError::validation("multiplier", format!("{multiplier} must be a positive number"));
            return Err(rejected("export", err.into()));
        }
        let request = ExportRequest {
            snapshot: self.scene.to_snapshot()?,
            canvas_width: self.config.canvas_width,
            canvas_height: self.config.canvas_height,
            multiplier,
        };
        let rendered = rasterizer.rasterize(&request).await;
        let bytes = rendered.map_err(|err| rejected("export", err.into()))?;
        tracing::info!(multiplier, bytes = bytes.len(), "design exported");
        Ok(bytes)
    }
}

/// Log a rejected command once and hand the error back.
fn rejected(op: &'static str, err: DocumentError) -> DocumentError {
    tracing::warn!(op, code = err.error_code(), error = %err, "command rejected");
    err
}

fn validate_text(spec: &TextSpec) -> Result<TextSpec, SceneError> {
    if spec.text.trim().is_empty() {
        return Err(SceneError::validation("text", "must not be blank"));
    }
    if !(spec.font_size.is_finite() && spec.font_size > 0.0) {
        return Err(SceneError::validation("fontSize", format!("{} must be greater than zero", spec.font_size)));
    }
    let color = normalize_hex_color(&spec.color)
        .ok_or_else(|| SceneError::validation("color", format!("`{}` is not a hex color", spec.color)))?;
    Ok(TextSpec { color, ..spec.clone() })
}

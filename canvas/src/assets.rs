//! Collaborator interfaces and the image-backed element flow.
//!
//! The engine does no I/O. Fetching and decoding images, uploading files,
//! rasterizing and storing designs are provided by the host through the
//! traits here.
//!
//! Adding an image element is split in three so the scene is never touched
//! while a load is pending:
//!
//! 1. [`Document::image_request`](crate::document::Document::image_request)
//!    captures what to add (no scene access).
//! 2. [`ImageRequest::resolve`] awaits the [`ImageLoader`] and builds the
//!    element. This is the only suspension point.
//! 3. [`Document::insert_image`](crate::document::Document::insert_image)
//!    inserts and commits atomically.
//!
//! Requests can be resolved concurrently and inserted in whatever order they
//! finish. Dropping a resolved image instead of inserting it is how a stale
//! request is discarded.

#[cfg(test)]
#[path = "assets_test.rs"]
mod assets_test;

use async_trait::async_trait;
use uuid::Uuid;

use crate::consts::{CUSTOM_IMAGE_MAX, GEMSTONE_IMAGE_MAX};
use crate::design::DesignDocument;
use crate::element::{Element, ElementKind, GemstoneType, Geometry, Style, Transform, clamp_name};
use crate::error::{AssetError, DocumentError, SceneError};
use crate::scene::Snapshot;

/// File extensions accepted for custom uploads.
pub const ALLOWED_UPLOAD_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Decoded natural size of an image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageInfo {
    pub width: f64,
    pub height: f64,
}

/// Fetches and decodes an image from a URL or inline `data:` payload.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, src: &str) -> Result<ImageInfo, AssetError>;
}

/// A file picked by the user for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Stores an uploaded file and returns the URL it is served from.
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, file: &UploadFile) -> Result<String, AssetError>;
}

/// Everything a rasterizer needs to draw the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub snapshot: Snapshot,
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Output pixels per canvas unit.
    pub multiplier: f64,
}

/// Renders a scene to PNG bytes.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, request: &ExportRequest) -> Result<Vec<u8>, AssetError>;
}

/// Persists designs and loads them back by id.
#[async_trait]
pub trait DesignStore: Send + Sync {
    async fn save(&self, design: &DesignDocument) -> Result<String, AssetError>;
    async fn load(&self, design_id: &str) -> Result<DesignDocument, AssetError>;
}

/// Reject uploads whose extension is not an accepted image type.
///
/// # Errors
///
/// `Validation` naming the file when the extension is missing or not allowed.
pub fn validate_upload(file_name: &str) -> Result<(), SceneError> {
    let ext = file_name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match ext {
        Some(ext) if ALLOWED_UPLOAD_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(SceneError::validation("file", format!("`{file_name}` is not a png, jpg or gif image"))),
    }
}

/// Scale that fits an image of `info` inside a `max`-sized square.
#[must_use]
pub fn fit_scale(info: ImageInfo, max: f64) -> f64 {
    (max / info.width).min(max / info.height)
}

/// A pending image element: what to add, before the image is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub src: String,
    pub name: String,
    pub kind: ElementKind,
    pub gemstone_type: Option<GemstoneType>,
    /// Canvas point the element will be centered on.
    pub left: f64,
    pub top: f64,
}

/// A loaded image element, ready for [`Document::insert_image`](crate::document::Document::insert_image).
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImage {
    pub(crate) element: Element,
}

impl ResolvedImage {
    #[must_use]
    pub fn element(&self) -> &Element {
        &self.element
    }
}

impl ImageRequest {
    /// Load the image and build its element. Gemstones fit in 60 px,
    /// everything else in 80 px.
    ///
    /// # Errors
    ///
    /// `AssetLoadFailed` if the loader fails or reports an unusable size.
    pub async fn resolve(self, loader: &dyn ImageLoader) -> Result<ResolvedImage, DocumentError> {
        let loaded = loader.load(&self.src).await;
        let info = match loaded {
            Ok(info) => info,
            Err(source) => {
                tracing::warn!(src = %self.src, error = %source, "image load failed");
                return Err(DocumentError::AssetLoadFailed { src: self.src, source });
            }
        };
        if !(info.width.is_finite() && info.height.is_finite() && info.width > 0.0 && info.height > 0.0) {
            let source = AssetError::Decode(format!("unusable image size {}x{}", info.width, info.height));
            return Err(DocumentError::AssetLoadFailed { src: self.src, source });
        }

        let max = if self.kind == ElementKind::Gemstone { GEMSTONE_IMAGE_MAX } else { CUSTOM_IMAGE_MAX };
        let scale = fit_scale(info, max);
        let element = Element {
            id: Uuid::new_v4(),
            kind: self.kind,
            name: clamp_name(&self.name),
            gemstone_type: self.gemstone_type,
            geometry: Geometry::Image { src: self.src, width: info.width, height: info.height },
            transform: Transform { scale_x: scale, scale_y: scale, ..Transform::at(self.left, self.top) },
            style: Style::default(),
            link_id: None,
        };
        tracing::debug!(id = %element.id, scale, "image resolved");
        Ok(ResolvedImage { element })
    }
}

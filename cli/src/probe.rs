//! Local-file [`ImageLoader`] that reads image sizes from file headers.
//!
//! The `image` crate is built with PNG, GIF and JPEG support only, matching
//! the accepted upload types; other formats are reported as unsupported.

#[cfg(test)]
#[path = "probe_test.rs"]
mod probe_test;

use std::io::Cursor;
use std::path::PathBuf;

use async_trait::async_trait;
use image::{ImageError, ImageReader};
use ring_canvas::assets::{ImageInfo, ImageLoader};
use ring_canvas::error::AssetError;

/// Resolves image sources as paths relative to `base`.
pub struct FileImageLoader {
    base: PathBuf,
}

impl FileImageLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

#[async_trait]
impl ImageLoader for FileImageLoader {
    async fn load(&self, src: &str) -> Result<ImageInfo, AssetError> {
        let path = self.base.join(src);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|error| AssetError::Unreachable(format!("{}: {error}", path.display())))?;
        let info = probe_dimensions(&bytes)?;
        tracing::debug!(path = %path.display(), width = info.width, height = info.height, "probed image");
        Ok(info)
    }
}

/// Read the pixel size from an image's header without decoding pixels.
///
/// # Errors
///
/// `Unsupported` for a format that is not recognized or not compiled in,
/// `Decode` for a damaged or truncated header.
pub fn probe_dimensions(bytes: &[u8]) -> Result<ImageInfo, AssetError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|error| AssetError::Decode(error.to_string()))?;
    if reader.format().is_none() {
        return Err(AssetError::Unsupported("not a png, gif or jpeg file".to_owned()));
    }
    let (width, height) = reader.into_dimensions().map_err(|error| match error {
        ImageError::Unsupported(_) => AssetError::Unsupported(error.to_string()),
        _ => AssetError::Decode(error.to_string()),
    })?;
    Ok(ImageInfo { width: f64::from(width), height: f64::from(height) })
}

//! Shared numeric constants for the ring canvas crate.

// ── History ─────────────────────────────────────────────────────

/// Maximum number of snapshots retained by the undo/redo buffer.
pub const HISTORY_LIMIT: usize = 50;

// ── Bezel sizing ────────────────────────────────────────────────

/// Bezel radius for polygon-cut stones (diamond, topaz).
pub const POLYGON_BEZEL_RADIUS: f64 = 30.0;

/// Bezel radius for rectangular stones (emerald).
pub const RECT_BEZEL_RADIUS: f64 = 25.0;

/// Padding added to the measured radius of round and oval stones.
pub const BEZEL_RADIUS_PAD: f64 = 5.0;

/// Scale multiplier applied to image-backed stones, whose outline is unknown.
pub const IMAGE_BEZEL_INFLATION: f64 = 1.12;

/// Pixelate block size for the serrated edge treatment.
pub const SERRATED_BLOCK_SIZE: u32 = 4;

/// Blur amount for the scalloped edge treatment.
pub const SCALLOPED_BLUR: f64 = 0.1;

/// Default stroke width for shape-based bezels.
pub const BEZEL_STROKE_WIDTH: f64 = 3.0;

// ── Placement ───────────────────────────────────────────────────

/// Offset applied to both axes when duplicating an element.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Longest element name kept; longer names are truncated.
pub const MAX_NAME_CHARS: usize = 50;

/// Largest on-canvas edge for an image-backed gemstone, in canvas pixels.
pub const GEMSTONE_IMAGE_MAX: f64 = 60.0;

/// Largest on-canvas edge for any other image element, in canvas pixels.
pub const CUSTOM_IMAGE_MAX: f64 = 80.0;

// ── Canvas ──────────────────────────────────────────────────────

pub const DEFAULT_CANVAS_WIDTH: f64 = 800.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 600.0;

/// Resolution multiplier used for raster export when none is given.
pub const DEFAULT_EXPORT_MULTIPLIER: f64 = 2.0;

/// Version tag written into every scene snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

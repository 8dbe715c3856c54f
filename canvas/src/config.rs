//! Document configuration parsed from environment variables.
//!
//! Only canvas geometry and the export resolution are configurable. The
//! history depth and bezel constants in [`consts`](crate::consts) are fixed.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::consts::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_EXPORT_MULTIPLIER};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Resolution multiplier for raster export.
    pub export_multiplier: f64,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            export_multiplier: DEFAULT_EXPORT_MULTIPLIER,
        }
    }
}

impl DocumentConfig {
    /// Build config from environment variables, falling back to defaults for
    /// anything missing or unparsable.
    ///
    /// Optional:
    /// - `RING_CANVAS_WIDTH`: default 800
    /// - `RING_CANVAS_HEIGHT`: default 600
    /// - `RING_EXPORT_MULTIPLIER`: default 2
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            canvas_width: parse_positive(lookup("RING_CANVAS_WIDTH"), defaults.canvas_width),
            canvas_height: parse_positive(lookup("RING_CANVAS_HEIGHT"), defaults.canvas_height),
            export_multiplier: parse_positive(lookup("RING_EXPORT_MULTIPLIER"), defaults.export_multiplier),
        }
    }

    /// Center of the canvas, where new elements are placed.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.canvas_width / 2.0, self.canvas_height / 2.0)
    }
}

fn parse_positive(raw: Option<String>, default: f64) -> f64 {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(default)
}

//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`process`](crate::process) pipeline (which decides
//! what to render) and the [`backend`](super::backend) (which does the actual
//! pixel work). The separation allows swapping backends (e.g. for testing with
//! a mock) without changing pipeline logic.

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Quality setting for JPEG encoding (1–100). Clamped on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "u32")]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

impl From<u32> for Quality {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

/// Named watermark placement rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    /// Centered on the canvas.
    #[default]
    Center,
    /// Bottom-right corner with a fixed 5 px margin on both edges.
    BottomRight,
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Center => write!(f, "center"),
            Self::BottomRight => write!(f, "bottom-right"),
        }
    }
}

impl FromStr for Anchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "center" => Ok(Self::Center),
            "bottom-right" => Ok(Self::BottomRight),
            _ => Err(format!("unknown anchor: {s} (expected center or bottom-right)")),
        }
    }
}

/// A watermark composite planned by the pipeline: which file, and where.
///
/// Coordinates are signed and never clamped — an oversized watermark lands
/// partially or fully off-canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatermarkOverlay {
    pub path: PathBuf,
    pub x: i64,
    pub y: i64,
}

/// Full specification for one render: decode the source, resample it into a
/// canvas of exactly `width`×`height`, optionally composite a watermark, and
/// encode the canvas as JPEG at `output`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Pre-fill the canvas with opaque white. Required for PNG sources so
    /// transparency is composited over white instead of leaking into JPEG.
    pub white_backdrop: bool,
    pub quality: Quality,
    pub watermark: Option<WatermarkOverlay>,
}

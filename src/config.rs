//! Pipeline configuration: target boxes, watermark, quality, resource limits.
//!
//! [`PrepareConfig`] is plain immutable data. Defaults match the conventional
//! publishing setup: 1920×1920 main box, 320×320 thumbnail box, no watermark,
//! JPEG quality 80, no resource ceilings. A config can also be loaded from a
//! flat TOML file; absent keys keep their defaults.
//!
//! ```toml
//! jpeg_quality = 85
//!
//! [main_box]
//! width = 1600
//! height = 1600
//!
//! [thumb_box]
//! width = 240
//! height = 240
//!
//! [watermark]
//! path = "logo.png"
//! anchor = "bottom-right"
//!
//! [limits]
//! max_memory_mb = 512
//! max_time_secs = 30
//! ```

use crate::imaging::{Anchor, Quality};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// A bounding box the output must fit inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BoxSize {
    pub width: u32,
    pub height: u32,
}

impl BoxSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Watermark source and placement. The file must exist and sniff as PNG at
/// process time; validation is deliberately lazy so a config can be built
/// before the watermark asset does.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WatermarkConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub anchor: Anchor,
}

/// Advisory process-wide ceilings, applied once per `process` call.
///
/// Strongly-typed optionals: present means apply, absent means leave the
/// process alone. Best-effort hints to the OS, not hard deadlines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResourceLimits {
    pub max_memory_mb: Option<u64>,
    pub max_time_secs: Option<u64>,
}

/// Immutable configuration for a [`Preparer`](crate::process::Preparer).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PrepareConfig {
    /// Bounding box for the main output.
    pub main_box: BoxSize,
    /// Bounding box for the thumbnail output, fit independently against the
    /// original source dimensions.
    pub thumb_box: BoxSize,
    /// Optional watermark, composited onto main outputs only.
    pub watermark: Option<WatermarkConfig>,
    pub jpeg_quality: Quality,
    pub limits: ResourceLimits,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            main_box: BoxSize::new(1920, 1920),
            thumb_box: BoxSize::new(320, 320),
            watermark: None,
            jpeg_quality: Quality::default(),
            limits: ResourceLimits::default(),
        }
    }
}

impl PrepareConfig {
    /// Load a config from a TOML file. Missing keys fall back to defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

//! The render pipeline: precondition checks, classification, fit-resize,
//! watermark compositing, JPEG encode, and postcondition verification.
//!
//! [`Preparer::process`] is the sole entry point. Each call is a linear state
//! machine with no branching back:
//!
//! ```text
//! 1. apply resource limits (advisory)
//! 2. preconditions   — source exists, destinations do not
//! 3. classify        — content sniff; only JPEG / PNG / GIF pass
//! 4. main branch     — GIF: byte copy; else fit → resample → watermark → encode
//! 5. thumbnail       — fit against the original source dims, never watermarked
//! 6. postcondition   — outputs must exist on disk, else cleanup + WriteFailed
//! ```
//!
//! Every failure is terminal for the call and returned to the caller; nothing
//! is logged internally and nothing retried. A second call with the same
//! destination deterministically fails with `DestinationExists` rather than
//! overwriting.

use crate::config::{PrepareConfig, WatermarkConfig};
use crate::imaging::{
    BackendError, ImageBackend, RenderParams, RustBackend, SourceFormat, WatermarkOverlay,
    anchor_position, fit_to_box,
};
use crate::limits;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("source is not a regular file: {0}")]
    SourceMissing(PathBuf),
    #[error("destination already exists: {0}")]
    DestinationExists(PathBuf),
    #[error("source type not supported (need JPEG, PNG, or GIF): {0}")]
    UnsupportedSourceType(PathBuf),
    #[error("fit produced an empty {0}x{1} canvas")]
    EmptyCanvas(u32, u32),
    #[error("watermark file not found: {0}")]
    WatermarkMissing(PathBuf),
    #[error("watermark is not PNG: {0}")]
    WatermarkUnsupportedType(PathBuf),
    #[error("output missing after encode (write permission? disk full?): {0}")]
    WriteFailed(PathBuf),
    #[error("imaging failed: {0}")]
    Imaging(#[from] BackendError),
}

/// Non-fatal condition surfaced alongside a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// A watermark was configured but the source is GIF, which is copied
    /// through unmodified. The copy itself still succeeded.
    WatermarkSkippedForGif,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WatermarkSkippedForGif => {
                write!(f, "watermark skipped: GIF sources are copied through unmodified")
            }
        }
    }
}

/// Successful outcome of one `process` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Outcome {
    pub advisory: Option<Advisory>,
}

/// One configured pipeline. Holds no mutable state: `process` may be called
/// repeatedly, sequentially or in parallel across independent file pairs.
pub struct Preparer<B: ImageBackend> {
    config: PrepareConfig,
    backend: B,
}

impl Preparer<RustBackend> {
    pub fn new(config: PrepareConfig) -> Self {
        Self::with_backend(config, RustBackend::new())
    }
}

impl<B: ImageBackend> Preparer<B> {
    pub fn with_backend(config: PrepareConfig, backend: B) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &PrepareConfig {
        &self.config
    }

    /// Prepare one source image: main output at `dest`, and a thumbnail at
    /// `thumb` when requested. At most one attempt per file pair.
    pub fn process(
        &self,
        source: &Path,
        dest: &Path,
        thumb: Option<&Path>,
    ) -> Result<Outcome, ProcessError> {
        limits::apply(&self.config.limits);

        if !source.is_file() {
            return Err(ProcessError::SourceMissing(source.to_path_buf()));
        }
        if dest.exists() {
            return Err(ProcessError::DestinationExists(dest.to_path_buf()));
        }
        if let Some(thumb) = thumb
            && thumb.exists()
        {
            return Err(ProcessError::DestinationExists(thumb.to_path_buf()));
        }

        let format = self
            .backend
            .probe(source)?
            .ok_or_else(|| ProcessError::UnsupportedSourceType(source.to_path_buf()))?;

        // One identify serves both branches: the thumbnail fit is computed
        // from the original source dimensions, never from the resized main.
        let dims = self.backend.identify(source)?;
        let source_dims = (dims.width, dims.height);
        let white_backdrop = format == SourceFormat::Png;

        let mut advisory = None;
        match format {
            SourceFormat::Gif => {
                // GIF is passed through unresized, always — independent of
                // whether a thumbnail was requested.
                self.backend.copy(source, dest)?;
                if self.config.watermark.is_some() {
                    advisory = Some(Advisory::WatermarkSkippedForGif);
                }
            }
            SourceFormat::Jpeg | SourceFormat::Png => {
                let (width, height) = fit_to_box(source_dims, self.config.main_box.as_tuple());
                if width == 0 || height == 0 {
                    return Err(ProcessError::EmptyCanvas(width, height));
                }
                let watermark = match &self.config.watermark {
                    Some(config) => Some(self.plan_watermark(config, (width, height))?),
                    None => None,
                };
                self.backend.render(&RenderParams {
                    source: source.to_path_buf(),
                    output: dest.to_path_buf(),
                    width,
                    height,
                    white_backdrop,
                    quality: self.config.jpeg_quality,
                    watermark,
                })?;
            }
        }

        if let Some(thumb) = thumb {
            let (width, height) = fit_to_box(source_dims, self.config.thumb_box.as_tuple());
            if width == 0 || height == 0 {
                return Err(ProcessError::EmptyCanvas(width, height));
            }
            self.backend.render(&RenderParams {
                source: source.to_path_buf(),
                output: thumb.to_path_buf(),
                width,
                height,
                white_backdrop,
                quality: self.config.jpeg_quality,
                // thumbnails are never watermarked
                watermark: None,
            })?;
        }

        self.verify_outputs(dest, thumb)?;
        Ok(Outcome { advisory })
    }

    /// Validate the configured watermark and compute its placement on the
    /// canvas. The watermark is composited at its intrinsic size, unscaled.
    fn plan_watermark(
        &self,
        config: &WatermarkConfig,
        canvas: (u32, u32),
    ) -> Result<WatermarkOverlay, ProcessError> {
        if !config.path.is_file() {
            return Err(ProcessError::WatermarkMissing(config.path.clone()));
        }
        match self.backend.probe(&config.path)? {
            Some(SourceFormat::Png) => {}
            _ => return Err(ProcessError::WatermarkUnsupportedType(config.path.clone())),
        }
        let dims = self.backend.identify(&config.path)?;
        let (x, y) = anchor_position(canvas, (dims.width, dims.height), config.anchor);
        Ok(WatermarkOverlay {
            path: config.path.clone(),
            x,
            y,
        })
    }

    /// Guard against encodes that fail without reporting (permissions, full
    /// disk): every requested output must physically exist. On failure, any
    /// partially written outputs are deleted best-effort.
    fn verify_outputs(&self, dest: &Path, thumb: Option<&Path>) -> Result<(), ProcessError> {
        let thumb_missing = thumb.is_some_and(|t| !t.is_file());
        if !dest.is_file() || thumb_missing {
            let failed = if !dest.is_file() {
                dest
            } else {
                thumb.expect("thumb missing implies thumb requested")
            };
            let _ = std::fs::remove_file(dest);
            if let Some(thumb) = thumb {
                let _ = std::fs::remove_file(thumb);
            }
            return Err(ProcessError::WriteFailed(failed.to_path_buf()));
        }
        Ok(())
    }
}

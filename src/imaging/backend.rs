//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the four operations the pipeline needs:
//! probe, identify, render, and copy. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording [`MockBackend`](tests::MockBackend).

use super::params::RenderParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("probe failed: {0}")]
    Probe(String),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Raster formats the pipeline accepts, detected by content sniffing —
/// never by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
    Gif,
}

/// Intrinsic pixel dimensions of an image file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// The pipeline decides *what* to do (fit dimensions, watermark placement,
/// output paths); the backend does the pixel work. Keeping the seam here lets
/// pipeline tests run against a mock that records operations instead of
/// decoding images.
pub trait ImageBackend: Sync {
    /// Sniff the format from file content. `Ok(None)` means the file is some
    /// other type the pipeline does not accept.
    fn probe(&self, path: &Path) -> Result<Option<SourceFormat>, BackendError>;

    /// Read intrinsic dimensions without a full decode.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode the source, resample it to the exact canvas size, composite the
    /// planned watermark if any, and encode the canvas as JPEG.
    fn render(&self, params: &RenderParams) -> Result<(), BackendError>;

    /// Byte-for-byte copy of the source (GIF passthrough).
    fn copy(&self, source: &Path, dest: &Path) -> Result<(), BackendError>;
}

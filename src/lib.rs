//! # imageprep
//!
//! Fit-to-box image preparation for publishing pipelines. One call takes a
//! source raster (JPEG, PNG, or GIF), scales it down to fit a bounding box
//! without ever upscaling or cropping, optionally composites a transparent PNG
//! watermark, optionally produces an independent thumbnail, and writes the
//! result(s) as JPEG.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | fit/anchor math, render parameter types, the [`ImageBackend`](imaging::ImageBackend) seam and its `image`-crate implementation |
//! | [`process`] | the pipeline state machine: preconditions → classify → render → verify |
//! | [`config`] | immutable [`PrepareConfig`] with defaults and TOML loading |
//! | [`limits`] | advisory process-wide memory/CPU ceilings (setrlimit, unix) |
//! | [`batch`] | directory batch glue: walk, derive output names, process in parallel |
//!
//! # Design Decisions
//!
//! ## Always JPEG out, GIF passed through
//!
//! Every resized output is JPEG at the configured quality. GIF sources are the
//! exception: they are byte-copied to the destination unmodified (animations
//! survive), and a configured watermark is reported as a non-fatal advisory
//! rather than an error. PNG transparency is composited over an opaque white
//! backdrop before encoding, since JPEG has no alpha.
//!
//! ## Letterbox-fit only, never upscale
//!
//! [`imaging::fit_to_box`] is the sole place aspect ratio is decided. A source
//! smaller than the box is emitted at its native size; the thumbnail fit is
//! computed from the original source dimensions, not from the resized main
//! image.
//!
//! ## No overwrites, verified writes
//!
//! Processing a pair whose destination already exists fails deterministically
//! with `DestinationExists`. After encoding, the pipeline confirms the outputs
//! physically exist and otherwise cleans up partial files and reports
//! `WriteFailed` — silent permission failures never pass as success.
//!
//! # Example
//!
//! ```no_run
//! use imageprep::{PrepareConfig, Preparer};
//! use std::path::Path;
//!
//! let preparer = Preparer::new(PrepareConfig::default());
//! let outcome = preparer.process(
//!     Path::new("in.jpg"),
//!     Path::new("out.jpg"),
//!     Some(Path::new("out_thumb.jpg")),
//! )?;
//! if let Some(advisory) = outcome.advisory {
//!     eprintln!("note: {advisory}");
//! }
//! # Ok::<(), imageprep::ProcessError>(())
//! ```

pub mod batch;
pub mod config;
pub mod imaging;
pub mod limits;
pub mod process;

pub use config::{BoxSize, PrepareConfig, ResourceLimits, WatermarkConfig};
pub use process::{Advisory, Outcome, Preparer, ProcessError};

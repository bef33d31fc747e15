//! Image operations: fit math, watermark placement, and the pixel backend.
//!
//! The module is split into:
//! - **Calculations**: pure functions for dimension math (unit testable)
//! - **Parameters**: data structures describing render work
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`] on the `image` crate

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, SourceFormat};
pub use calculations::{anchor_position, fit_to_box};
pub use params::{Anchor, Quality, RenderParams, WatermarkOverlay};
pub use rust_backend::RustBackend;

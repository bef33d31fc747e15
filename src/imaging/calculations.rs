//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::Anchor;

/// Margin in pixels between a bottom-right anchored watermark and the canvas edges.
const BOTTOM_RIGHT_MARGIN: i64 = 5;

/// Compute the largest dimensions that fit inside a bounding box while
/// preserving the source aspect ratio. Never upscales: a source that already
/// fits on both axes is returned unchanged.
///
/// Scaled dimensions are rounded half-away-from-zero. With extreme aspect
/// ratios and a tiny box a dimension can round to 0 — callers must treat a
/// zero-sized canvas as a terminal error, not proceed with it.
///
/// # Examples
/// ```
/// # use imageprep::imaging::fit_to_box;
/// // Exact ratio match: both scale factors are 0.5
/// assert_eq!(fit_to_box((4000, 3000), (2000, 1500)), (2000, 1500));
///
/// // Width is the binding constraint (k = 0.25)
/// assert_eq!(fit_to_box((4000, 3000), (1000, 1000)), (1000, 750));
/// ```
pub fn fit_to_box(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (box_w, box_h) = bounds;

    if src_w <= box_w && src_h <= box_h {
        return (src_w, src_h);
    }

    let k1 = box_w as f64 / src_w as f64;
    let k2 = box_h as f64 / src_h as f64;
    let k = k1.min(k2);

    // f64::round is half-away-from-zero, which is the rounding the contract asks for.
    (
        (src_w as f64 * k).round() as u32,
        (src_h as f64 * k).round() as u32,
    )
}

/// Top-left position for compositing a watermark onto a canvas.
///
/// The result is deliberately unclamped: a watermark larger than the canvas
/// yields negative coordinates and composites partially or fully off-canvas.
/// That is named, accepted behavior — not an error the caller needs to guard.
pub fn anchor_position(canvas: (u32, u32), watermark: (u32, u32), anchor: Anchor) -> (i64, i64) {
    let (w, h) = (canvas.0 as i64, canvas.1 as i64);
    let (ww, wh) = (watermark.0 as i64, watermark.1 as i64);

    match anchor {
        // div_euclid floors, which matters when the watermark exceeds the canvas
        // and the centered offset goes negative.
        Anchor::Center => ((w - ww).div_euclid(2), (h - wh).div_euclid(2)),
        Anchor::BottomRight => (
            w - ww - BOTTOM_RIGHT_MARGIN,
            h - wh - BOTTOM_RIGHT_MARGIN,
        ),
    }
}

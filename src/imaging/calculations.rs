//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the size of an image scaled to fit a bounding box.
///
/// A single ratio `min(max_w / w, max_h / h)` is applied to both axes so the
/// aspect ratio is preserved exactly. The ratio is not capped at 1: a source
/// smaller than the box is scaled up until one edge touches it. Each output
/// edge is rounded and kept at least one pixel.
///
/// Returns `None` when the source has a zero dimension.
///
/// # Examples
/// ```
/// # use snapshelf::imaging::calculate_fit_dimensions;
/// // 1000x2000 portrait into a 500x500 box → ratio 0.25
/// assert_eq!(calculate_fit_dimensions((1000, 2000), (500, 500)), Some((250, 500)));
/// ```
pub fn calculate_fit_dimensions(source: (u32, u32), bounds: (u32, u32)) -> Option<(u32, u32)> {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;
    if src_w == 0 || src_h == 0 {
        return None;
    }

    let ratio = (max_w as f64 / src_w as f64).min(max_h as f64 / src_h as f64);
    let w = (src_w as f64 * ratio).round().max(1.0) as u32;
    let h = (src_h as f64 * ratio).round().max(1.0) as u32;
    Some((w, h))
}

//! Test data generators for creating synthetic raster bands.
//!
//! These generators create predictable, verifiable patterns so tests can
//! assert exact minima, maxima and distinct value sets.

/// Creates an elevation-like ramp: `base + (row * width + col) * step`.
///
/// The minimum is `base` (top-left) and the maximum is
/// `base + (width * height - 1) * step` (bottom-right).
///
/// # Example
///
/// ```
/// use test_utils::create_ramp_grid;
///
/// let grid = create_ramp_grid(4, 2, 100.0, 0.5);
/// assert_eq!(grid.len(), 8);
/// assert_eq!(grid[0], 100.0);
/// assert_eq!(grid[7], 103.5);
/// ```
pub fn create_ramp_grid(width: usize, height: usize, base: f32, step: f32) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push(base + (row * width + col) as f32 * step);
        }
    }
    data
}

/// Creates a land-cover-like grid cycling through `classes` in row-major order.
///
/// Every class appears at least once when `width * height >= classes.len()`.
pub fn create_category_grid(width: usize, height: usize, classes: &[u8]) -> Vec<u8> {
    if classes.is_empty() {
        return vec![0; width * height];
    }
    (0..width * height)
        .map(|i| classes[i % classes.len()])
        .collect()
}

/// Replaces every `every`-th cell (starting at 0) with `nodata`.
pub fn punch_nodata<T: Copy>(data: &mut [T], every: usize, nodata: T) {
    if every == 0 {
        return;
    }
    for cell in data.iter_mut().step_by(every) {
        *cell = nodata;
    }
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

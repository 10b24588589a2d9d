//! Per-example rectangular crops ("glimpses") from NHWC batches.
//!
//! Each example is cropped around its own center offset. The window's top
//! left corner is `center - size / 2` truncated toward zero, and pixels of
//! the window that fall outside the source image are filled rather than
//! clamped.

use ndarray::{s, Array4};
use serde::{Deserialize, Serialize};

use batchaug_core::{CoreError, Result};

/// A glimpse center in `(row, col)` order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    /// Vertical coordinate.
    pub row: f32,
    /// Horizontal coordinate.
    pub col: f32,
}

impl Offset {
    /// Create an offset.
    #[must_use]
    pub const fn new(row: f32, col: f32) -> Self {
        Self { row, col }
    }
}

/// Value written where a glimpse leaves the source image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum FillMode {
    /// Fill with zeros.
    #[default]
    Zero,
    /// Fill with a constant.
    Constant(f32),
}

impl FillMode {
    fn value(self) -> f32 {
        match self {
            FillMode::Zero => 0.0,
            FillMode::Constant(v) => v,
        }
    }
}

/// How offsets are interpreted.
///
/// | `normalized` | `centered` | offset meaning                          |
/// |--------------|------------|-----------------------------------------|
/// | false        | false      | absolute pixel coordinates              |
/// | false        | true       | pixels relative to the image center     |
/// | true         | false      | fractions of height/width, `[0, 1]`     |
/// | true         | true       | `[-1, 1]` mapped onto the image extent   |
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GlimpseOptions {
    /// Offsets are relative to the image center.
    pub centered: bool,
    /// Offsets are scaled by the image extent.
    pub normalized: bool,
    /// Fill for out-of-bounds pixels.
    pub fill: FillMode,
}

impl GlimpseOptions {
    /// Absolute pixel offsets, zero fill.
    #[must_use]
    pub fn absolute() -> Self {
        Self::default()
    }

    /// Pixel offsets relative to the image center, zero fill.
    #[must_use]
    pub fn centered() -> Self {
        Self {
            centered: true,
            ..Self::default()
        }
    }

    /// Set the fill mode.
    #[must_use]
    pub fn with_fill(mut self, fill: FillMode) -> Self {
        self.fill = fill;
        self
    }

    /// Top-left corner of a `size` window centered on `offset` in an image of
    /// `extent`, both in `(rows, cols)`.
    fn top_left(&self, offset: Offset, extent: (usize, usize), size: (usize, usize)) -> (i64, i64) {
        let (height, width) = (extent.0 as f32, extent.1 as f32);
        let (mut y, mut x) = (offset.row, offset.col);

        if self.normalized {
            y *= height;
            x *= width;
            if self.centered {
                y = y / 2.0 + height / 2.0;
                x = x / 2.0 + width / 2.0;
            }
        } else if self.centered {
            y += height / 2.0;
            x += width / 2.0;
        }

        y -= size.0 as f32 / 2.0;
        x -= size.1 as f32 / 2.0;
        (y as i64, x as i64)
    }
}

/// Crop a `size = (height, width)` window from every example of an NHWC batch.
///
/// `offsets[i]` positions the window for example `i`, so different examples
/// may be cropped at different places in the same call.
///
/// # Errors
///
/// Returns [`CoreError::ShapeMismatch`] if there is not exactly one offset
/// per example.
///
/// # Example
///
/// ```rust
/// use batchaug_transforms::{extract_glimpse, GlimpseOptions, Offset};
/// use ndarray::Array4;
///
/// let images = Array4::from_elem((2, 8, 8, 1), 1.0f32);
/// let offsets = [Offset::new(4.0, 4.0), Offset::new(0.0, 0.0)];
/// let crops = extract_glimpse(&images, (4, 4), &offsets, GlimpseOptions::absolute()).unwrap();
///
/// assert_eq!(crops.dim(), (2, 4, 4, 1));
/// assert!(crops.slice(ndarray::s![0, .., .., ..]).iter().all(|&v| v == 1.0));
/// // The second window hangs off the top-left corner.
/// assert_eq!(crops[[1, 0, 0, 0]], 0.0);
/// assert_eq!(crops[[1, 2, 2, 0]], 1.0);
/// ```
pub fn extract_glimpse(
    images: &Array4<f32>,
    size: (usize, usize),
    offsets: &[Offset],
    options: GlimpseOptions,
) -> Result<Array4<f32>> {
    let (n, height, width, channels) = images.dim();
    if offsets.len() != n {
        return Err(CoreError::ShapeMismatch(format!(
            "{} glimpse offsets for batch of {}",
            offsets.len(),
            n
        )));
    }

    let (glimpse_h, glimpse_w) = size;
    let mut out = Array4::from_elem((n, glimpse_h, glimpse_w, channels), options.fill.value());

    for (i, &offset) in offsets.iter().enumerate() {
        let (top, left) = options.top_left(offset, (height, width), size);

        // Window rows/cols that land inside the source image.
        let r0 = (-top).clamp(0, glimpse_h as i64);
        let r1 = (height as i64 - top).clamp(r0, glimpse_h as i64);
        let c0 = (-left).clamp(0, glimpse_w as i64);
        let c1 = (width as i64 - left).clamp(c0, glimpse_w as i64);
        if r0 == r1 || c0 == c1 {
            continue;
        }

        let src = images.slice(s![
            i,
            (top + r0) as usize..(top + r1) as usize,
            (left + c0) as usize..(left + c1) as usize,
            ..
        ]);
        out.slice_mut(s![i, r0 as usize..r1 as usize, c0 as usize..c1 as usize, ..])
            .assign(&src);
    }

    tracing::trace!(
        batch = n,
        glimpse_h,
        glimpse_w,
        centered = options.centered,
        normalized = options.normalized,
        "extracted glimpses"
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1-channel batch where pixel `(y, x)` of example `i` holds `i*1000 + y*10 + x`.
    fn grid(n: usize, h: usize, w: usize) -> Array4<f32> {
        Array4::from_shape_fn((n, h, w, 1), |(i, y, x, _)| (i * 1000 + y * 10 + x) as f32)
    }

    #[test]
    fn test_absolute_offsets_truncate_toward_zero() {
        let images = grid(1, 8, 8);
        // Center (4, 4), size 3: corner 4 - 1.5 = 2.5 -> 2.
        let crop = extract_glimpse(&images, (3, 3), &[Offset::new(4.0, 4.0)], GlimpseOptions::absolute())
            .unwrap();
        assert_eq!(crop[[0, 0, 0, 0]], 22.0);
        assert_eq!(crop[[0, 2, 2, 0]], 44.0);

        // Corner -0.5 truncates to 0 rather than -1.
        let crop = extract_glimpse(&images, (3, 3), &[Offset::new(1.0, 1.0)], GlimpseOptions::absolute())
            .unwrap();
        assert_eq!(crop[[0, 0, 0, 0]], 0.0);
        assert_eq!(crop[[0, 2, 2, 0]], 22.0);
    }

    #[test]
    fn test_per_example_offsets_are_independent() {
        let images = grid(3, 6, 6);
        let offsets = [Offset::new(1.0, 1.0), Offset::new(3.0, 3.0), Offset::new(5.0, 1.0)];
        let crop = extract_glimpse(&images, (2, 2), &offsets, GlimpseOptions::absolute()).unwrap();

        assert_eq!(crop[[0, 0, 0, 0]], 0.0);
        assert_eq!(crop[[1, 0, 0, 0]], 1022.0);
        assert_eq!(crop[[2, 0, 0, 0]], 2040.0);
        assert_eq!(crop[[2, 1, 1, 0]], 2051.0);
    }

    #[test]
    fn test_out_of_bounds_filled() {
        let images = Array4::from_elem((1, 4, 4, 2), 5.0f32);
        let options = GlimpseOptions::absolute().with_fill(FillMode::Constant(-1.0));
        let crop = extract_glimpse(&images, (4, 4), &[Offset::new(4.0, 0.0)], options).unwrap();

        // Corner (2, -2): window rows 2..4 and cols 0..2 fall outside.
        assert_eq!(crop[[0, 0, 2, 1]], 5.0);
        assert_eq!(crop[[0, 0, 1, 0]], -1.0);
        assert_eq!(crop[[0, 2, 3, 0]], -1.0);
        assert_eq!(crop.iter().filter(|&&v| v == 5.0).count(), 2 * 2 * 2);

        let far = extract_glimpse(&images, (2, 2), &[Offset::new(50.0, 50.0)], GlimpseOptions::absolute())
            .unwrap();
        assert!(far.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_centered_offsets() {
        let images = grid(1, 8, 8);
        let crop = extract_glimpse(&images, (8, 8), &[Offset::new(0.0, 0.0)], GlimpseOptions::centered())
            .unwrap();
        assert_eq!(crop, images);

        let crop = extract_glimpse(&images, (4, 4), &[Offset::new(-2.0, 1.0)], GlimpseOptions::centered())
            .unwrap();
        // Center (2, 5), corner (0, 3).
        assert_eq!(crop[[0, 0, 0, 0]], 3.0);
    }

    #[test]
    fn test_normalized_offsets() {
        let images = grid(1, 8, 8);
        let options = GlimpseOptions {
            normalized: true,
            ..GlimpseOptions::default()
        };
        let crop = extract_glimpse(&images, (2, 2), &[Offset::new(0.5, 0.25)], options).unwrap();
        // Center (4, 2), corner (3, 1).
        assert_eq!(crop[[0, 0, 0, 0]], 31.0);

        let options = GlimpseOptions {
            normalized: true,
            centered: true,
            ..GlimpseOptions::default()
        };
        let crop = extract_glimpse(&images, (2, 2), &[Offset::new(-1.0, 0.0)], options).unwrap();
        // Center (0, 4), corner (-1, 3).
        assert_eq!(crop[[0, 0, 0, 0]], 0.0);
        assert_eq!(crop[[0, 1, 0, 0]], 3.0);
    }

    #[test]
    fn test_zero_sized_glimpse() {
        let images = grid(2, 4, 4);
        let offsets = [Offset::new(0.0, 0.0); 2];
        let crop = extract_glimpse(&images, (0, 3), &offsets, GlimpseOptions::absolute()).unwrap();
        assert_eq!(crop.dim(), (2, 0, 3, 1));
    }

    #[test]
    fn test_offset_count_must_match() {
        let images = grid(2, 4, 4);
        assert!(extract_glimpse(&images, (2, 2), &[Offset::default()], GlimpseOptions::absolute()).is_err());
    }
}

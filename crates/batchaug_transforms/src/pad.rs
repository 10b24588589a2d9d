//! Reflect padding of NHWC image batches.

use ndarray::Array4;

use batchaug_core::{CoreError, Result};

/// Map a possibly out-of-range index into `0..len` by mirroring around the
/// edge pixels, without repeating them.
///
/// `-1` maps to `1` and `len` maps to `len - 2`. Valid for indices at most
/// `len - 1` outside the range on either side.
#[must_use]
pub fn reflect_index(index: i64, len: usize) -> usize {
    let last = len as i64 - 1;
    let mirrored = if index < 0 {
        -index
    } else if index > last {
        2 * last - index
    } else {
        index
    };
    mirrored as usize
}

/// Pad the height and width axes of an NHWC batch by mirroring.
///
/// Every padded pixel copies an existing pixel of the same image and channel,
/// so no new values are introduced.
///
/// # Errors
///
/// Returns [`CoreError::InvalidShape`] if a margin is not smaller than the
/// axis it pads, since reflection would run past the opposite edge.
///
/// # Example
///
/// ```rust
/// use batchaug_transforms::reflect_pad;
/// use ndarray::Array4;
///
/// let images = Array4::from_shape_vec((1, 1, 3, 1), vec![1.0, 2.0, 3.0]).unwrap();
/// let padded = reflect_pad(&images, 0, 2).unwrap();
/// assert_eq!(padded.iter().copied().collect::<Vec<_>>(), vec![3.0, 2.0, 1.0, 2.0, 3.0, 2.0, 1.0]);
/// ```
pub fn reflect_pad(images: &Array4<f32>, pad_h: usize, pad_w: usize) -> Result<Array4<f32>> {
    let (n, h, w, c) = images.dim();

    for (pad, len, axis) in [(pad_h, h, "height"), (pad_w, w, "width")] {
        if pad > 0 && pad >= len {
            return Err(CoreError::InvalidShape {
                expected: format!("{axis} greater than reflect margin {pad}"),
                got: format!("{axis} {len}"),
            });
        }
    }

    let padded = Array4::from_shape_fn((n, h + 2 * pad_h, w + 2 * pad_w, c), |(b, y, x, ch)| {
        let sy = reflect_index(y as i64 - pad_h as i64, h);
        let sx = reflect_index(x as i64 - pad_w as i64, w);
        images[[b, sy, sx, ch]]
    });

    tracing::trace!(pad_h, pad_w, height = h, width = w, "reflect padded batch");
    Ok(padded)
}

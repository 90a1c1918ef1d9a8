//! Arithmetic shared by every Filter2D implementation.
//!
//! For each output pixel `(x, y)` a filter must:
//! 1. accumulate `Σ pixel(x + col - cols/2, y + row - rows/2) * coeff[row][col]` in `i32`,
//!    reading samples outside the image as 0;
//! 2. compute `factor * sum + bias` in `f32` (one multiply, one add, never fused)
//!    and truncate toward zero;
//! 3. clamp the result into `[0, 255]` and store it at `y * stride + x`.
//!
//! The traversal (step 1) is left to each implementation; steps 2 and 3 live here.

use crate::config::Scaling;
use crate::Pixel;

/// Offset of the kernel's center cell, as `(rows / 2, cols / 2)`.
#[inline]
pub fn kernel_origin(rows: usize, cols: usize) -> (usize, usize) {
    (rows / 2, cols / 2)
}

/// Applies factor and bias to an accumulated sum and truncates toward zero.
#[inline]
pub fn normalize(sum: i32, scaling: Scaling) -> i32 {
    let scaled = scaling.factor * sum as f32;
    let raw = scaled + f32::from(scaling.bias);
    // `as` truncates toward zero and saturates at the i32 range.
    raw as i32
}

/// Clamps a normalized value into the 8-bit output range.
#[inline]
pub fn saturate(raw: i32) -> Pixel {
    raw.clamp(0, Pixel::MAX as i32) as Pixel
}

#[inline]
pub fn normalize_and_saturate(sum: i32, scaling: Scaling) -> Pixel {
    saturate(normalize(sum, scaling))
}

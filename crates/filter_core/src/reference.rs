//! Software golden model of the Filter2D contract.

use crate::config::Scaling;
use crate::contract::{kernel_origin, normalize_and_saturate};
use crate::image::StridedImage;
use crate::kernel::CoefficientKernel;

/// Convolves `src` with `kernel` into `dst`, one output pixel at a time.
///
/// `dst` must have the same width and height as `src`; its stride may differ.
/// Padding columns of `dst` are left untouched.
pub fn filter2d_reference(
    kernel: &CoefficientKernel,
    scaling: Scaling,
    src: &StridedImage,
    dst: &mut StridedImage,
) {
    assert!(
        src.same_extent(dst),
        "reference filter needs matching extents: src {}x{}, dst {}x{}",
        src.width(),
        src.height(),
        dst.width(),
        dst.height()
    );

    let width = src.width() as isize;
    let height = src.height() as isize;
    let (origin_row, origin_col) = kernel_origin(kernel.rows(), kernel.cols());

    for y in 0..height {
        for x in 0..width {
            let mut sum = 0i32;
            for row in 0..kernel.rows() {
                let sy = y + row as isize - origin_row as isize;
                for col in 0..kernel.cols() {
                    let sx = x + col as isize - origin_col as isize;
                    // Zero padding: out-of-image samples still contribute, as 0.
                    let pixel = if sx < 0 || sx >= width || sy < 0 || sy >= height {
                        0
                    } else {
                        src.get(sx as usize, sy as usize)
                    };
                    sum += i32::from(pixel) * i32::from(kernel.get(row, col));
                }
            }
            dst.set(x as usize, y as usize, normalize_and_saturate(sum, scaling));
        }
    }
}

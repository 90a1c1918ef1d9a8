//! Row-major 8-bit image plane with an explicit row stride.

use anyhow::{ensure, Context, Result};

use crate::Pixel;

/// Single-channel image whose rows start `stride` samples apart.
///
/// The buffer holds exactly `stride * height` samples. Samples in columns
/// `width..stride` are padding and carry no image content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StridedImage {
    width: usize,
    height: usize,
    stride: usize,
    data: Vec<Pixel>,
}

impl StridedImage {
    /// Allocates a zeroed image, failing instead of aborting if the buffer cannot be reserved.
    pub fn new(width: usize, height: usize, stride: usize) -> Result<Self> {
        let len = checked_len(width, height, stride)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .with_context(|| format!("failed to allocate {len} bytes for a {width}x{height} image"))?;
        data.resize(len, 0);
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    /// Builds a tightly packed image from logical rows, then re-lays it at `stride`.
    pub fn from_rows(width: usize, height: usize, stride: usize, rows: &[Pixel]) -> Result<Self> {
        ensure!(
            rows.len() == width * height,
            "expected {} logical samples, got {}",
            width * height,
            rows.len()
        );
        let mut image = Self::new(width, height, stride)?;
        for (y, row) in rows.chunks_exact(width.max(1)).enumerate().take(height) {
            image.row_mut(y).copy_from_slice(row);
        }
        Ok(image)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Total buffer size in bytes, padding included.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    pub fn as_bytes(&self) -> &[Pixel] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [Pixel] {
        &mut self.data
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Pixel {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.stride + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: Pixel) {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.stride + x] = value;
    }

    /// Logical samples of row `y` (padding excluded).
    pub fn row(&self, y: usize) -> &[Pixel] {
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [Pixel] {
        let start = y * self.stride;
        &mut self.data[start..start + self.width]
    }

    /// Fills every sample, padding included.
    pub fn fill(&mut self, value: Pixel) {
        self.data.fill(value);
    }

    /// True when `other` has the same logical width and height.
    pub fn same_extent(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height
    }
}

fn checked_len(width: usize, height: usize, stride: usize) -> Result<usize> {
    ensure!(width > 0 && height > 0, "image dimensions must be positive ({width}x{height})");
    ensure!(
        stride >= width,
        "stride {stride} is smaller than image width {width}"
    );
    stride
        .checked_mul(height)
        .with_context(|| format!("image size overflows usize ({stride}x{height})"))
}

//! Coefficient kernels and their padded, flattened transfer representation.

use anyhow::{ensure, Result};

use crate::{Coefficient, Pixel};

/// Default kernel height used by the harness.
pub const DEFAULT_KERNEL_ROWS: usize = 15;
/// Default kernel width used by the harness.
pub const DEFAULT_KERNEL_COLS: usize = 15;
/// Flattened kernels handed to an accelerator are padded to this many bytes.
pub const KERNEL_PAD_ALIGN: usize = 64;
/// Largest cell count for which any coefficient mix keeps `255 * Σ|coeff|` within `i32`.
pub const MAX_KERNEL_CELLS: usize = i32::MAX as usize / (Pixel::MAX as usize * 128);

/// Dense `rows x cols` grid of signed weights, stored row-major.
///
/// Both sides are odd so the window has a center cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoefficientKernel {
    rows: usize,
    cols: usize,
    coeffs: Vec<Coefficient>,
}

impl CoefficientKernel {
    pub fn new(rows: usize, cols: usize, coeffs: Vec<Coefficient>) -> Result<Self> {
        check_extent(rows, cols)?;
        ensure!(
            coeffs.len() == rows * cols,
            "kernel of {rows}x{cols} needs {} coefficients, got {}",
            rows * cols,
            coeffs.len()
        );
        let kernel = Self { rows, cols, coeffs };
        ensure!(
            kernel.accumulator_bound() <= i64::from(i32::MAX),
            "{rows}x{cols} kernel can accumulate up to {}, beyond the i32 accumulator",
            kernel.accumulator_bound()
        );
        Ok(kernel)
    }

    /// Kernel with every cell set to `value`.
    pub fn filled(rows: usize, cols: usize, value: Coefficient) -> Result<Self> {
        Self::new(rows, cols, vec![value; rows * cols])
    }

    /// All-ones box kernel; pair it with [`crate::Scaling::averaging`] for a blur.
    pub fn box_filter(rows: usize, cols: usize) -> Result<Self> {
        Self::filled(rows, cols, 1)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of logical cells (`rows * cols`).
    pub fn cell_count(&self) -> usize {
        self.coeffs.len()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Coefficient {
        self.coeffs[row * self.cols + col]
    }

    pub fn coefficients(&self) -> &[Coefficient] {
        &self.coeffs
    }

    /// `Σ|coeff|`.
    pub fn abs_sum(&self) -> i64 {
        self.coeffs.iter().map(|&c| i64::from(c).abs()).sum()
    }

    /// Largest accumulator magnitude any image can produce, `255 * Σ|coeff|`.
    pub fn accumulator_bound(&self) -> i64 {
        i64::from(Pixel::MAX) * self.abs_sum()
    }

    /// Flattens the kernel and zero-pads it to [`KERNEL_PAD_ALIGN`] bytes.
    pub fn padded(&self) -> PaddedKernel {
        let mut bytes = vec![0; padded_len(self.coeffs.len())];
        bytes[..self.coeffs.len()].copy_from_slice(&self.coeffs);
        PaddedKernel {
            rows: self.rows,
            cols: self.cols,
            bytes,
        }
    }
}

/// Flattened row-major kernel followed by padding bytes that are never read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedKernel {
    rows: usize,
    cols: usize,
    bytes: Vec<Coefficient>,
}

impl PaddedKernel {
    /// Adopts an already padded buffer. Whatever sits past `rows * cols` is ignored.
    pub fn from_raw(rows: usize, cols: usize, bytes: Vec<Coefficient>) -> Result<Self> {
        check_extent(rows, cols)?;
        // Coefficients are opaque here, so bound the worst case of every cell at -128.
        ensure!(
            rows.checked_mul(cols).is_some_and(|cells| cells <= MAX_KERNEL_CELLS),
            "padded kernel of {rows}x{cols} exceeds {MAX_KERNEL_CELLS} cells"
        );
        ensure!(
            bytes.len() >= rows * cols,
            "padded kernel holds {} bytes, needs at least {}",
            bytes.len(),
            rows * cols
        );
        ensure!(
            bytes.len() % KERNEL_PAD_ALIGN == 0,
            "padded kernel length {} is not a multiple of {KERNEL_PAD_ALIGN}",
            bytes.len()
        );
        Ok(Self { rows, cols, bytes })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Coefficient {
        debug_assert!(row < self.rows && col < self.cols);
        self.bytes[row * self.cols + col]
    }

    /// Full buffer, padding included.
    pub fn as_bytes(&self) -> &[Coefficient] {
        &self.bytes
    }

    /// Reinterprets the buffer as raw bytes for upload.
    pub fn as_raw_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.bytes)
    }
}

/// Smallest multiple of [`KERNEL_PAD_ALIGN`] that holds `cells` bytes.
pub fn padded_len(cells: usize) -> usize {
    cells.div_ceil(KERNEL_PAD_ALIGN).max(1) * KERNEL_PAD_ALIGN
}

fn check_extent(rows: usize, cols: usize) -> Result<()> {
    ensure!(
        rows % 2 == 1 && cols % 2 == 1,
        "kernel sides must be odd and non-zero, got {rows}x{cols}"
    );
    Ok(())
}

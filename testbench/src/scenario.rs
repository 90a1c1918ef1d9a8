//! Configure and generate stages: image geometry and synthetic inputs.

use anyhow::{Context, Result};
use filter_core::{CoefficientKernel, PaddedKernel, Scaling, StridedImage};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::HarnessSettings;

/// Row alignment the accelerator expects, in samples.
pub const STRIDE_ALIGN: usize = 64;

/// Derived image layout for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageGeometry {
    pub width: usize,
    pub height: usize,
    pub stride: usize,
    pub bytes: usize,
}

impl ImageGeometry {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let stride = derive_stride(width);
        let bytes = stride
            .checked_mul(height)
            .with_context(|| format!("image of {stride}x{height} bytes overflows usize"))?;
        Ok(Self {
            width,
            height,
            stride,
            bytes,
        })
    }

    /// Zeroed image with this geometry.
    pub fn allocate(&self) -> Result<StridedImage> {
        StridedImage::new(self.width, self.height, self.stride)
    }
}

/// Smallest multiple of [`STRIDE_ALIGN`] that is at least `width`.
pub fn derive_stride(width: usize) -> usize {
    width.div_ceil(STRIDE_ALIGN) * STRIDE_ALIGN
}

/// Inputs shared by both filter paths.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub geometry: ImageGeometry,
    pub source: StridedImage,
    pub kernel: CoefficientKernel,
    pub padded_kernel: PaddedKernel,
    pub scaling: Scaling,
}

/// Fills the source with seeded byte noise and builds the averaging box kernel.
pub fn generate_inputs(settings: &HarnessSettings) -> Result<Inputs> {
    settings.validate()?;
    let geometry = ImageGeometry::new(settings.width, settings.height)?;

    let mut source = geometry.allocate().context("failed to allocate source image")?;
    let mut rng = ChaCha8Rng::seed_from_u64(settings.seed);
    rng.fill(source.as_bytes_mut());

    let kernel = CoefficientKernel::box_filter(settings.kernel_rows, settings.kernel_cols)
        .context("invalid kernel dimensions")?;
    let padded_kernel = kernel.padded();
    let scaling = Scaling::averaging(&kernel);

    Ok(Inputs {
        geometry,
        source,
        kernel,
        padded_kernel,
        scaling,
    })
}

//! Call contract between the harness and an accelerated Filter2D implementation.

use anyhow::{ensure, Context, Result};

use crate::config::Scaling;
use crate::image::StridedImage;
use crate::kernel::PaddedKernel;

/// Arguments of one accelerated filter invocation, narrowed to the device's field widths.
#[derive(Debug, Clone, Copy)]
pub struct FilterCall<'a> {
    pub kernel: &'a PaddedKernel,
    pub factor: f32,
    pub bias: i16,
    pub width: u16,
    pub height: u16,
    pub stride: u16,
}

impl<'a> FilterCall<'a> {
    /// Describes a run over images shaped like `image`. Fails if any extent exceeds 16 bits.
    pub fn for_image(kernel: &'a PaddedKernel, scaling: Scaling, image: &StridedImage) -> Result<Self> {
        Ok(Self {
            kernel,
            factor: scaling.factor,
            bias: scaling.bias,
            width: narrow(image.width(), "width")?,
            height: narrow(image.height(), "height")?,
            stride: narrow(image.stride(), "stride")?,
        })
    }

    pub fn scaling(&self) -> Scaling {
        Scaling::new(self.factor, self.bias)
    }

    /// Bytes each of the source and destination buffers must hold.
    pub fn buffer_len(&self) -> usize {
        usize::from(self.stride) * usize::from(self.height)
    }

    /// Checks buffer sizes and geometry before an implementation touches memory.
    pub fn validate(&self, src: &[u8], dst: &[u8]) -> Result<()> {
        ensure!(
            self.width > 0 && self.height > 0,
            "filter call needs a non-empty image ({}x{})",
            self.width,
            self.height
        );
        ensure!(
            self.stride >= self.width,
            "stride {} is smaller than width {}",
            self.stride,
            self.width
        );
        let needed = self.buffer_len();
        ensure!(
            src.len() >= needed,
            "source buffer holds {} bytes, call needs {needed}",
            src.len()
        );
        ensure!(
            dst.len() >= needed,
            "destination buffer holds {} bytes, call needs {needed}",
            dst.len()
        );
        Ok(())
    }
}

/// An implementation of the Filter2D contract behind the accelerator call interface.
///
/// `filter2d` is blocking: `dst` is fully populated once it returns `Ok`.
pub trait Accelerator {
    /// Short label used in logs and reports.
    fn name(&self) -> &str;

    fn filter2d(&mut self, call: &FilterCall<'_>, src: &[u8], dst: &mut [u8]) -> Result<()>;
}

impl<A: Accelerator + ?Sized> Accelerator for Box<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn filter2d(&mut self, call: &FilterCall<'_>, src: &[u8], dst: &mut [u8]) -> Result<()> {
        (**self).filter2d(call, src, dst)
    }
}

fn narrow(value: usize, what: &str) -> Result<u16> {
    u16::try_from(value)
        .with_context(|| format!("image {what} {value} does not fit the accelerator's 16-bit field"))
}

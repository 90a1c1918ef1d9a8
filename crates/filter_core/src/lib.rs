//! Core Filter2D domain logic that stays independent of GPU backends and the harness.
//!
//! This crate hosts:
//! - strided 8-bit images and signed coefficient kernels
//! - the convolution contract shared by every filter implementation
//! - the software reference filter (golden model)
//! - the accelerator call contract and its GPU-facing parameter layout
//! - output comparison helpers used to reach a pass/fail verdict

pub mod accel;
pub mod config;
pub mod contract;
pub mod gpu;
pub mod image;
pub mod kernel;
pub mod metrics;
pub mod reference;

/// Sample type stored in every image plane.
pub type Pixel = u8;

/// Signed weight type stored in every coefficient kernel.
pub type Coefficient = i8;

pub use accel::{Accelerator, FilterCall};
pub use config::Scaling;
pub use image::StridedImage;
pub use kernel::{CoefficientKernel, PaddedKernel};
pub use metrics::{compare_images, Comparison, PixelMismatch, Verdict};
pub use reference::filter2d_reference;

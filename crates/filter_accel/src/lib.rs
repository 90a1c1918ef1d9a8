//! Accelerated implementations of the Filter2D call contract.
//!
//! - [`GpuFilter`] dispatches `filter2d.wgsl` through `wgpu`.
//! - [`LineBufferFilter`] streams pixels through line buffers and a sliding
//!   window the way a dataflow accelerator does, on the CPU.

pub mod gpu;
pub mod line_buffer;

pub use gpu::GpuFilter;
pub use line_buffer::LineBufferFilter;

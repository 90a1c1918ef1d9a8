//! Centralized storage for WGSL shader sources used by the accelerated filter.

pub mod compute {
    /// Strided 8-bit 2D convolution, one output word per invocation.
    pub const FILTER2D: &str = include_str!("kernels/filter2d.wgsl");
    pub const FILTER2D_ENTRY: &str = "filter2d_main";
    /// Must match `@workgroup_size` in `filter2d.wgsl`.
    pub const FILTER2D_WORKGROUP_SIZE: u32 = 64;
}

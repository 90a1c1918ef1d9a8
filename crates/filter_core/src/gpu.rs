//! GPU-facing data layouts shared between host code and the WGSL kernel.

use crate::accel::FilterCall;

/// Uniform block consumed by `filter2d.wgsl` (16-byte aligned, 32 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Filter2dParams {
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub kernel_rows: u32,
    pub kernel_cols: u32,
    /// Workgroups along x; the shader folds the 2D dispatch back into one word index.
    pub groups_x: u32,
    pub bias: i32,
    pub factor: f32,
}

const _: () = assert!(core::mem::size_of::<Filter2dParams>() == 32);

impl Filter2dParams {
    pub fn from_call(call: &FilterCall<'_>, groups_x: u32) -> Self {
        Self {
            width: u32::from(call.width),
            height: u32::from(call.height),
            stride: u32::from(call.stride),
            kernel_rows: call.kernel.rows() as u32,
            kernel_cols: call.kernel.cols() as u32,
            groups_x,
            bias: i32::from(call.bias),
            factor: call.factor,
        }
    }
}

/// Packs bytes little-endian into `u32` words, zero-filling the last word.
///
/// WGSL storage buffers have no 8-bit element type, so images and kernels travel as words.
pub fn pack_words(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks(4)
        .map(|chunk| {
            let mut word = [0u8; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            u32::from_le_bytes(word)
        })
        .collect()
}

/// Inverse of [`pack_words`]; writes as many bytes as `out` holds.
pub fn unpack_words(words: &[u32], out: &mut [u8]) {
    for (chunk, word) in out.chunks_mut(4).zip(words) {
        let bytes = word.to_le_bytes();
        chunk.copy_from_slice(&bytes[..chunk.len()]);
    }
}

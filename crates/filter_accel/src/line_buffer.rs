//! Streaming line-buffer implementation of the Filter2D accelerator.
//!
//! Pixels enter one at a time in raster order. Each column of the line buffer
//! keeps the last `rows` samples seen in that column; the sliding window keeps
//! the last `cols` line-buffer columns. Once the stream has advanced half a
//! kernel past an output pixel, the window is centred on it and the pixel is
//! emitted. The stream runs `rows / 2` lines and `cols / 2` columns past the
//! image so the bottom and right borders drain, feeding zeros there. The line
//! buffer starts zeroed and the window is cleared at each line start, which
//! covers the top and left borders.

use anyhow::Result;
use filter_core::{contract::normalize_and_saturate, Accelerator, FilterCall, PaddedKernel};

/// CPU model of a dataflow filter core; allocates its buffers per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineBufferFilter;

impl LineBufferFilter {
    pub fn new() -> Self {
        Self
    }
}

impl Accelerator for LineBufferFilter {
    fn name(&self) -> &str {
        "line-buffer"
    }

    fn filter2d(&mut self, call: &FilterCall<'_>, src: &[u8], dst: &mut [u8]) -> Result<()> {
        call.validate(src, dst)?;
        let mut stream = Stream::new(call);
        stream.run(call, src, dst);
        Ok(())
    }
}

struct Stream<'k> {
    kernel: &'k PaddedKernel,
    rows: usize,
    cols: usize,
    half_rows: usize,
    half_cols: usize,
    /// `rows` lines of `width + half_cols` samples; line `rows - 1` is the newest.
    lines: Vec<Vec<u8>>,
    /// `rows x cols` samples, row-major; column `cols - 1` is the newest.
    window: Vec<u8>,
}

impl<'k> Stream<'k> {
    fn new(call: &FilterCall<'k>) -> Self {
        let rows = call.kernel.rows();
        let cols = call.kernel.cols();
        let half_cols = cols / 2;
        let line_len = usize::from(call.width) + half_cols;
        Self {
            kernel: call.kernel,
            rows,
            cols,
            half_rows: rows / 2,
            half_cols,
            lines: vec![vec![0; line_len]; rows],
            window: vec![0; rows * cols],
        }
    }

    fn run(&mut self, call: &FilterCall<'_>, src: &[u8], dst: &mut [u8]) {
        let width = usize::from(call.width);
        let height = usize::from(call.height);
        let stride = usize::from(call.stride);
        let scaling = call.scaling();

        for sy in 0..height + self.half_rows {
            self.window.fill(0);
            for sx in 0..width + self.half_cols {
                let incoming = if sx < width && sy < height {
                    src[sy * stride + sx]
                } else {
                    0
                };
                self.push_column(sx, incoming);

                if sx >= self.half_cols && sy >= self.half_rows {
                    let (ox, oy) = (sx - self.half_cols, sy - self.half_rows);
                    dst[oy * stride + ox] = normalize_and_saturate(self.window_sum(), scaling);
                }
            }
        }
    }

    /// Shifts `sample` into line-buffer column `sx`, then shifts that column into the window.
    fn push_column(&mut self, sx: usize, sample: u8) {
        for line in 0..self.rows - 1 {
            self.lines[line][sx] = self.lines[line + 1][sx];
        }
        self.lines[self.rows - 1][sx] = sample;

        for row in 0..self.rows {
            let base = row * self.cols;
            self.window.copy_within(base + 1..base + self.cols, base);
            self.window[base + self.cols - 1] = self.lines[row][sx];
        }
    }

    fn window_sum(&self) -> i32 {
        let mut sum = 0i32;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let pixel = self.window[row * self.cols + col];
                sum += i32::from(pixel) * i32::from(self.kernel.get(row, col));
            }
        }
        sum
    }
}

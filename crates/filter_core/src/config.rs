//! Scaling parameters applied to every output pixel after accumulation.

use serde::{Deserialize, Serialize};

use crate::kernel::CoefficientKernel;

/// Multiplicative factor and additive bias of the normalization step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scaling {
    pub factor: f32,
    pub bias: i16,
}

impl Scaling {
    pub fn new(factor: f32, bias: i16) -> Self {
        Self { factor, bias }
    }

    /// `factor = 1 / (rows * cols)`, `bias = 0`: turns a box kernel into an average.
    pub fn averaging(kernel: &CoefficientKernel) -> Self {
        let cells = kernel.cell_count() as f64;
        Self {
            factor: (1.0 / cells) as f32,
            bias: 0,
        }
    }
}

impl Default for Scaling {
    fn default() -> Self {
        Self {
            factor: 1.0,
            bias: 0,
        }
    }
}

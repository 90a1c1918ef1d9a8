//! Comparison of accelerated output against the reference output.

use serde::{Deserialize, Serialize};

use crate::image::StridedImage;
use crate::Pixel;

/// First logical pixel where the two outputs disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelMismatch {
    pub x: usize,
    pub y: usize,
    pub expected: Pixel,
    pub actual: Pixel,
}

/// Result of scanning every logical pixel of two equally sized images.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub compared: usize,
    pub mismatches: usize,
    pub first_mismatch: Option<PixelMismatch>,
    pub max_abs_diff: u8,
}

impl Comparison {
    pub fn verdict(&self) -> Verdict {
        if self.mismatches == 0 {
            Verdict::Match
        } else {
            Verdict::Mismatch
        }
    }
}

/// Pass/fail outcome of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Match,
    Mismatch,
}

impl Verdict {
    pub fn is_match(self) -> bool {
        matches!(self, Verdict::Match)
    }

    /// Process exit status: 0 on match, 1 on mismatch.
    pub fn exit_code(self) -> u8 {
        match self {
            Verdict::Match => 0,
            Verdict::Mismatch => 1,
        }
    }
}

/// Compares `actual` against `expected` over `width x height`, ignoring stride padding.
///
/// The scan always covers the whole image so the mismatch count is exact.
pub fn compare_images(expected: &StridedImage, actual: &StridedImage) -> Comparison {
    assert!(
        expected.same_extent(actual),
        "cannot compare a {}x{} image with a {}x{} image",
        expected.width(),
        expected.height(),
        actual.width(),
        actual.height()
    );

    let mut result = Comparison::default();
    for y in 0..expected.height() {
        for (x, (&lhs, &rhs)) in expected.row(y).iter().zip(actual.row(y)).enumerate() {
            result.compared += 1;
            if lhs != rhs {
                result.mismatches += 1;
                result.max_abs_diff = result.max_abs_diff.max(lhs.abs_diff(rhs));
                if result.first_mismatch.is_none() {
                    result.first_mismatch = Some(PixelMismatch {
                        x,
                        y,
                        expected: lhs,
                        actual: rhs,
                    });
                }
            }
        }
    }
    result
}

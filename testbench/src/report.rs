//! Console report: image info block, stage lines and the colored verdict.

use std::io::{self, Write};

use filter_core::Verdict;

use crate::harness::RunOutcome;
use crate::scenario::ImageGeometry;

pub const RESET: &str = "\x1b[0m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

const RULE: &str =
    "----------------------------------------------------------------------------";

pub const PASS_MESSAGE: &str = "Test PASSED: Output matches reference";
pub const FAIL_MESSAGE: &str = "Test FAILED: Output has mismatches with reference";

pub fn write_header(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "Testbench for the 2D Filter accelerator")
}

pub fn write_image_info(out: &mut dyn Write, geometry: &ImageGeometry) -> io::Result<()> {
    writeln!(out, "Image info")?;
    writeln!(out, "- Width     : {:>10}", geometry.width)?;
    writeln!(out, "- Height    : {:>10}", geometry.height)?;
    writeln!(out, "- Stride    : {:>10}", geometry.stride)?;
    writeln!(out, "- Bytes     : {:>10}", geometry.bytes)
}

pub fn write_verdict(out: &mut dyn Write, outcome: &RunOutcome) -> io::Result<()> {
    match outcome.verdict() {
        Verdict::Match => writeln!(out, "{GREEN}{PASS_MESSAGE}{RESET}")?,
        Verdict::Mismatch => {
            let comparison = &outcome.comparison;
            writeln!(out, "{RED}{FAIL_MESSAGE}{RESET}")?;
            writeln!(
                out,
                "- Mismatches: {:>10} of {} pixels (max |diff| {})",
                comparison.mismatches, comparison.compared, comparison.max_abs_diff
            )?;
            if let Some(first) = comparison.first_mismatch {
                writeln!(
                    out,
                    "- First     : ({}, {}) expected {} got {}",
                    first.x, first.y, first.expected, first.actual
                )?;
            }
        }
    }
    writeln!(out, "{RULE}")
}

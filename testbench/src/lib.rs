//! Verification harness that checks an accelerated Filter2D against the software reference.
//!
//! The pipeline is linear: configure, generate inputs, run the accelerator once,
//! run the reference once, compare every logical pixel, report the verdict.

pub mod config;
pub mod harness;
pub mod report;
pub mod scenario;

pub use config::{Backend, HarnessSettings};
pub use harness::{open_accelerator, run, run_with, RunOutcome};
pub use scenario::{derive_stride, generate_inputs, ImageGeometry, Inputs};

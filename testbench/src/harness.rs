//! The verification pipeline: generate, run both filters, compare, report.

use std::io::Write;

use anyhow::{Context, Result};
use filter_accel::{GpuFilter, LineBufferFilter};
use filter_core::{
    compare_images, filter2d_reference, Accelerator, Comparison, FilterCall, Verdict,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{Backend, HarnessSettings};
use crate::report;
use crate::scenario::{generate_inputs, ImageGeometry, Inputs};

/// What a single run observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub geometry: ImageGeometry,
    pub accelerator: String,
    pub comparison: Comparison,
}

impl RunOutcome {
    pub fn verdict(&self) -> Verdict {
        self.comparison.verdict()
    }
}

/// Instantiates the accelerator selected by `backend`.
pub fn open_accelerator(backend: Backend) -> Result<Box<dyn Accelerator>> {
    match backend {
        Backend::Gpu => {
            let gpu = GpuFilter::new().context("failed to initialise the GPU accelerator")?;
            info!(adapter = gpu.adapter_name(), "GPU accelerator ready");
            Ok(Box::new(gpu))
        }
        Backend::LineBuffer => Ok(Box::new(LineBufferFilter::new())),
    }
}

/// Full run against the backend named in `settings`.
pub fn run(settings: &HarnessSettings, out: &mut dyn Write) -> Result<RunOutcome> {
    let inputs = prepare(settings, out)?;
    let mut accel = open_accelerator(settings.backend)?;
    execute(&inputs, accel.as_mut(), out)
}

/// Full run against a caller-supplied accelerator; `settings.backend` is ignored.
pub fn run_with<A: Accelerator + ?Sized>(
    settings: &HarnessSettings,
    accel: &mut A,
    out: &mut dyn Write,
) -> Result<RunOutcome> {
    let inputs = prepare(settings, out)?;
    execute(&inputs, accel, out)
}

fn prepare(settings: &HarnessSettings, out: &mut dyn Write) -> Result<Inputs> {
    report::write_header(out)?;
    let inputs = generate_inputs(settings)?;
    report::write_image_info(out, &inputs.geometry)?;
    debug!(
        width = inputs.geometry.width,
        height = inputs.geometry.height,
        stride = inputs.geometry.stride,
        kernel_rows = inputs.kernel.rows(),
        kernel_cols = inputs.kernel.cols(),
        seed = settings.seed,
        "generated inputs"
    );
    Ok(inputs)
}

/// Runs the accelerator, then the reference, and compares the two outputs.
pub fn execute<A: Accelerator + ?Sized>(
    inputs: &Inputs,
    accel: &mut A,
    out: &mut dyn Write,
) -> Result<RunOutcome> {
    let name = accel.name().to_string();
    let call = FilterCall::for_image(&inputs.padded_kernel, inputs.scaling, &inputs.source)?;

    let mut accelerated = inputs
        .geometry
        .allocate()
        .context("failed to allocate accelerator output")?;
    writeln!(out, "Running {name} accelerator")?;
    info!(accelerator = %name, "running accelerated filter");
    accel
        .filter2d(&call, inputs.source.as_bytes(), accelerated.as_bytes_mut())
        .with_context(|| format!("{name} accelerator failed"))?;

    writeln!(out, "Comparing results")?;
    let mut reference = inputs
        .geometry
        .allocate()
        .context("failed to allocate reference output")?;
    filter2d_reference(&inputs.kernel, inputs.scaling, &inputs.source, &mut reference);

    let comparison = compare_images(&reference, &accelerated);
    info!(
        compared = comparison.compared,
        mismatches = comparison.mismatches,
        "comparison finished"
    );

    let outcome = RunOutcome {
        geometry: inputs.geometry,
        accelerator: name,
        comparison,
    };
    report::write_verdict(out, &outcome)?;
    Ok(outcome)
}

//! Harness settings: defaults, command-line switches and environment overrides.

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, ensure, Context, Result};
use filter_core::kernel::{DEFAULT_KERNEL_COLS, DEFAULT_KERNEL_ROWS};
use serde::{Deserialize, Serialize};

/// Environment variable selecting the accelerator backend.
pub const BACKEND_ENV: &str = "FILTER2D_BACKEND";
/// Environment variable overriding the input generator seed.
pub const SEED_ENV: &str = "FILTER2D_SEED";

pub const DEFAULT_WIDTH: usize = 1000;
pub const DEFAULT_HEIGHT: usize = 30;
pub const DEFAULT_SEED: u64 = 0xF117E2D;

/// Which accelerated implementation the harness drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    Gpu,
    LineBuffer,
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gpu" | "wgpu" => Ok(Backend::Gpu),
            "line-buffer" | "line_buffer" | "cpu" => Ok(Backend::LineBuffer),
            other => Err(anyhow!(
                "unknown backend '{other}' (expected 'gpu' or 'line-buffer')"
            )),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backend::Gpu => "gpu",
            Backend::LineBuffer => "line-buffer",
        })
    }
}

/// Everything one harness run needs to know before generating inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessSettings {
    pub width: usize,
    pub height: usize,
    pub kernel_rows: usize,
    pub kernel_cols: usize,
    pub seed: u64,
    pub backend: Backend,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            kernel_rows: DEFAULT_KERNEL_ROWS,
            kernel_cols: DEFAULT_KERNEL_COLS,
            seed: DEFAULT_SEED,
            backend: Backend::Gpu,
        }
    }
}

impl HarnessSettings {
    /// Applies `--width`/`-w` and `--height`/`-h` (as `--flag=N` or `--flag N`).
    pub fn apply_args<I, S>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
                None => (arg.clone(), None),
            };
            let target = match flag.as_str() {
                "--width" | "-w" => &mut self.width,
                "--height" | "-h" => &mut self.height,
                _ => bail!("unrecognized argument: {arg}"),
            };
            let value = match inline {
                Some(value) => value,
                None => args
                    .next()
                    .with_context(|| format!("missing value for {flag}"))?,
            };
            *target = value
                .parse()
                .with_context(|| format!("invalid {flag} value '{value}'"))?;
        }
        self.validate()
    }

    /// Applies `FILTER2D_BACKEND` / `FILTER2D_SEED` through `lookup` (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(BACKEND_ENV) {
            self.backend = value
                .parse()
                .with_context(|| format!("invalid {BACKEND_ENV}"))?;
        }
        if let Some(value) = lookup(SEED_ENV) {
            self.seed = parse_seed(&value).with_context(|| format!("invalid {SEED_ENV}"))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.width > 0, "image width must be positive");
        ensure!(self.height > 0, "image height must be positive");
        Ok(())
    }
}

fn parse_seed(value: &str) -> Result<u64> {
    let value = value.trim();
    if let Some(hex) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16).context("expected hex literal")
    } else {
        value.parse().context("expected integer seed")
    }
}

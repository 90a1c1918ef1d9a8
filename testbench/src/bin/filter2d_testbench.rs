use std::{env, io, process::ExitCode};

use anyhow::Result;
use testbench::HarnessSettings;

fn main() -> Result<ExitCode> {
    tracer::init_tracing();

    let mut settings = HarnessSettings::default();
    settings.apply_env(|key| env::var(key).ok())?;
    settings.apply_args(env::args().skip(1))?;

    let mut stdout = io::stdout().lock();
    let outcome = testbench::run(&settings, &mut stdout)?;
    Ok(ExitCode::from(outcome.verdict().exit_code()))
}

mod tracer {
    use tracing_subscriber::EnvFilter;

    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }
}

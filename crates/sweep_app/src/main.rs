use anyhow::Context;
use clap::Parser;
use sweep_app::config::{load, Cli};
use sweep_logging::sweep_info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    sweep_logging::initialize(cli.log_level);

    let config = load(&cli)?;

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    // Worker failures are reported in the log; they do not change the exit status.
    let summary = runtime.block_on(sweep_app::run(config))?;
    sweep_info!(
        "done: {} workers completed, {} failed",
        summary.reports.len(),
        summary.failures.len()
    );
    Ok(())
}

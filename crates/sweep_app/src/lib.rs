//! Cafe sweep application wiring: configuration loading and the run entry point.
pub mod config;

use std::sync::Arc;

use anyhow::Context;
use sweep_engine::{CookieSessionFactory, HttpSink, Orchestrator, RunSummary, SweepConfig};
use sweep_logging::sweep_info;

/// Run one sweep with the real session factory and HTTP sink.
pub async fn run(config: SweepConfig) -> anyhow::Result<RunSummary> {
    let sink = HttpSink::new(config.sink_endpoint.clone(), config.sink_timeout())
        .context("failed to build sink client")?;
    let sessions = CookieSessionFactory::new(config.fetch_settings(), config.session_cookie.clone());

    sweep_info!(
        "cafe {} menu {}: ids [{}, {}] -> {}",
        config.cafe_id,
        config.menu_id,
        config.start_id,
        config.end_id,
        config.sink_endpoint
    );
    let orchestrator = Orchestrator::new(config, Arc::new(sessions), Arc::new(sink));
    Ok(orchestrator.run().await)
}

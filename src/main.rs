use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use geoagents::adapters::outbound::{init_run_logger, init_tracing, FilesystemDataSource};
use geoagents::application::SimulationService;
use geoagents::Config;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;
    info!("Starting geoagents with {:?}", config.simulation);

    let data_source = Arc::new(FilesystemDataSource::new(config.data.dir.clone()));
    info!("Reading regions from {}", data_source.base().display());

    let logger = init_run_logger(config.logging.file.as_deref(), "schelling");
    let service = SimulationService::new(data_source, logger);

    let mut model = service.build_schelling(&config)?;
    let report = service.run(&mut model, config.simulation.max_steps);

    let happy = model.datacollector().series("happy").unwrap_or_default();
    info!("Happy agents per step: {:?}", happy);
    info!(
        "Finished: seed={} steps={} converged={} agents={}",
        report.seed, report.steps, report.converged, report.agents
    );
    Ok(())
}

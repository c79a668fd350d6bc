use std::sync::Arc;

use crate::common::{ApplicationError, ApplicationResult};
use crate::config::Config;
use crate::domains::logger::DynLogger;
use crate::domains::model::Simulation;
use crate::domains::schelling::SchellingModel;
use crate::domains::space::ports::FeatureDataSource;

/// Outcome of a bounded run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub seed: u64,
    pub steps: u64,
    pub converged: bool,
    pub agents: usize,
}

/// Loads region data through the data-source port and drives models to completion.
pub struct SimulationService {
    data_source: Arc<dyn FeatureDataSource>,
    logger: DynLogger,
}

impl SimulationService {
    pub fn new(data_source: Arc<dyn FeatureDataSource>, logger: DynLogger) -> Self {
        Self { data_source, logger }
    }

    pub fn load_regions(&self, name: &str) -> ApplicationResult<serde_json::Value> {
        self.data_source.load_features(name).map_err(|e| {
            self.logger.error(&format!("Failed to load {}: {}", name, e));
            ApplicationError::DataSource(e.to_string())
        })
    }

    pub fn build_schelling(&self, config: &Config) -> ApplicationResult<SchellingModel> {
        let regions = self.load_regions(&config.schelling.regions)?;
        let model = SchellingModel::new(&regions, config.schelling.params(), config.simulation.seed)?;
        self.logger.info(&format!(
            "Built Schelling model from {} (seed {}, {} agents, {} patches)",
            config.schelling.regions,
            model.model().seed(),
            model.model().schedule.get_agent_count(),
            model.model().space.patch_count()
        ));
        Ok(model)
    }

    /// Step `sim` until it halts or `max_steps` have run.
    pub fn run<M: Simulation>(&self, sim: &mut M, max_steps: u64) -> RunReport {
        let steps = sim.run_for(max_steps);
        let model = sim.model();
        let report = RunReport {
            seed: model.seed(),
            steps,
            converged: !model.running,
            agents: model.schedule.get_agent_count(),
        };

        if report.converged {
            self.logger.info(&format!("Run converged after {} steps ({} agents)", report.steps, report.agents));
        } else {
            self.logger.warn(&format!("Run stopped at step limit {} without converging", max_steps));
        }
        report
    }
}

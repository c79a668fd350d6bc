use super::segregation_agent::SchellingAgent;
use crate::common::DomainResult;
use crate::domains::model::{DataCollector, Model, Placement, Simulation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegregationParams {
    /// Chance that a patch starts out occupied.
    pub density: f64,
    /// Chance that an initial agent belongs to the minority type (1).
    pub minority_pc: f64,
}

impl Default for SegregationParams {
    fn default() -> Self {
        Self {
            density: 0.8,
            minority_pc: 0.4,
        }
    }
}

/// Schelling segregation over region patches. Halts once every agent is happy.
#[derive(Debug)]
pub struct SchellingModel {
    model: Model<SchellingAgent>,
    params: SegregationParams,
    datacollector: DataCollector<SchellingAgent>,
}

impl SchellingModel {
    /// One patch per region; each patch is populated with probability `density`.
    pub fn new(
        regions: &serde_json::Value,
        params: SegregationParams,
        seed: Option<u64>,
    ) -> DomainResult<Self> {
        let mut model = Model::new(seed);
        model.space.create_patches(regions)?;

        for index in 0..model.space.patch_count() {
            if model.rng_mut().gen::<f64>() >= params.density {
                continue;
            }
            let atype = u8::from(model.rng_mut().gen::<f64>() < params.minority_pc);
            let id = model.space.next_agent_id();
            model.add_agent(SchellingAgent::new(id, atype), Placement::Patch(index), true)?;
        }

        info!(
            "Schelling model: {} agents on {} patches",
            model.schedule.get_agent_count(),
            model.space.patch_count()
        );
        Self::from_model(model, params)
    }

    /// Wrap an already populated model.
    pub fn from_model(mut model: Model<SchellingAgent>, params: SegregationParams) -> DomainResult<Self> {
        model.space.update_bbox(None)?;
        let datacollector =
            DataCollector::new().with_model_reporter("happy", |m: &Model<SchellingAgent>| m.metrics.happy as f64);
        Ok(Self {
            model,
            params,
            datacollector,
        })
    }

    pub fn params(&self) -> SegregationParams {
        self.params
    }

    /// Happy agents counted during the last completed step.
    pub fn happy(&self) -> usize {
        self.model.metrics.happy
    }

    pub fn datacollector(&self) -> &DataCollector<SchellingAgent> {
        &self.datacollector
    }
}

impl Simulation for SchellingModel {
    type Agent = SchellingAgent;

    fn model(&self) -> &Model<SchellingAgent> {
        &self.model
    }

    fn model_mut(&mut self) -> &mut Model<SchellingAgent> {
        &mut self.model
    }

    fn step(&mut self) {
        self.model.reset_metrics();
        self.model.step_agents();
        self.datacollector.collect(&self.model);

        if self.model.metrics.happy == self.model.schedule.get_agent_count() {
            info!("All {} agents happy after {} steps", self.model.metrics.happy, self.model.steps());
            self.model.running = false;
        }
    }
}

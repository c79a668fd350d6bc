use crate::common::{DomainError, DomainResult, SpaceSnapshot};
use crate::domains::entity::{Agent, AgentId, ModelId};
use crate::domains::schedule::RandomActivation;
use crate::domains::space::Space;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;
use tracing::{debug, info};

/// Where `Model::add_agent` puts a new agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// A uniformly chosen vacant patch, if the space has patches at all.
    #[default]
    Random,
    /// A specific patch, by index.
    Patch(usize),
    /// Keep whatever shape the agent already has.
    Unplaced,
}

fn clock_seed() -> u64 {
    let now = Utc::now();
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_millis())
        .unsigned_abs()
}

/// Run-loop state shared by every concrete simulation: seeding, the scheduler,
/// the space, the running flag and the per-step metrics.
pub struct Model<A: Agent> {
    id: ModelId,
    seed: u64,
    rng: StdRng,
    pub running: bool,
    pub schedule: RandomActivation,
    pub space: Space<A>,
    pub metrics: A::Metrics,
}

impl<A: Agent> fmt::Debug for Model<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("seed", &self.seed)
            .field("running", &self.running)
            .field("schedule", &self.schedule)
            .field("space", &self.space)
            .finish()
    }
}

impl<A: Agent> Model<A> {
    /// A model over an empty space. Without a seed one is taken from the clock.
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_space(seed, Space::new())
    }

    pub fn with_space(seed: Option<u64>, space: Space<A>) -> Self {
        let seed = seed.unwrap_or_else(clock_seed);
        let id = ModelId::new();
        info!("Created {} with seed {}", id, seed);
        Self {
            id,
            seed,
            rng: StdRng::seed_from_u64(seed),
            running: true,
            schedule: RandomActivation::new(),
            space,
            metrics: A::Metrics::default(),
        }
    }

    pub fn id(&self) -> ModelId {
        self.id
    }

    /// The seed the RNG was built from, for reproducing a run.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn steps(&self) -> u64 {
        self.schedule.steps()
    }

    /// Bind `agent` to this model, place it, and optionally schedule it.
    pub fn add_agent(&mut self, mut agent: A, placement: Placement, schedule: bool) -> DomainResult<AgentId> {
        let id = agent.unique_id();
        if self.space.contains_agent(id) {
            return Err(DomainError::invalid_state(format!("{} is already in the model", id)));
        }

        let target = match placement {
            Placement::Random if self.space.patch_count() > 0 => {
                let empties = self.space.empty_patches();
                let choice = empties.choose(&mut self.rng).copied().ok_or_else(|| {
                    DomainError::invalid_state("no vacant patch left for random placement")
                })?;
                Some(choice)
            }
            Placement::Random | Placement::Unplaced => None,
            Placement::Patch(index) => Some(index),
        };

        agent.core_mut().bind_model(self.id);
        if let Some(index) = target {
            self.space.place_agent(agent.core_mut(), index)?;
        }
        self.space.add_agent(agent)?;
        if schedule {
            self.schedule.add(id);
        }
        Ok(id)
    }

    /// Unbind, unschedule and remove an agent. Unknown ids return `None`.
    pub fn remove_agent(&mut self, id: AgentId) -> Option<A> {
        self.schedule.remove(id);
        let mut agent = self.space.remove_agent(id)?;
        agent.core_mut().unbind_model();
        Some(agent)
    }

    pub fn reset_metrics(&mut self) {
        self.metrics = A::Metrics::default();
    }

    /// One pass of the scheduler over the registered agents, then the patch hooks.
    pub fn step_agents(&mut self) -> usize {
        let activated = self
            .schedule
            .step(self.id, &mut self.space, &mut self.rng, &mut self.metrics);
        self.space.step_patches();
        debug!("{} step {} activated {} agents", self.id, self.schedule.steps(), activated);
        activated
    }

    pub fn snapshot(&self) -> SpaceSnapshot {
        self.space.snapshot(self.steps())
    }
}

/// The run loop. Concrete simulations override `step`; the default delegates to
/// the scheduler.
pub trait Simulation {
    type Agent: Agent;

    fn model(&self) -> &Model<Self::Agent>;

    fn model_mut(&mut self) -> &mut Model<Self::Agent>;

    fn step(&mut self) {
        self.model_mut().step_agents();
    }

    fn running(&self) -> bool {
        self.model().running
    }

    /// Step until the running flag drops. Never returns for models that do not converge.
    fn run_model(&mut self) {
        while self.running() {
            self.step();
        }
    }

    /// Step until the running flag drops or `max_steps` is reached. Returns steps taken.
    fn run_for(&mut self, max_steps: u64) -> u64 {
        let mut taken = 0;
        while self.running() && taken < max_steps {
            self.step();
            taken += 1;
        }
        taken
    }
}

impl<A: Agent> Simulation for Model<A> {
    type Agent = A;

    fn model(&self) -> &Model<A> {
        self
    }

    fn model_mut(&mut self) -> &mut Model<A> {
        self
    }
}

use crate::common::DomainResult;
use crate::domains::entity::{Agent, AgentId, ModelId};
use crate::domains::space::Space;
use rand::RngCore;

/// Everything an agent may touch while it is being stepped.
///
/// The stepping agent itself is checked out of `space` for the duration of its
/// step; it is passed to `Agent::step` as `&mut self` instead.
pub struct StepContext<'a, A: Agent> {
    pub model: ModelId,
    pub step: u64,
    pub space: &'a mut Space<A>,
    pub rng: &'a mut dyn RngCore,
    pub metrics: &'a mut A::Metrics,
    spawned: Vec<AgentId>,
}

impl<'a, A: Agent> StepContext<'a, A> {
    pub fn new(
        model: ModelId,
        step: u64,
        space: &'a mut Space<A>,
        rng: &'a mut dyn RngCore,
        metrics: &'a mut A::Metrics,
    ) -> Self {
        Self {
            model,
            step,
            space,
            rng,
            metrics,
            spawned: Vec::new(),
        }
    }

    /// Add an agent mid-step. When `schedule` is set it is registered once the
    /// current step finishes and first acts in the next one.
    pub fn add_agent(&mut self, mut agent: A, schedule: bool) -> DomainResult<AgentId> {
        agent.core_mut().bind_model(self.model);
        let id = self.space.add_agent(agent)?;
        if schedule {
            self.spawned.push(id);
        }
        Ok(id)
    }

    /// Remove an agent mid-step. If it has not acted yet this step it is skipped.
    ///
    /// Removing the stepping agent itself returns `None`: it is checked out, so the
    /// caller already holds it. It is dropped when its step returns.
    pub fn remove_agent(&mut self, id: AgentId) -> Option<A> {
        self.spawned.retain(|s| *s != id);
        self.space.remove_agent(id).map(|mut agent| {
            agent.core_mut().unbind_model();
            agent
        })
    }

    pub(crate) fn into_spawned(self) -> Vec<AgentId> {
        self.spawned
    }
}

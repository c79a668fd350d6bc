use super::context::StepContext;
use crate::domains::entity::{Agent, AgentId, ModelId};
use crate::domains::space::Space;
use indexmap::IndexSet;
use rand::seq::SliceRandom;
use rand::RngCore;
use tracing::trace;

/// Activates every registered agent once per step, in a freshly shuffled order.
///
/// The order is fixed when the step starts. Agents removed from the space before
/// their turn are skipped and dropped from the registry when the step ends;
/// agents spawned through the step context join the registry afterwards.
#[derive(Debug, Clone, Default)]
pub struct RandomActivation {
    agents: IndexSet<AgentId>,
    steps: u64,
    time: f64,
}

impl RandomActivation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: AgentId) -> bool {
        self.agents.insert(id)
    }

    pub fn remove(&mut self, id: AgentId) -> bool {
        self.agents.swap_remove(&id)
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains(&id)
    }

    pub fn get_agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agents.iter().copied()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Step every registered agent exactly once. Returns how many actually acted.
    pub fn step<A: Agent>(
        &mut self,
        model: ModelId,
        space: &mut Space<A>,
        rng: &mut dyn RngCore,
        metrics: &mut A::Metrics,
    ) -> usize {
        let mut order: Vec<AgentId> = self.agents.iter().copied().collect();
        order.shuffle(&mut *rng);

        let mut ctx = StepContext::new(model, self.steps, space, rng, metrics);
        let mut activated = 0;
        for id in order {
            let Some(mut agent) = ctx.space.checkout(id) else {
                trace!("{} left the space before its turn", id);
                continue;
            };
            agent.step(&mut ctx);
            ctx.space.checkin(agent);
            activated += 1;
        }
        let spawned = ctx.into_spawned();

        self.agents.retain(|id| space.contains_agent(*id));
        self.agents.extend(spawned);
        self.steps += 1;
        self.time += 1.0;
        activated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::entity::AgentCore;
    use crate::domains::geometry::GeoShape;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Records activation order into the shared metrics.
    struct Recorder {
        core: AgentCore<GeoShape>,
        spawn_child: bool,
        remove: Option<AgentId>,
    }

    impl Recorder {
        fn new(id: u64) -> Self {
            Self {
                core: AgentCore::new(AgentId(id), Some(GeoShape::point(id as f64, 0.0))),
                spawn_child: false,
                remove: None,
            }
        }
    }

    impl Agent for Recorder {
        type Shape = GeoShape;
        type Metrics = Vec<AgentId>;

        fn core(&self) -> &AgentCore<GeoShape> {
            &self.core
        }

        fn core_mut(&mut self) -> &mut AgentCore<GeoShape> {
            &mut self.core
        }

        fn step(&mut self, ctx: &mut StepContext<'_, Self>) {
            ctx.metrics.push(self.core.unique_id());
            if self.spawn_child {
                self.spawn_child = false;
                let id = ctx.space.next_agent_id();
                ctx.add_agent(Recorder::new(id.0), true).unwrap();
            }
            if let Some(target) = self.remove.take() {
                ctx.remove_agent(target);
            }
        }
    }

    fn populated(n: u64) -> (Space<Recorder>, RandomActivation) {
        let mut space = Space::new();
        let mut schedule = RandomActivation::new();
        for i in 0..n {
            let id = space.add_agent(Recorder::new(i)).unwrap();
            schedule.add(id);
        }
        (space, schedule)
    }

    #[test]
    fn every_registered_agent_steps_exactly_once() {
        let (mut space, mut schedule) = populated(10);
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = Vec::new();
        let n = schedule.step(ModelId::new(), &mut space, &mut rng, &mut seen);

        assert_eq!(n, 10);
        let mut sorted = seen.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 10);
        assert_eq!(schedule.steps(), 1);
        assert_eq!(schedule.time(), 1.0);
    }

    #[test]
    fn order_is_reshuffled_between_steps_and_reproducible() {
        let run = |seed| {
            let (mut space, mut schedule) = populated(20);
            let mut rng = StdRng::seed_from_u64(seed);
            let mut first = Vec::new();
            let mut second = Vec::new();
            schedule.step(ModelId::new(), &mut space, &mut rng, &mut first);
            schedule.step(ModelId::new(), &mut space, &mut rng, &mut second);
            (first, second)
        };
        let (a1, a2) = run(11);
        let (b1, b2) = run(11);
        assert_eq!(a1, b1);
        assert_eq!(a2, b2);
        assert_ne!(a1, a2);
    }

    #[test]
    fn spawned_agents_wait_for_the_next_step() {
        let (mut space, mut schedule) = populated(3);
        space.agent_mut(AgentId(0)).unwrap().spawn_child = true;
        let mut rng = StdRng::seed_from_u64(1);

        let mut seen = Vec::new();
        assert_eq!(schedule.step(ModelId::new(), &mut space, &mut rng, &mut seen), 3);
        assert_eq!(schedule.get_agent_count(), 4);
        assert_eq!(space.agent_count(), 4);

        seen.clear();
        assert_eq!(schedule.step(ModelId::new(), &mut space, &mut rng, &mut seen), 4);
    }

    #[test]
    fn removed_agents_are_skipped_and_pruned() {
        let (mut space, mut schedule) = populated(5);
        for i in 0..5 {
            let target = AgentId((i + 1) % 5);
            space.agent_mut(AgentId(i)).unwrap().remove = Some(target);
        }
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = Vec::new();
        let n = schedule.step(ModelId::new(), &mut space, &mut rng, &mut seen);

        assert!(n < 5);
        assert_eq!(schedule.get_agent_count(), space.agent_count());
        assert!(schedule.agent_ids().all(|id| space.contains_agent(id)));
    }

    #[test]
    fn self_removal_returns_none_and_drops_the_agent() {
        let (mut space, mut schedule) = populated(3);
        space.agent_mut(AgentId(1)).unwrap().remove = Some(AgentId(1));
        let mut rng = StdRng::seed_from_u64(5);
        let mut seen = Vec::new();

        assert_eq!(schedule.step(ModelId::new(), &mut space, &mut rng, &mut seen), 3);
        assert!(!space.contains_agent(AgentId(1)));
        assert!(!schedule.contains(AgentId(1)));
        assert_eq!(space.agent_count(), 2);
        assert_eq!(schedule.get_agent_count(), 2);

        let stepping = space.checkout(AgentId(2)).unwrap();
        let mut metrics = Vec::new();
        let mut ctx = StepContext::new(ModelId::new(), 1, &mut space, &mut rng, &mut metrics);
        assert!(ctx.remove_agent(AgentId(2)).is_none());
        assert!(ctx.remove_agent(AgentId(0)).is_some());
        assert!(ctx.remove_agent(AgentId(0)).is_none());
        drop(ctx);
        space.checkin(stepping);
        assert_eq!(space.agent_count(), 0);
    }
}

use geoagents::common::DomainError;
use geoagents::domains::entity::{Agent, AgentCore, AgentId, BasicAgent};
use geoagents::domains::geometry::{GeoShape, Position};
use geoagents::domains::model::{DataCollector, Model, Placement, Simulation};
use geoagents::domains::schedule::StepContext;
use serde_json::json;

fn two_patch_regions() -> serde_json::Value {
    json!({
        "type": "GeometryCollection",
        "geometries": [
            { "type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]] },
            { "type": "Polygon", "coordinates": [[[3.0, 0.0], [4.0, 0.0], [4.0, 1.0], [3.0, 1.0], [3.0, 0.0]]] }
        ]
    })
}

/// Counts its own activations and, on its first step, spawns one child.
#[derive(Debug, Clone)]
struct Spawner {
    core: AgentCore<GeoShape>,
    spawned: bool,
}

impl Spawner {
    fn new(id: u64) -> Self {
        Self {
            core: AgentCore::new(AgentId(id), Some(GeoShape::point(0.0, 0.0))),
            spawned: true,
        }
    }

    fn parent(id: u64) -> Self {
        Self { spawned: false, ..Self::new(id) }
    }
}

impl Agent for Spawner {
    type Shape = GeoShape;
    type Metrics = usize;

    fn core(&self) -> &AgentCore<GeoShape> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AgentCore<GeoShape> {
        &mut self.core
    }

    fn step(&mut self, ctx: &mut StepContext<'_, Self>) {
        *ctx.metrics += 1;
        if !self.spawned {
            self.spawned = true;
            let id = ctx.space.next_agent_id();
            ctx.add_agent(Spawner::new(id.0), true).unwrap();
        }
    }
}

#[test]
fn explicit_seed_is_retained_and_clock_seed_is_recorded() {
    let seeded: Model<BasicAgent<GeoShape>> = Model::new(Some(42));
    assert_eq!(seeded.seed(), 42);
    assert!(seeded.running);

    let a: Model<BasicAgent<GeoShape>> = Model::new(None);
    let b: Model<BasicAgent<GeoShape>> = Model::new(None);
    assert_ne!(a.id(), b.id());
    let replay: Model<BasicAgent<GeoShape>> = Model::new(Some(a.seed()));
    assert_eq!(replay.seed(), a.seed());
}

#[test]
fn add_agent_binds_places_and_schedules() {
    let mut model: Model<BasicAgent<GeoShape>> = Model::new(Some(1));
    model.space.create_patches(&two_patch_regions()).unwrap();

    let core = AgentCore::new(AgentId(0), None);
    let id = model
        .add_agent(BasicAgent::from_core(core), Placement::Patch(1), true)
        .unwrap();

    let agent = model.space.agent(id).unwrap();
    assert_eq!(agent.core().model(), Some(model.id()));
    assert_eq!(model.space.patch_of(id), Some(1));
    assert_eq!(agent.pos(), model.space.patch(1).unwrap().pos());
    assert!(model.schedule.contains(id));
    assert_eq!(model.schedule.get_agent_count(), 1);
}

#[test]
fn random_placement_fills_vacant_patches_then_fails() {
    let mut model: Model<BasicAgent<GeoShape>> = Model::new(Some(3));
    model.space.create_patches(&two_patch_regions()).unwrap();

    for i in 0..2 {
        let core = AgentCore::new(AgentId(i), None);
        model.add_agent(BasicAgent::from_core(core), Placement::Random, true).unwrap();
    }
    assert!(model.space.empty_patches().is_empty());

    let core = AgentCore::new(AgentId(2), None);
    let overflow = model.add_agent(BasicAgent::from_core(core), Placement::Random, true);
    assert!(matches!(overflow, Err(DomainError::InvalidState { .. })));
}

#[test]
fn unplaced_agents_keep_their_shape_in_a_patchless_space() {
    let mut model: Model<BasicAgent<GeoShape>> = Model::new(Some(3));
    let id = model
        .add_agent(BasicAgent::new(AgentId(5), GeoShape::point(2.0, 3.0)), Placement::Random, false)
        .unwrap();

    assert_eq!(model.space.agent(id).unwrap().pos(), Some(Position::new(2.0, 3.0)));
    assert!(!model.schedule.contains(id));
}

#[test]
fn remove_agent_unbinds_and_frees_patch() {
    let mut model: Model<BasicAgent<GeoShape>> = Model::new(Some(9));
    model.space.create_patches(&two_patch_regions()).unwrap();
    let core = AgentCore::new(AgentId(0), None);
    let id = model.add_agent(BasicAgent::from_core(core), Placement::Patch(0), true).unwrap();

    let removed = model.remove_agent(id).unwrap();
    assert_eq!(removed.core().model(), None);
    assert!(model.space.patch(0).unwrap().is_vacant());
    assert_eq!(model.schedule.get_agent_count(), 0);

    assert!(model.remove_agent(id).is_none());
}

#[test]
fn run_for_stops_at_the_step_cap() {
    let mut model: Model<Spawner> = Model::new(Some(11));
    for i in 0..3 {
        model.add_agent(Spawner::new(i), Placement::Unplaced, true).unwrap();
    }

    let taken = model.run_for(5);
    assert_eq!(taken, 5);
    assert_eq!(model.steps(), 5);
    assert_eq!(model.metrics, 15);
    assert!(model.running);
}

#[test]
fn agents_spawned_mid_step_act_from_the_next_step() {
    let mut model: Model<Spawner> = Model::new(Some(5));
    model.add_agent(Spawner::parent(0), Placement::Unplaced, true).unwrap();

    assert_eq!(model.step_agents(), 1);
    assert_eq!(model.space.agent_count(), 2);
    assert_eq!(model.schedule.get_agent_count(), 2);

    model.reset_metrics();
    assert_eq!(model.step_agents(), 2);
    assert_eq!(model.metrics, 2);
}

#[test]
fn data_collector_records_one_value_per_step() {
    let mut model: Model<Spawner> = Model::new(Some(2));
    for i in 0..4 {
        model.add_agent(Spawner::new(i), Placement::Unplaced, true).unwrap();
    }
    let mut collector = DataCollector::new().with_model_reporter("activations", |m: &Model<Spawner>| m.metrics as f64);

    for _ in 0..3 {
        model.reset_metrics();
        model.step();
        collector.collect(&model);
    }

    assert_eq!(collector.collections(), 3);
    assert_eq!(collector.series("activations"), Some(&[4.0, 4.0, 4.0][..]));
    assert_eq!(collector.to_json(), json!({ "activations": [4.0, 4.0, 4.0] }));
}

use super::bbox::BoundingBox;
use super::features::{decode_features, decode_record, FeatureRecord};
use crate::common::{collection, Attributes, DomainError, DomainResult, SpaceSnapshot};
use crate::domains::entity::{Agent, AgentCore, AgentId, GeoEntity, Patch};
use crate::domains::geometry::{Position, Shape};
use indexmap::IndexMap;
use rand::seq::SliceRandom;
use rand::RngCore;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Units `Space::distance` can report in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceUnit {
    /// Native coordinate units of the shapes, no projection applied.
    #[default]
    Degrees,
}

impl FromStr for DistanceUnit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "degrees" | "deg" => Ok(DistanceUnit::Degrees),
            other => Err(DomainError::UnsupportedUnit { unit: other.to_string() }),
        }
    }
}

/// Container and query surface over all patches and agents.
///
/// Agents are stored in insertion order. While an agent is being stepped it is
/// checked out of its slot, so lookups for it return `None` until it is checked
/// back in.
pub struct Space<A: Agent> {
    patches: Vec<Patch<A::Shape>>,
    agents: IndexMap<AgentId, Option<A>>,
    bbox: Option<BoundingBox>,
    center: Option<Position>,
    next_id: u64,
}

impl<A: Agent> fmt::Debug for Space<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Space")
            .field("patch_count", &self.patches.len())
            .field("agent_count", &self.agents.len())
            .field("bbox", &self.bbox)
            .field("center", &self.center)
            .finish()
    }
}

impl<A: Agent> Default for Space<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Agent> Space<A> {
    pub fn new() -> Self {
        Self {
            patches: Vec::new(),
            agents: IndexMap::new(),
            bbox: None,
            center: None,
            next_id: 0,
        }
    }

    fn shapes(records: Vec<FeatureRecord>) -> DomainResult<Vec<(A::Shape, Attributes)>> {
        records
            .into_iter()
            .map(|record| Ok((A::Shape::from_geojson(&record.geometry)?, record.attributes)))
            .collect()
    }

    /// Build one patch per geometry or feature in `features`, in encounter order.
    /// Nothing is appended if any member fails to decode.
    pub fn create_patches(&mut self, features: &serde_json::Value) -> DomainResult<usize> {
        let decoded = Self::shapes(decode_features(features)?)?;
        let count = decoded.len();
        self.patches.extend(
            decoded
                .into_iter()
                .map(|(shape, attributes)| Patch::new(shape).with_attributes(attributes)),
        );
        info!("Created {} patches, space now holds {}", count, self.patches.len());
        Ok(count)
    }

    /// Same traversal as `create_patches`, building agents through `factory`.
    pub fn create_agents<F>(
        &mut self,
        features: &serde_json::Value,
        mut factory: F,
    ) -> DomainResult<Vec<AgentId>>
    where
        F: FnMut(AgentCore<A::Shape>) -> A,
    {
        let decoded = Self::shapes(decode_features(features)?)?;
        let mut ids = Vec::with_capacity(decoded.len());
        for (shape, attributes) in decoded {
            let core = AgentCore::new(self.next_agent_id(), Some(shape)).with_attributes(attributes);
            ids.push(self.add_agent(factory(core))?);
        }
        info!("Created {} agents, space now holds {}", ids.len(), self.agents.len());
        Ok(ids)
    }

    pub fn add_patch(&mut self, patch: Patch<A::Shape>) -> DomainResult<usize> {
        if patch.shape().is_none() {
            return Err(DomainError::MissingShape {
                what: "space patches must have a shape".to_string(),
            });
        }
        self.patches.push(patch);
        Ok(self.patches.len() - 1)
    }

    /// Add a patch from a serialized entity view (a Feature or a bare geometry).
    pub fn add_patch_record(&mut self, record: &serde_json::Value) -> DomainResult<usize> {
        let record = decode_record(record)?;
        let shape = A::Shape::from_geojson(&record.geometry)?;
        self.add_patch(Patch::new(shape).with_attributes(record.attributes))
    }

    /// Append an agent. No shape is required; ids must be unique.
    pub fn add_agent(&mut self, agent: A) -> DomainResult<AgentId> {
        let id = agent.unique_id();
        if self.agents.contains_key(&id) {
            return Err(DomainError::invalid_state(format!("{} is already in the space", id)));
        }
        self.next_id = self.next_id.max(id.0.saturating_add(1));
        self.agents.insert(id, Some(agent));
        Ok(id)
    }

    /// Remove an agent and free its patch. Absent ids are a no-op.
    ///
    /// An agent that is checked out for its own step is still removed (its id and
    /// patch are released) but there is no value to hand back, so the result is
    /// `None` as for an absent id. Use `contains_agent` beforehand to tell the two apart.
    pub fn remove_agent(&mut self, id: AgentId) -> Option<A> {
        let slot = self.agents.shift_remove(&id)?;
        self.vacate(id);
        slot
    }

    pub fn next_agent_id(&mut self) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn contains_agent(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    pub fn agent(&self, id: AgentId) -> Option<&A> {
        self.agents.get(&id).and_then(Option::as_ref)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut A> {
        self.agents.get_mut(&id).and_then(Option::as_mut)
    }

    pub fn agents(&self) -> impl Iterator<Item = &A> + '_ {
        self.agents.values().filter_map(Option::as_ref)
    }

    pub fn agent_ids(&self) -> Vec<AgentId> {
        self.agents.keys().copied().collect()
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn patches(&self) -> &[Patch<A::Shape>] {
        &self.patches
    }

    pub fn patch(&self, index: usize) -> Option<&Patch<A::Shape>> {
        self.patches.get(index)
    }

    pub fn patch_mut(&mut self, index: usize) -> Option<&mut Patch<A::Shape>> {
        self.patches.get_mut(index)
    }

    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }

    /// Every other agent whose shape intersects `agent`'s shape. The agent itself
    /// is never reported as its own neighbor.
    pub fn get_neighbors(&self, agent: &A) -> DomainResult<Vec<&A>> {
        let id = agent.unique_id();
        let shape = agent.shape().ok_or_else(|| {
            DomainError::invalid_state(format!("{} has no shape to query neighbors with", id))
        })?;
        Ok(self
            .agents()
            .filter(|other| other.unique_id() != id)
            .filter(|other| other.shape().is_some_and(|s| shape.intersects(s)))
            .collect())
    }

    pub fn neighbors_of(&self, id: AgentId) -> DomainResult<Vec<&A>> {
        let agent = self
            .agent(id)
            .ok_or_else(|| DomainError::invalid_state(format!("{} is not in the space", id)))?;
        self.get_neighbors(agent)
    }

    /// Every patch whose shape contains `pos`. Points on shared boundaries may match
    /// several patches or none; callers pick their own tie-break.
    pub fn patches_at(&self, pos: Position) -> Vec<&Patch<A::Shape>> {
        self.patches
            .iter()
            .filter(|p| p.shape().is_some_and(|s| s.contains_point(pos)))
            .collect()
    }

    pub fn patch_indices_at(&self, pos: Position) -> Vec<usize> {
        self.patches
            .iter()
            .enumerate()
            .filter(|(_, p)| p.shape().is_some_and(|s| s.contains_point(pos)))
            .map(|(i, _)| i)
            .collect()
    }

    /// Adopt `bbox`, or recompute it from every part of every patch boundary.
    pub fn update_bbox(&mut self, bbox: Option<BoundingBox>) -> DomainResult<BoundingBox> {
        let bbox = match bbox {
            Some(bbox) => bbox,
            None => {
                if self.patches.is_empty() {
                    return Err(DomainError::EmptySpace);
                }
                let coords = self
                    .patches
                    .iter()
                    .filter_map(Patch::shape)
                    .flat_map(|s| s.boundary_parts())
                    .flatten();
                BoundingBox::covering(coords).ok_or(DomainError::EmptySpace)?
            }
        };
        self.bbox = Some(bbox);
        self.center = Some(bbox.center());
        debug!("Bounding box updated to {:?}", bbox.as_tuple());
        Ok(bbox)
    }

    pub fn bbox(&self) -> Option<BoundingBox> {
        self.bbox
    }

    pub fn center(&self) -> Option<Position> {
        self.center
    }

    /// Distance between two located entities in the requested unit.
    pub fn distance<E1, E2>(&self, a: &E1, b: &E2, unit: DistanceUnit) -> DomainResult<f64>
    where
        E1: GeoEntity<Shape = A::Shape>,
        E2: GeoEntity<Shape = A::Shape>,
    {
        let (Some(a), Some(b)) = (a.shape(), b.shape()) else {
            return Err(DomainError::invalid_state("distance requires two shaped entities"));
        };
        match unit {
            DistanceUnit::Degrees => Ok(a.distance(b)),
        }
    }

    /// Indices of the patches nobody occupies.
    pub fn empty_patches(&self) -> Vec<usize> {
        self.patches
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_vacant() && p.shape().is_some())
            .map(|(i, _)| i)
            .collect()
    }

    /// Index of the patch `id` currently occupies.
    pub fn patch_of(&self, id: AgentId) -> Option<usize> {
        self.patches.iter().position(|p| p.occupant() == Some(id))
    }

    fn vacate(&mut self, id: AgentId) -> Option<usize> {
        let index = self.patch_of(id)?;
        self.patches[index].vacate();
        Some(index)
    }

    pub fn place_agent(&mut self, agent: &mut AgentCore<A::Shape>, patch: usize) -> DomainResult<()> {
        self.move_to_patch(agent, patch)
    }

    /// Move `agent` onto `target`: vacate its old patch, occupy the target and
    /// take over the target's shape and position.
    pub fn move_to_patch(&mut self, agent: &mut AgentCore<A::Shape>, target: usize) -> DomainResult<()> {
        let id = agent.unique_id();
        let patch = self
            .patches
            .get(target)
            .ok_or_else(|| DomainError::invalid_state(format!("no patch at index {}", target)))?;
        if let Some(occupant) = patch.occupant().filter(|o| *o != id) {
            return Err(DomainError::invalid_state(format!(
                "patch {} is occupied by {}",
                target, occupant
            )));
        }
        let shape = patch.shape().cloned().ok_or_else(|| DomainError::MissingShape {
            what: format!("patch {} has no shape to adopt", target),
        })?;
        let pos = patch.pos();

        self.vacate(id);
        self.patches[target].occupy(id);
        agent.adopt(shape, pos);
        Ok(())
    }

    /// Relocate `agent` to a uniformly chosen empty patch.
    ///
    /// The empty set is taken before the agent leaves its current patch, so an agent
    /// never lands on the patch it just vacated. With no empty patch the agent stays
    /// where it is and `None` is returned.
    pub fn move_to_empty(
        &mut self,
        agent: &mut AgentCore<A::Shape>,
        rng: &mut dyn RngCore,
    ) -> DomainResult<Option<usize>> {
        let empties = self.empty_patches();
        let Some(&target) = empties.choose(rng) else {
            return Ok(None);
        };
        self.move_to_patch(agent, target)?;
        Ok(Some(target))
    }

    pub fn step_patches(&mut self) {
        for patch in &mut self.patches {
            patch.step();
        }
    }

    /// One collection holding every agent's view followed by every patch's.
    pub fn features(&self) -> geojson::FeatureCollection {
        collection(
            self.agents()
                .map(Agent::to_feature)
                .chain(self.patches.iter().map(GeoEntity::to_feature))
                .collect(),
        )
    }

    /// Feature views of every agent and patch, for renderers and collectors.
    pub fn snapshot(&self, step: u64) -> SpaceSnapshot {
        SpaceSnapshot::new(
            step,
            self.agents().map(Agent::to_feature).collect(),
            self.patches.iter().map(GeoEntity::to_feature).collect(),
        )
    }

    pub(crate) fn checkout(&mut self, id: AgentId) -> Option<A> {
        self.agents.get_mut(&id)?.take()
    }

    pub(crate) fn checkin(&mut self, agent: A) {
        let id = agent.unique_id();
        match self.agents.get_mut(&id) {
            Some(slot) => *slot = Some(agent),
            None => debug!("{} was removed during its own step", id),
        }
    }
}

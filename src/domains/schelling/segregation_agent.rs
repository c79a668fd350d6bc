use crate::common::Attributes;
use crate::domains::entity::{Agent, AgentCore, AgentId};
use crate::domains::geometry::{GeoShape, Shape};
use crate::domains::schedule::StepContext;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegregationMetrics {
    /// Agents that had at least as many similar as different neighbors.
    pub happy: usize,
    /// Unhappy agents that found an empty patch and moved.
    pub moved: usize,
    /// Unhappy agents that stayed because no patch was empty.
    pub stuck: usize,
}

/// Schelling agent: moves away when dissimilar neighbors outnumber similar ones.
#[derive(Debug, Clone)]
pub struct SchellingAgent<S = GeoShape> {
    core: AgentCore<S>,
    pub atype: u8,
}

impl<S: Shape> SchellingAgent<S> {
    /// An agent with no footprint yet; place it on a patch to give it one.
    pub fn new(unique_id: AgentId, atype: u8) -> Self {
        Self {
            core: AgentCore::new(unique_id, None),
            atype,
        }
    }

    pub fn with_shape(unique_id: AgentId, atype: u8, shape: S) -> Self {
        Self {
            core: AgentCore::new(unique_id, Some(shape)),
            atype,
        }
    }

    /// Build from a decoded feature. A numeric `atype` property moves into the
    /// `atype` field; anything else is left in the attributes and the type is 0.
    pub fn from_core(mut core: AgentCore<S>) -> Self {
        let parsed = core
            .attributes
            .get("atype")
            .and_then(serde_json::Value::as_u64)
            .and_then(|t| u8::try_from(t).ok());
        if parsed.is_some() {
            core.attributes.remove("atype");
        }
        Self {
            core,
            atype: parsed.unwrap_or_default(),
        }
    }
}

impl<S: Shape> Agent for SchellingAgent<S> {
    type Shape = S;
    type Metrics = SegregationMetrics;

    fn core(&self) -> &AgentCore<S> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AgentCore<S> {
        &mut self.core
    }

    fn step(&mut self, ctx: &mut StepContext<'_, Self>) {
        let (similar, different) = match ctx.space.get_neighbors(self) {
            Ok(neighbors) => neighbors.iter().fold((0usize, 0usize), |(s, d), n| {
                if n.atype == self.atype {
                    (s + 1, d)
                } else {
                    (s, d + 1)
                }
            }),
            Err(e) => {
                warn!("Skipping {}: {}", self.core.unique_id(), e);
                return;
            }
        };

        if similar >= different {
            ctx.metrics.happy += 1;
            return;
        }

        match ctx.space.move_to_empty(&mut self.core, &mut *ctx.rng) {
            Ok(Some(patch)) => {
                ctx.metrics.moved += 1;
                debug!("{} moved to patch {}", self.core.unique_id(), patch);
            }
            Ok(None) => {
                ctx.metrics.stuck += 1;
                debug!("{} is unhappy but no patch is empty", self.core.unique_id());
            }
            Err(e) => warn!("{} could not move: {}", self.core.unique_id(), e),
        }
    }

    fn properties(&self) -> Attributes {
        let mut props = self.core.properties();
        props.insert("atype".to_string(), self.atype.into());
        props
    }
}

use super::ids::AgentId;
use super::view::GeoEntity;
use crate::common::Attributes;
use crate::domains::geometry::{Position, Shape};

/// A fixed spatial region with occupancy state, usually built from one input feature.
#[derive(Debug, Clone)]
pub struct Patch<S> {
    shape: Option<S>,
    pos: Option<Position>,
    occupant: Option<AgentId>,
    pub attributes: Attributes,
}

impl<S: Shape> Patch<S> {
    pub fn new(shape: S) -> Self {
        Self {
            pos: shape.representative_point(),
            shape: Some(shape),
            occupant: None,
            attributes: Attributes::new(),
        }
    }

    /// A patch that has attributes but no footprint yet. Spaces refuse these.
    pub fn unshaped(attributes: Attributes) -> Self {
        Self {
            shape: None,
            pos: None,
            occupant: None,
            attributes,
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn shape(&self) -> Option<&S> {
        self.shape.as_ref()
    }

    pub fn pos(&self) -> Option<Position> {
        self.pos
    }

    pub fn occupant(&self) -> Option<AgentId> {
        self.occupant
    }

    pub fn is_vacant(&self) -> bool {
        self.occupant.is_none()
    }

    pub(crate) fn occupy(&mut self, agent: AgentId) {
        self.occupant = Some(agent);
    }

    pub(crate) fn vacate(&mut self) -> Option<AgentId> {
        self.occupant.take()
    }

    /// Patches are passive; the hook does nothing.
    pub fn step(&mut self) {}
}

impl<S: Shape> GeoEntity for Patch<S> {
    type Shape = S;

    fn shape(&self) -> Option<&S> {
        self.shape.as_ref()
    }

    fn position(&self) -> Option<Position> {
        self.pos
    }

    fn properties(&self) -> Attributes {
        let mut props = self.attributes.clone();
        if let Some(pos) = self.pos {
            props.entry("pos").or_insert_with(|| pos.to_json());
        }
        props.entry("empty").or_insert_with(|| self.is_vacant().into());
        props
    }
}

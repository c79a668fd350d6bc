use super::ids::{AgentId, ModelId};
use super::view::{feature_view, GeoEntity};
use crate::common::Attributes;
use crate::domains::geometry::{Position, Shape};
use crate::domains::schedule::StepContext;
use geojson::Feature;

/// State every agent carries regardless of its domain behaviour.
#[derive(Debug, Clone)]
pub struct AgentCore<S> {
    unique_id: AgentId,
    model: Option<ModelId>,
    shape: Option<S>,
    pos: Option<Position>,
    pub attributes: Attributes,
}

impl<S: Shape> AgentCore<S> {
    pub fn new(unique_id: AgentId, shape: Option<S>) -> Self {
        let pos = shape.as_ref().and_then(Shape::representative_point);
        Self {
            unique_id,
            model: None,
            shape,
            pos,
            attributes: Attributes::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn unique_id(&self) -> AgentId {
        self.unique_id
    }

    pub fn model(&self) -> Option<ModelId> {
        self.model
    }

    pub fn bind_model(&mut self, model: ModelId) {
        self.model = Some(model);
    }

    pub fn unbind_model(&mut self) {
        self.model = None;
    }

    pub fn shape(&self) -> Option<&S> {
        self.shape.as_ref()
    }

    pub fn pos(&self) -> Option<Position> {
        self.pos
    }

    /// Take over another entity's footprint, keeping its cached position.
    pub fn adopt(&mut self, shape: S, pos: Option<Position>) {
        self.pos = pos.or_else(|| shape.representative_point());
        self.shape = Some(shape);
    }

    /// Input attributes plus `unique_id` and `pos`. An input attribute of the same
    /// name wins over the derived value.
    pub fn properties(&self) -> Attributes {
        let mut props = self.attributes.clone();
        props
            .entry("unique_id")
            .or_insert_with(|| self.unique_id.0.into());
        if let Some(pos) = self.pos {
            props.entry("pos").or_insert_with(|| pos.to_json());
        }
        props
    }
}

impl<S: Shape> GeoEntity for AgentCore<S> {
    type Shape = S;

    fn shape(&self) -> Option<&S> {
        self.shape.as_ref()
    }

    fn position(&self) -> Option<Position> {
        self.pos
    }

    fn properties(&self) -> Attributes {
        AgentCore::properties(self)
    }
}

/// A mobile simulation unit with per-step behaviour.
pub trait Agent: Sized {
    type Shape: Shape;
    /// Per-step counters the model resets and the agents feed.
    type Metrics: Default;

    fn core(&self) -> &AgentCore<Self::Shape>;

    fn core_mut(&mut self) -> &mut AgentCore<Self::Shape>;

    fn step(&mut self, _ctx: &mut StepContext<'_, Self>) {}

    fn unique_id(&self) -> AgentId {
        self.core().unique_id()
    }

    fn shape(&self) -> Option<&Self::Shape> {
        self.core().shape()
    }

    fn pos(&self) -> Option<Position> {
        self.core().pos()
    }

    fn properties(&self) -> Attributes {
        self.core().properties()
    }

    fn to_feature(&self) -> Feature {
        feature_view(self.shape(), self.properties())
    }
}

/// Agent without behaviour; useful for passive populations and tests.
#[derive(Debug, Clone)]
pub struct BasicAgent<S> {
    core: AgentCore<S>,
}

impl<S: Shape> BasicAgent<S> {
    pub fn new(unique_id: AgentId, shape: S) -> Self {
        Self { core: AgentCore::new(unique_id, Some(shape)) }
    }

    pub fn from_core(core: AgentCore<S>) -> Self {
        Self { core }
    }
}

impl<S: Shape> Agent for BasicAgent<S> {
    type Shape = S;
    type Metrics = ();

    fn core(&self) -> &AgentCore<S> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AgentCore<S> {
        &mut self.core
    }
}

use crate::common::{strip_reserved, Attributes};
use crate::domains::geometry::{Position, Shape};
use geojson::Feature;

/// Anything located in a space: agents (through their core) and patches.
pub trait GeoEntity {
    type Shape: Shape;

    fn shape(&self) -> Option<&Self::Shape>;

    fn position(&self) -> Option<Position>;

    /// Every exported attribute. Shape and model binding are never part of it.
    fn properties(&self) -> Attributes;

    /// The GeoJSON Feature handed to renderers and collectors.
    fn to_feature(&self) -> Feature {
        feature_view(self.shape(), self.properties())
    }
}

pub fn feature_view<S: Shape>(shape: Option<&S>, properties: Attributes) -> Feature {
    Feature {
        bbox: None,
        geometry: shape.map(Shape::to_geojson),
        id: None,
        properties: Some(strip_reserved(properties)),
        foreign_members: None,
    }
}

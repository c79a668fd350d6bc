use crate::common::DomainResult;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// `[x, y]`, the layout used in exported properties.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!([self.x, self.y])
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Capability interface every geometry provider must satisfy.
///
/// Space and entity code is written against this trait only; concrete providers
/// (see [`super::GeoShape`]) live at the edge and own all geometry math.
pub trait Shape: Clone + fmt::Debug {
    /// True when the two shapes share at least one point (touching counts).
    fn intersects(&self, other: &Self) -> bool;

    /// True when `point` lies in the interior of the shape.
    fn contains_point(&self, point: Position) -> bool;

    /// Minimum distance in the shapes' native coordinate units.
    fn distance(&self, other: &Self) -> f64;

    /// Boundary coordinates, one entry per part. Multi-part shapes yield every part.
    fn boundary_parts(&self) -> Vec<Vec<Position>>;

    /// A point guaranteed to lie on the shape, `None` for empty geometries.
    fn representative_point(&self) -> Option<Position>;

    fn from_geojson(geometry: &geojson::Geometry) -> DomainResult<Self>;

    fn to_geojson(&self) -> geojson::Geometry;
}

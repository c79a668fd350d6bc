use super::shape::{Position, Shape};
use crate::common::{DomainError, DomainResult};
use geo::{
    Contains, CoordsIter, EuclideanDistance, Geometry, InteriorPoint, Intersects, LineString,
    Point, Polygon, Rect,
};

/// Geometry provider backed by the georust `geo` crate.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoShape(Geometry<f64>);

impl GeoShape {
    pub fn new(geometry: Geometry<f64>) -> Self {
        Self(geometry)
    }

    pub fn point(x: f64, y: f64) -> Self {
        Self(Geometry::Point(Point::new(x, y)))
    }

    /// Axis-aligned rectangle given two opposite corners.
    pub fn rect(a: (f64, f64), b: (f64, f64)) -> Self {
        let rect = Rect::new(geo::coord! { x: a.0, y: a.1 }, geo::coord! { x: b.0, y: b.1 });
        Self(Geometry::Polygon(rect.to_polygon()))
    }

    pub fn geometry(&self) -> &Geometry<f64> {
        &self.0
    }

    pub fn into_inner(self) -> Geometry<f64> {
        self.0
    }
}

impl From<Geometry<f64>> for GeoShape {
    fn from(geometry: Geometry<f64>) -> Self {
        Self(geometry)
    }
}

fn ring(line: &LineString<f64>) -> Vec<Position> {
    line.coords().map(|c| Position::new(c.x, c.y)).collect()
}

fn exterior(polygon: &Polygon<f64>) -> Vec<Position> {
    ring(polygon.exterior())
}

fn parts(geometry: &Geometry<f64>) -> Vec<Vec<Position>> {
    match geometry {
        Geometry::Polygon(p) => vec![exterior(p)],
        Geometry::MultiPolygon(mp) => mp.iter().map(exterior).collect(),
        Geometry::Rect(r) => vec![exterior(&r.to_polygon())],
        Geometry::Triangle(t) => vec![exterior(&t.to_polygon())],
        Geometry::GeometryCollection(gc) => gc.iter().flat_map(parts).collect(),
        other => vec![other
            .coords_iter()
            .map(|c| Position::new(c.x, c.y))
            .collect()],
    }
}

impl Shape for GeoShape {
    fn intersects(&self, other: &Self) -> bool {
        self.0.intersects(&other.0)
    }

    fn contains_point(&self, point: Position) -> bool {
        self.0.contains(&Point::new(point.x, point.y))
    }

    fn distance(&self, other: &Self) -> f64 {
        self.0.euclidean_distance(&other.0)
    }

    fn boundary_parts(&self) -> Vec<Vec<Position>> {
        parts(&self.0)
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect()
    }

    fn representative_point(&self) -> Option<Position> {
        self.0.interior_point().map(|p| Position::new(p.x(), p.y()))
    }

    fn from_geojson(geometry: &geojson::Geometry) -> DomainResult<Self> {
        Geometry::<f64>::try_from(geometry.clone())
            .map(Self)
            .map_err(|e| DomainError::malformed(format!("unsupported geometry: {}", e)))
    }

    fn to_geojson(&self) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::from(&self.0))
    }
}

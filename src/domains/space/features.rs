use crate::common::{Attributes, DomainError, DomainResult};
use geojson::{Feature, GeoJson, Value as GeometryValue};

const RECOGNIZED_TYPES: [&str; 9] = [
    "Point",
    "MultiPoint",
    "LineString",
    "MultiLineString",
    "Polygon",
    "MultiPolygon",
    "GeometryCollection",
    "Feature",
    "FeatureCollection",
];

/// One entity-to-be: a geometry plus the properties copied onto it.
#[derive(Debug, Clone)]
pub struct FeatureRecord {
    pub geometry: geojson::Geometry,
    pub attributes: Attributes,
}

fn discriminator(input: &serde_json::Value) -> Option<&str> {
    input.get("type").and_then(serde_json::Value::as_str)
}

/// Flatten a GeoJSON document into records in encounter order.
///
/// Geometry collections expand into one record per member; features keep their
/// properties verbatim, unknown keys included.
pub fn decode_features(input: &serde_json::Value) -> DomainResult<Vec<FeatureRecord>> {
    let kind = discriminator(input)
        .ok_or_else(|| DomainError::malformed("missing `type` discriminator"))?;
    if !RECOGNIZED_TYPES.contains(&kind) {
        return Err(DomainError::malformed(format!("unrecognized type `{}`", kind)));
    }

    let geojson = GeoJson::from_json_value(input.clone())
        .map_err(|e| DomainError::malformed(e.to_string()))?;

    match geojson {
        GeoJson::Geometry(geometry) => Ok(expand_geometry(geometry)),
        GeoJson::Feature(feature) => Ok(vec![feature_record(feature)?]),
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .map(feature_record)
            .collect(),
    }
}

/// Decode a single serialized entity view, as produced by `GeoEntity::to_feature`.
pub fn decode_record(input: &serde_json::Value) -> DomainResult<FeatureRecord> {
    let kind = discriminator(input).ok_or_else(|| DomainError::TypeMismatch {
        reason: "expected a GeoJSON object with a `type`".to_string(),
    })?;
    if matches!(kind, "FeatureCollection" | "GeometryCollection") {
        return Err(DomainError::TypeMismatch {
            reason: format!("expected a single feature, got `{}`", kind),
        });
    }

    let geojson = GeoJson::from_json_value(input.clone()).map_err(|e| DomainError::TypeMismatch {
        reason: e.to_string(),
    })?;

    match geojson {
        GeoJson::Geometry(geometry) => Ok(FeatureRecord {
            geometry,
            attributes: Attributes::new(),
        }),
        GeoJson::Feature(feature) => {
            let geometry = feature.geometry.ok_or_else(|| DomainError::MissingShape {
                what: "feature record has a null geometry".to_string(),
            })?;
            Ok(FeatureRecord {
                geometry,
                attributes: feature.properties.unwrap_or_default(),
            })
        }
        GeoJson::FeatureCollection(_) => Err(DomainError::TypeMismatch {
            reason: "expected a single feature, got `FeatureCollection`".to_string(),
        }),
    }
}

fn expand_geometry(geometry: geojson::Geometry) -> Vec<FeatureRecord> {
    match geometry.value {
        GeometryValue::GeometryCollection(members) => members
            .into_iter()
            .map(|geometry| FeatureRecord {
                geometry,
                attributes: Attributes::new(),
            })
            .collect(),
        _ => vec![FeatureRecord {
            geometry,
            attributes: Attributes::new(),
        }],
    }
}

fn feature_record(feature: Feature) -> DomainResult<FeatureRecord> {
    let geometry = feature
        .geometry
        .ok_or_else(|| DomainError::malformed("feature without geometry"))?;
    Ok(FeatureRecord {
        geometry,
        attributes: feature.properties.unwrap_or_default(),
    })
}

use crate::common::DomainResult;

/// Port the space depends on for loading input feature collections.
/// Implementations (adapters) provide filesystem or network-backed sources.
pub trait FeatureDataSource: Send + Sync {
    /// Raw GeoJSON text for `name`.
    fn load_geojson(&self, name: &str) -> DomainResult<String>;

    /// Parsed GeoJSON document for `name`, ready for `Space::create_patches`.
    fn load_features(&self, name: &str) -> DomainResult<serde_json::Value> {
        let raw = self.load_geojson(name)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

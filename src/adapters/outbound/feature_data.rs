use crate::common::{DomainError, DomainResult};
use crate::domains::space::ports::FeatureDataSource;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "GEOAGENTS_DATA_DIR";

/// Reads GeoJSON documents from `<base>/geojson/<name>`.
pub struct FilesystemDataSource {
    base: PathBuf,
}

impl FilesystemDataSource {
    /// Base precedence: explicit path -> `GEOAGENTS_DATA_DIR` -> ./resources -> /usr/share/geoagents
    pub fn new(base: Option<PathBuf>) -> Self {
        let base = base.unwrap_or_else(|| {
            if let Ok(v) = env::var(DATA_DIR_ENV) {
                PathBuf::from(v)
            } else {
                let cwd_default = Path::new("resources");
                if cwd_default.exists() {
                    cwd_default.to_path_buf()
                } else {
                    PathBuf::from("/usr/share/geoagents")
                }
            }
        });
        Self { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn geojson_path(&self, name: &str) -> PathBuf {
        self.base.join("geojson").join(name)
    }

    /// Write a document under the geojson folder, creating it as needed.
    pub fn save_features(&self, name: &str, features: &serde_json::Value) -> DomainResult<()> {
        let path = self.geojson_path(name);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| DomainError::InfrastructureError(format!("{}", e)))?;
        }
        let body = serde_json::to_string_pretty(features)?;
        fs::write(&path, body).map_err(|e| DomainError::InfrastructureError(format!("{}", e)))
    }

    /// Names of the documents available under the geojson folder, sorted.
    pub fn list_features(&self) -> DomainResult<Vec<String>> {
        let dir = self.base.join("geojson");
        let entries = fs::read_dir(&dir).map_err(|e| DomainError::InfrastructureError(format!("{}", e)))?;
        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "geojson" || ext == "json"))
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        names.sort();
        Ok(names)
    }
}

impl FeatureDataSource for FilesystemDataSource {
    fn load_geojson(&self, name: &str) -> DomainResult<String> {
        let path = self.geojson_path(name);
        fs::read_to_string(&path).map_err(|e| {
            DomainError::InfrastructureError(format!("{}: {}", path.display(), e))
        })
    }
}

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domains::schelling::SegregationParams;

pub const ENV_PREFIX: &str = "GEOAGENTS";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub schelling: SchellingConfig,
    pub data: DataConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed seed for reproducible runs; clock-derived when absent.
    pub seed: Option<u64>,
    pub max_steps: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchellingConfig {
    pub density: f64,
    pub minority_pc: f64,
    /// GeoJSON document name under the data directory.
    pub regions: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: Option<String>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_steps: 100,
        }
    }
}

impl Default for SchellingConfig {
    fn default() -> Self {
        let params = SegregationParams::default();
        Self {
            density: params.density,
            minority_pc: params.minority_pc,
            regions: "regions.geojson".to_string(),
        }
    }
}

impl SchellingConfig {
    pub fn params(&self) -> SegregationParams {
        SegregationParams {
            density: self.density,
            minority_pc: self.minority_pc,
        }
    }
}

impl Config {
    /// Load `path` (optional) layered with `GEOAGENTS__SECTION__KEY` environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

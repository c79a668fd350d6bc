use geojson::{Feature, FeatureCollection, JsonObject};
use serde::{Deserialize, Serialize};

/// Schema-free attribute store copied from input feature properties.
pub type Attributes = JsonObject;

/// Keys never exported through the entity view.
pub const RESERVED_KEYS: [&str; 3] = ["shape", "model", "grid"];

/// Snapshot of a whole space as handed to renderers and collectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceSnapshot {
    pub step: u64,
    pub agents: FeatureCollection,
    pub patches: FeatureCollection,
}

impl SpaceSnapshot {
    pub fn new(step: u64, agents: Vec<Feature>, patches: Vec<Feature>) -> Self {
        Self {
            step,
            agents: collection(agents),
            patches: collection(patches),
        }
    }

    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

pub fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Drop reserved keys so the exported properties never leak internals.
pub fn strip_reserved(mut properties: Attributes) -> Attributes {
    for key in RESERVED_KEYS {
        properties.remove(key);
    }
    properties
}

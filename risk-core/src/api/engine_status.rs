use serde::{Deserialize, Serialize};

use crate::logic::assessment::RiskEngine;
use crate::logic::features::{layout_hash, FEATURE_COUNT, FEATURE_VERSION};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub feature_version: u8,
    pub layout_hash: u32,
    pub feature_count: usize,

    pub model: ModelStatus,
    pub catalog: CatalogStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStatus {
    pub engine: String, // "linear" | "remote"
    pub model_name: String,
    pub model_version: String,
    pub classes: Vec<String>,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogStatus {
    pub version: String,
    pub entries: usize,
}

/// Model info, as served to clients that render feature forms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub features_count: usize,
    pub feature_names: Vec<String>,
    pub classes: Vec<String>,
    pub metadata: serde_json::Value,
}

impl EngineStatus {
    pub fn collect(engine: &RiskEngine) -> Self {
        let meta = engine.model_metadata();
        let catalog = engine.catalog();

        EngineStatus {
            feature_version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            model: ModelStatus {
                engine: meta.model_type.clone(),
                model_name: meta.name.clone(),
                model_version: meta.version.clone(),
                classes: meta.classes.clone(),
                loaded_at: meta.loaded_at,
            },
            catalog: CatalogStatus {
                version: catalog.version.clone(),
                entries: catalog.entries.len(),
            },
        }
    }
}

impl ModelInfo {
    pub fn collect(engine: &RiskEngine) -> Self {
        let meta = engine.model_metadata();

        ModelInfo {
            model_type: meta.model_type.clone(),
            features_count: meta.feature_names.len(),
            feature_names: meta.feature_names.clone(),
            classes: meta.classes.clone(),
            metadata: serde_json::to_value(meta).unwrap_or(serde_json::Value::Null),
        }
    }
}

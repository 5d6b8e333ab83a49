//! Pipeline configuration file.

use std::path::Path;

use floodlens_cluster::BisectConfig;
use floodlens_importance::ScorerConfig;
use floodlens_jenks::TierConfig;
use serde::{Deserialize, Serialize};

/// Settings for every pipeline stage. Missing sections keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub bisect: BisectConfig,
    pub scorer: ScorerConfig,
    pub tiers: TierConfig,

    /// Known location names.
    pub locations: Vec<String>,

    /// Clusters to report. Default: 10.
    pub top: Option<usize>,
}

impl PipelineConfig {
    pub fn top(&self) -> usize {
        self.top.unwrap_or(10)
    }
}

/// Loads the config at `path`, or the defaults when there is none.
pub fn load(path: Option<&str>) -> anyhow::Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config {path}: {e}"))?;
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("yaml");

    let cfg = match ext.to_lowercase().as_str() {
        "json" => serde_json::from_str(&content)?,
        _ => serde_yaml::from_str(&content)?,
    };
    Ok(cfg)
}

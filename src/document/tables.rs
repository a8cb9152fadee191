//! Rate and label tables consumed by the field mapper.
//!
//! Defaults are compiled in; a JSON file can override any subset of them.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::fees::FeeSchedule;
use crate::contract::model::Stage;

/// Arabic stage names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageLabels {
    pub kindergarten: String,
    pub elementary: String,
    pub middle: String,
    pub high: String,
}

impl Default for StageLabels {
    fn default() -> Self {
        Self {
            kindergarten: "رياض الأطفال".to_string(),
            elementary: "الابتدائية".to_string(),
            middle: "المتوسطة".to_string(),
            high: "الثانوية".to_string(),
        }
    }
}

impl StageLabels {
    /// Arabic name for a stage; unknown stages pass through unchanged.
    pub fn label_for<'a>(&'a self, stage: &'a Stage) -> &'a str {
        match stage {
            Stage::Kindergarten => &self.kindergarten,
            Stage::Elementary => &self.elementary,
            Stage::Middle => &self.middle,
            Stage::High => &self.high,
            Stage::Other(raw) => raw,
        }
    }
}

/// Every table the field mapper needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentTables {
    pub fees: FeeSchedule,
    pub stage_labels: StageLabels,
}

impl DocumentTables {
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let tables = serde_json::from_str(&raw)?;
        log::info!("Loaded document tables from {}", path.display());
        Ok(tables)
    }
}

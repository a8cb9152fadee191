use anyhow::Context;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::document::template::GenderRule;
use crate::document::{
    CalendarConverter, ContractRenderEngine, DocumentTables, DocxTemplate, FieldMapper,
};

/// Shared, read-only state handed to every worker.
pub struct AppState {
    pub engine: ContractRenderEngine,
}

impl AppState {
    /// Load the template and tables named by the configuration.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let tables = match &config.tables_path {
            Some(path) => DocumentTables::from_json_file(path)
                .with_context(|| format!("failed to load tables from {}", path.display()))?,
            None => DocumentTables::default(),
        };

        let template = DocxTemplate::from_path(&config.template_path, &GenderRule::default())
            .with_context(|| {
                format!(
                    "failed to load contract template from {}",
                    config.template_path.display()
                )
            })?;

        let mapper = FieldMapper::new(CalendarConverter::system(), tables);
        Ok(Self::new(ContractRenderEngine::new(mapper, Arc::new(template))))
    }

    pub fn new(engine: ContractRenderEngine) -> Self {
        Self { engine }
    }
}

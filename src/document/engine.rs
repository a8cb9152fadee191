//! Contract rendering engine.
//!
//! Holds the parsed template and the field mapper. Both are immutable after
//! construction, so one engine is shared by every worker.

use std::sync::Arc;

use crate::contract::model::Contract;

use super::common::contract_filename;
use super::docx::DocxTemplate;
use super::mapper::FieldMapper;
use super::placeholders::PlaceholderMap;
use super::traits::Generator;
use super::{DocumentError, GeneratedDocument};

#[derive(Debug, Clone)]
pub struct ContractRenderEngine {
    mapper: FieldMapper,
    template: Arc<DocxTemplate>,
}

impl ContractRenderEngine {
    pub fn new(mapper: FieldMapper, template: Arc<DocxTemplate>) -> Self {
        Self { mapper, template }
    }

    pub fn mapper(&self) -> &FieldMapper {
        &self.mapper
    }

    pub fn template(&self) -> &DocxTemplate {
        &self.template
    }

    /// The values that would be written into the template, without rendering.
    pub fn placeholders(&self, contract: &Contract) -> Result<PlaceholderMap, DocumentError> {
        self.mapper.build_placeholders(contract)
    }
}

impl<'a> Generator<&'a Contract> for ContractRenderEngine {
    fn generate(&self, contract: &'a Contract) -> Result<GeneratedDocument, DocumentError> {
        let placeholders = self.mapper.build_placeholders(contract)?;
        let docx = self.template.render(&placeholders)?;

        let student_name = contract.student.as_ref().and_then(|s| s.name.as_deref());
        let filename = contract_filename(student_name);
        let issued_on = self.mapper.calendar().today().format("%Y-%m-%d").to_string();

        log::info!("Rendered contract {} ({} bytes)", filename, docx.len());

        Ok(GeneratedDocument {
            filename,
            docx,
            issued_on,
        })
    }
}

impl ContractRenderEngine {
    pub fn generate(&self, contract: &Contract) -> Result<GeneratedDocument, DocumentError> {
        Generator::generate(self, contract)
    }
}

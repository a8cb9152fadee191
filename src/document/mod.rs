//! Document module - turns an enrollment contract into a rendered `.docx` file.
//!
//! The pipeline is split into small, stateless pieces:
//! - `numerals` - ASCII to Arabic-Indic digit localization
//! - `calendar` - Gregorian/Hijri conversion and the injectable clock
//! - `fees` - tuition and transportation charges
//! - `mapper` - contract record to placeholder map
//! - `template` / `docx` - template model and the Word container around it
//! - `engine` - wires the pieces together behind the `Generator` trait

pub mod calendar;
pub mod common;
pub mod docx;
pub mod engine;
pub mod fees;
pub mod mapper;
pub mod numerals;
pub mod placeholders;
pub mod tables;
pub mod template;
pub mod traits;
pub mod validation;

pub use calendar::{CalendarConverter, CalendarDate, Clock, FixedClock, HijriDate, SystemClock};
pub use docx::DocxTemplate;
pub use engine::ContractRenderEngine;
pub use fees::{FeeBreakdown, FeeSchedule};
pub use mapper::FieldMapper;
pub use placeholders::{PlaceholderMap, PlaceholderValue};
pub use tables::DocumentTables;
pub use traits::{Generator, Validator};

use thiserror::Error;

/// Errors that can occur during document generation.
///
/// Any of these aborts the whole render; no partial document is returned.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("calendar conversion failed: {0}")]
    CalendarConversion(String),
    #[error("contract could not be mapped to template fields: {0}")]
    FieldMapping(String),
    #[error("template rendering failed: {0}")]
    TemplateRender(String),
    #[error("failed to load contract template: {0}")]
    TemplateIo(#[source] std::io::Error),
    #[error("contract template is not a valid document archive: {0}")]
    TemplateArchive(#[source] zip::result::ZipError),
}

impl DocumentError {
    /// Short, stable name of the error kind for API responses and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CalendarConversion(_) => "CalendarConversionError",
            Self::FieldMapping(_) => "FieldMappingError",
            Self::TemplateRender(_) | Self::TemplateIo(_) | Self::TemplateArchive(_) => {
                "TemplateRenderError"
            }
        }
    }
}

/// Result of a successful document generation.
#[derive(Debug)]
pub struct GeneratedDocument {
    pub filename: String,
    pub docx: Vec<u8>,
    /// Gregorian date (ISO) the contract was issued on.
    pub issued_on: String,
}

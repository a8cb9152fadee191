//! Word (`.docx`) container around the template model.
//!
//! The archive is read once; every `word/*.xml` part that contains tags is
//! parsed into a [`Template`]. Rendering fills all parts first and only then
//! writes a new archive, copying the untouched parts verbatim.

use std::fs;
use std::io::{self, Cursor, Read, Write};
use std::path::Path;

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::placeholders::PlaceholderMap;
use super::template::{GenderRule, Template, TAG_OPEN};
use super::DocumentError;

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// A tagged part inside the archive, e.g. `word/document.xml`.
#[derive(Debug)]
struct TemplatePart {
    name: String,
    template: Template,
}

/// Immutable, shareable `.docx` template.
#[derive(Debug)]
pub struct DocxTemplate {
    archive: Vec<u8>,
    parts: Vec<TemplatePart>,
}

impl DocxTemplate {
    /// Load and parse a template file.
    pub fn from_path(path: &Path, rule: &GenderRule) -> Result<Self, DocumentError> {
        log::info!("Loading contract template from {}", path.display());
        let bytes = fs::read(path).map_err(DocumentError::TemplateIo)?;
        Self::from_bytes(bytes, rule)
    }

    pub fn from_bytes(archive: Vec<u8>, rule: &GenderRule) -> Result<Self, DocumentError> {
        let parts = parse_parts(&archive, rule)?;

        if !parts.iter().any(|part| part.name == "word/document.xml") {
            return Err(DocumentError::TemplateRender(
                "word/document.xml is missing or has no tags".to_string(),
            ));
        }

        Ok(Self { archive, parts })
    }

    /// Names of the tagged parts, in archive order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|part| part.name.as_str())
    }

    /// The parsed body of `word/document.xml`.
    pub fn body(&self) -> Option<&Template> {
        self.parts
            .iter()
            .find(|part| part.name == "word/document.xml")
            .map(|part| &part.template)
    }

    /// Fill every tagged part and return the new archive bytes.
    pub fn render(&self, placeholders: &PlaceholderMap) -> Result<Vec<u8>, DocumentError> {
        let mut rendered = Vec::with_capacity(self.parts.len());
        for part in &self.parts {
            let xml = part
                .template
                .render(placeholders)
                .map_err(|e| in_part(&part.name, e))?;
            rendered.push((part.name.as_str(), xml));
        }

        self.write_archive(&rendered).map_err(|e| {
            DocumentError::TemplateRender(format!("failed to write document archive: {e}"))
        })
    }

    fn write_archive(&self, rendered: &[(&str, String)]) -> zip::result::ZipResult<Vec<u8>> {
        let mut source = ZipArchive::new(Cursor::new(self.archive.as_slice()))?;
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        for index in 0..source.len() {
            let mut entry = source.by_index(index)?;
            let name = entry.name().to_string();
            if entry.is_dir() {
                writer.add_directory(name, options)?;
                continue;
            }

            writer.start_file(name.as_str(), options)?;
            match rendered.iter().find(|(part, _)| *part == name) {
                Some((_, xml)) => writer.write_all(xml.as_bytes())?,
                None => {
                    io::copy(&mut entry, &mut writer)?;
                }
            }
        }

        Ok(writer.finish()?.into_inner())
    }
}

fn parse_parts(archive: &[u8], rule: &GenderRule) -> Result<Vec<TemplatePart>, DocumentError> {
    let mut zip = ZipArchive::new(Cursor::new(archive)).map_err(DocumentError::TemplateArchive)?;

    let mut parts = Vec::new();
    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(DocumentError::TemplateArchive)?;
        let name = entry.name().to_string();
        if !is_templated_part(&name) {
            continue;
        }

        let mut xml = String::new();
        entry
            .read_to_string(&mut xml)
            .map_err(DocumentError::TemplateIo)?;
        if !xml.contains(TAG_OPEN) {
            continue;
        }

        let template = Template::parse(&xml, rule).map_err(|e| in_part(&name, e))?;
        log::debug!(
            "Parsed template part {} ({} tags)",
            name,
            template.tag_names().len()
        );
        parts.push(TemplatePart { name, template });
    }

    Ok(parts)
}

fn in_part(part: &str, err: DocumentError) -> DocumentError {
    match err {
        DocumentError::TemplateRender(message) => {
            DocumentError::TemplateRender(format!("{part}: {message}"))
        }
        other => other,
    }
}

fn is_templated_part(name: &str) -> bool {
    name.starts_with("word/") && name.ends_with(".xml") && !name.contains("/_rels/")
}

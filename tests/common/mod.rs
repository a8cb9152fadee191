//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use chrono::NaiveDate;
use std::io::{Cursor, Read, Write};
use std::sync::Arc;
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

use ithraa_contract_server::config::TEMPLATE_FILE;
use ithraa_contract_server::contract::model::{
    ContactPerson, Contract, ContractEditor, Guardian, Payment, PaymentType, SchoolTrack, Sibling,
    Stage, Student, Transportation, TransportationPath,
};
use ithraa_contract_server::document::common::get_static_dir;
use ithraa_contract_server::document::template::GenderRule;
use ithraa_contract_server::document::{
    CalendarConverter, ContractRenderEngine, DocumentTables, DocxTemplate, FieldMapper,
    FixedClock,
};

/// 2024-03-11 is 1 Ramadan 1445, a Monday.
pub fn contract_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
}

pub fn fixed_mapper() -> FieldMapper {
    FieldMapper::new(
        CalendarConverter::new(Arc::new(FixedClock(contract_day()))),
        DocumentTables::default(),
    )
}

/// Engine over the template shipped in `static/`.
pub fn shipped_engine() -> ContractRenderEngine {
    let path = get_static_dir().join(TEMPLATE_FILE);
    let template = DocxTemplate::from_path(&path, &GenderRule::default()).unwrap();
    ContractRenderEngine::new(fixed_mapper(), Arc::new(template))
}

/// Engine over a one-part template built in memory.
pub fn engine_for(document_xml: &str) -> ContractRenderEngine {
    let template =
        DocxTemplate::from_bytes(build_docx(document_xml), &GenderRule::default()).unwrap();
    ContractRenderEngine::new(fixed_mapper(), Arc::new(template))
}

pub fn build_docx(document_xml: &str) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default();
    writer.start_file("[Content_Types].xml", options).unwrap();
    writer.write_all(b"<Types/>").unwrap();
    writer.start_file("word/document.xml", options).unwrap();
    writer.write_all(document_xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

pub fn read_part(docx: &[u8], name: &str) -> String {
    let mut zip = ZipArchive::new(Cursor::new(docx)).unwrap();
    let mut entry = zip.by_name(name).unwrap();
    let mut xml = String::new();
    entry.read_to_string(&mut xml).unwrap();
    xml
}

/// A complete girls' elementary contract with one sibling and one contact.
pub fn sample_contract() -> Contract {
    Contract {
        guardian: Some(Guardian {
            name: Some("أحمد محمد".to_string()),
            id_number: Some("1010101010".to_string()),
            relationship: Some("أب".to_string()),
            absher_mobile_number: Some("0551234567".to_string()),
            contact_persons: vec![ContactPerson {
                name: Some("خالد".to_string()),
                relationship: Some("عم".to_string()),
                mobile_number: Some("0500000000".to_string()),
            }],
            ..Default::default()
        }),
        contract_editor: Some(ContractEditor {
            name: Some("أحمد محمد".to_string()),
            ..Default::default()
        }),
        student: Some(Student {
            name: Some("سارة أحمد".to_string()),
            nationality: Some("سعودية".to_string()),
            birth_date: NaiveDate::from_ymd_opt(2015, 8, 20),
            id_number: Some("1122334455".to_string()),
            id_issue_date: NaiveDate::from_ymd_opt(2016, 1, 5),
            required_school: Some(SchoolTrack::Girls),
            required_stage: Some(Stage::Elementary),
            required_grade: Some("الصف الثالث".to_string()),
            has_siblings_in_ithraa: Some(true),
            siblings: vec![Sibling {
                name: Some("ريم".to_string()),
                school: Some("إثراء".to_string()),
                stage: Some(Stage::Middle),
                grade: Some("الصف الثاني".to_string()),
            }],
            ..Default::default()
        }),
        payment: Some(Payment {
            payment_type: Some(PaymentType::Annual),
            transportation: Transportation {
                required: Some(true),
                neighborhood: Some("النرجس".to_string()),
                path: Some(TransportationPath::TwoPaths),
            },
        }),
    }
}

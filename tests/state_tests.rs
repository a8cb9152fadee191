mod common;

use std::fs;
use tempfile::tempdir;

use common::{build_docx, sample_contract};
use ithraa_contract_server::contract::model::Stage;
use ithraa_contract_server::{AppConfig, AppState};

#[test]
fn test_state_from_config_with_table_overrides() {
    let dir = tempdir().unwrap();
    let template_path = dir.path().join("contract.docx");
    fs::write(
        &template_path,
        build_docx("<w:t>{%student_required_stage%} {%SchoolMoneyRequired%}</w:t>"),
    )
    .unwrap();

    let tables_path = dir.path().join("tables.json");
    fs::write(
        &tables_path,
        r#"{ "fees": { "elementary": 25000 }, "stage_labels": { "elementary": "المرحلة الابتدائية" } }"#,
    )
    .unwrap();

    let config = AppConfig {
        template_path,
        tables_path: Some(tables_path),
        ..AppConfig::default()
    };
    let state = AppState::from_config(&config).unwrap();

    let mapper = state.engine.mapper();
    assert_eq!(mapper.tables().fees.elementary, 25000);
    assert_eq!(mapper.tables().fees.middle, 25100);
    assert_eq!(
        mapper.tables().stage_labels.label_for(&Stage::Elementary),
        "المرحلة الابتدائية"
    );

    let map = state.engine.placeholders(&sample_contract()).unwrap();
    assert_eq!(map.text("SchoolMoneyRequired"), Some("25000"));
}

#[test]
fn test_state_fails_on_missing_template() {
    let dir = tempdir().unwrap();
    let config = AppConfig {
        template_path: dir.path().join("missing.docx"),
        ..AppConfig::default()
    };

    let err = AppState::from_config(&config).err().unwrap();
    assert!(format!("{:#}", err).contains("missing.docx"));
}

#[test]
fn test_state_fails_on_bad_tables() {
    let dir = tempdir().unwrap();
    let tables_path = dir.path().join("tables.json");
    fs::write(&tables_path, "{ not json").unwrap();

    let config = AppConfig {
        tables_path: Some(tables_path),
        ..AppConfig::default()
    };

    assert!(AppState::from_config(&config).is_err());
}

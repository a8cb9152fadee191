mod common;

use actix_web::{http::header, http::StatusCode, test, web, App};
use serde_json::{json, Value};

use common::{read_part, sample_contract, shipped_engine};
use ithraa_contract_server::contract::handlers;
use ithraa_contract_server::document::docx::DOCX_MIME;
use ithraa_contract_server::AppState;

macro_rules! init_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new(shipped_engine())))
                .service(web::scope("/api").configure(handlers::config)),
        )
        .await
    };
}

#[actix_web::test]
async fn test_render_returns_docx_attachment() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/contracts/render")
        .set_json(sample_contract())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), DOCX_MIME);
    let disposition = headers
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("filename*=UTF-8''"));
    assert_eq!(headers.get("X-Contract-Issued-On").unwrap(), "2024-03-11");

    let body = test::read_body(resp).await;
    let xml = read_part(&body, "word/document.xml");
    assert!(xml.contains("سارة أحمد"));
}

#[actix_web::test]
async fn test_render_missing_date_is_unprocessable() {
    let app = init_app!();

    let mut contract = sample_contract();
    contract.student.as_mut().unwrap().id_issue_date = None;

    let req = test::TestRequest::post()
        .uri("/api/contracts/render")
        .set_json(contract)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "FieldMappingError");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("student.idIssueDate"));
}

#[actix_web::test]
async fn test_render_rejects_malformed_json() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/contracts/render")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload(r#"{"student": {"birthDate": "not a date"}}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "BadRequest");
}

#[actix_web::test]
async fn test_placeholders_preview() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/contracts/placeholders")
        .set_json(sample_contract())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["student_name"], "سارة أحمد");
    assert_eq!(body["isGirlsSchool"], true);
    assert_eq!(body["TotalSchoolMoneyRequired"], "29850");
    assert_eq!(body["siblings"][0]["grade"], "الثاني");
    assert_eq!(body["contractDate_Hyear"], "١٤٤٥");
}

#[actix_web::test]
async fn test_fee_quote() {
    let app = init_app!();

    let req = test::TestRequest::get()
        .uri("/api/contracts/fees?stage=High&path=One%20path")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        body,
        json!({
            "baseTuition": 26100,
            "transportationSurcharge": 3450,
            "total": 29550,
            "pathLabel": "مسار واحد"
        })
    );
}

#[actix_web::test]
async fn test_fee_quote_without_path() {
    let app = init_app!();

    let req = test::TestRequest::get()
        .uri("/api/contracts/fees?stage=Middle")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total"], 25100);
    assert_eq!(body["transportationSurcharge"], 0);
    assert_eq!(body["pathLabel"], Value::Null);
}

use actix_web::error::JsonPayloadError;
use actix_web::http::header::{
    Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue,
};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::contract::model::{Contract, Stage, TransportationPath};
use crate::document::docx::DOCX_MIME;
use crate::document::fees::FeeBreakdown;
use crate::document::DocumentError;
use crate::{AppState, ErrorResponse};

/// Largest contract payload accepted, in bytes.
const JSON_LIMIT: usize = 256 * 1024;

impl From<DocumentError> for HttpResponse {
    fn from(error: DocumentError) -> Self {
        let body = ErrorResponse::new(error.kind(), &error.to_string());
        match error {
            DocumentError::FieldMapping(_) | DocumentError::CalendarConversion(_) => {
                log::warn!("Contract rejected: {}", error);
                HttpResponse::UnprocessableEntity().json(body)
            }
            _ => {
                log::error!("Contract rendering failed: {}", error);
                HttpResponse::InternalServerError().json(body)
            }
        }
    }
}

/// Render a contract to a Word document
#[utoipa::path(
    post,
    path = "/api/contracts/render",
    tag = "Contracts",
    request_body = Contract,
    responses(
        (status = 200, description = "Rendered contract", content_type = "application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        (status = 400, description = "Malformed contract payload", body = ErrorResponse),
        (status = 422, description = "Contract is missing required data", body = ErrorResponse),
        (status = 500, description = "Template could not be rendered", body = ErrorResponse)
    )
)]
pub async fn render_contract(
    state: web::Data<AppState>,
    body: web::Json<Contract>,
) -> impl Responder {
    let contract = body.into_inner();
    log::info!(
        "Render requested for student {}",
        contract
            .student
            .as_ref()
            .and_then(|s| s.id_number.as_deref())
            .unwrap_or("<unknown>")
    );
    let result = web::block(move || state.engine.generate(&contract)).await;

    match result {
        Ok(Ok(document)) => HttpResponse::Ok()
            .content_type(DOCX_MIME)
            .insert_header(attachment(&document.filename))
            .insert_header(("X-Contract-Issued-On", document.issued_on))
            .body(document.docx),
        Ok(Err(e)) => e.into(),
        Err(e) => {
            log::error!("Render worker failed: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Render worker failed"))
        }
    }
}

/// Preview the values that would be written into the template
#[utoipa::path(
    post,
    path = "/api/contracts/placeholders",
    tag = "Contracts",
    request_body = Contract,
    responses(
        (status = 200, description = "Placeholder name to value map", content_type = "application/json"),
        (status = 400, description = "Malformed contract payload", body = ErrorResponse),
        (status = 422, description = "Contract is missing required data", body = ErrorResponse)
    )
)]
pub async fn preview_placeholders(
    state: web::Data<AppState>,
    body: web::Json<Contract>,
) -> impl Responder {
    match state.engine.placeholders(&body) {
        Ok(map) => HttpResponse::Ok().json(map),
        Err(e) => e.into(),
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeeQuery {
    /// Kindergarten, Elementary, Middle or High
    pub stage: Option<String>,
    /// "One path" or "Two paths"
    pub path: Option<String>,
}

/// Quote tuition and transportation fees
#[utoipa::path(
    get,
    path = "/api/contracts/fees",
    tag = "Contracts",
    params(FeeQuery),
    responses(
        (status = 200, description = "Fee breakdown", body = FeeBreakdown)
    )
)]
pub async fn quote_fees(state: web::Data<AppState>, query: web::Query<FeeQuery>) -> impl Responder {
    let FeeQuery { stage, path } = query.into_inner();
    let stage = stage.map(Stage::from);
    let path = path.map(TransportationPath::from);

    let fees = state.engine.mapper().fees(stage.as_ref(), path.as_ref());
    HttpResponse::Ok().json(fees)
}

fn attachment(filename: &str) -> ContentDisposition {
    let ascii: String = filename
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();

    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![
            DispositionParam::Filename(ascii),
            DispositionParam::FilenameExt(ExtendedValue {
                charset: Charset::Ext("UTF-8".to_string()),
                language_tag: None,
                value: filename.as_bytes().to_vec(),
            }),
        ],
    }
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = err.to_string();
    log::warn!("Rejected contract payload: {}", message);
    let response = HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message));
    actix_web::error::InternalError::from_response(err, response).into()
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/contracts")
            .app_data(
                web::JsonConfig::default()
                    .limit(JSON_LIMIT)
                    .error_handler(json_error_handler),
            )
            .route("/render", web::post().to(render_contract))
            .route("/placeholders", web::post().to(preview_placeholders))
            .route("/fees", web::get().to(quote_fees)),
    );
}

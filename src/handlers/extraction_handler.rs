use actix_web::{http::header, post, web, HttpRequest, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{request::ExtractQuery, response::TextResponse},
    services::{
        extraction_service::UploadedFile,
        session::{PendingRequest, SessionEvent},
    },
};

/// Largest upload accepted by `/api/extract`.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[post("/api/extract")]
pub async fn extract_text(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ExtractQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let mime_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let file = UploadedFile::new(query.into_inner().filename, mime_type, body.to_vec());

    let ticket = state.session.lock().await.begin_extraction()?;
    let pending = PendingRequest::new(state.session.clone(), ticket);
    let outcome = state.extraction_service.extract(&file).await;

    let event = match &outcome {
        Ok(_) => SessionEvent::ExtractionFinished,
        Err(e) => SessionEvent::ExtractionFailed(e.to_string()),
    };
    pending.complete(event).await;

    let text = outcome?;
    Ok(HttpResponse::Ok().json(TextResponse { text }))
}

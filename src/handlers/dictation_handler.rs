use actix_web::{post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{DictationErrorRequest, DictationResultRequest, DictationStartRequest},
        response::DictationResponse,
    },
    services::speech::DICTATION_RUNNING,
};

#[post("/api/dictation/start")]
pub async fn start_dictation(
    state: web::Data<AppState>,
    request: web::Json<DictationStartRequest>,
) -> Result<HttpResponse, AppError> {
    let mut session = state.session.lock().await;
    let mut dictation = state.dictation.lock().await;
    if dictation.is_recording() {
        return Err(AppError::Busy(DICTATION_RUNNING.to_string()));
    }
    session.begin_dictation()?;

    let text = match dictation.start(&request.current_text) {
        Ok(text) => text,
        Err(e) => {
            session.end_dictation();
            return Err(e);
        }
    };

    Ok(HttpResponse::Ok().json(DictationResponse {
        text,
        recording: true,
        error: None,
    }))
}

#[post("/api/dictation/stop")]
pub async fn stop_dictation(state: web::Data<AppState>) -> HttpResponse {
    let mut session = state.session.lock().await;
    let text = state.dictation.lock().await.stop();
    session.end_dictation();

    HttpResponse::Ok().json(DictationResponse {
        text,
        recording: false,
        error: None,
    })
}

#[post("/api/dictation/result")]
pub async fn dictation_result(
    state: web::Data<AppState>,
    request: web::Json<DictationResultRequest>,
) -> HttpResponse {
    let mut dictation = state.dictation.lock().await;
    let text = dictation.on_result(&request.fragments);

    HttpResponse::Ok().json(DictationResponse {
        text,
        recording: dictation.is_recording(),
        error: None,
    })
}

#[post("/api/dictation/error")]
pub async fn dictation_error(
    state: web::Data<AppState>,
    request: web::Json<DictationErrorRequest>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;

    let mut session = state.session.lock().await;
    let mut dictation = state.dictation.lock().await;
    let message = dictation.on_error(&request.error);
    session.end_dictation();

    Ok(HttpResponse::Ok().json(DictationResponse {
        text: dictation.text(),
        recording: false,
        error: Some(message),
    }))
}

use actix_web::{get, http::header, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::{AppError, AppResult},
    models::dto::{request::AnswerRequest, response::SessionView},
    services::{
        export_service::{export_quiz_json, EXPORT_FILENAME},
        session::{Effect, SessionState, StudyResult},
    },
};

pub(crate) async fn session_view(state: &AppState) -> SessionView {
    let user = state.user_service.current().await;
    let (session_state, dictating) = {
        let session = state.session.lock().await;
        (session.state().clone(), session.is_dictating())
    };
    let dictation_available = state.dictation.lock().await.is_available();
    SessionView::new(session_state, dictating, dictation_available, user)
}

async fn apply_effect(state: &AppState, effect: Option<Effect>) -> AppResult<()> {
    if let Some(Effect::RecordAttempt(quiz, answers)) = effect {
        let entry = state.history_service.record(quiz, answers).await?;
        log::info!("Recorded quiz attempt '{}'", entry.title);
    }
    Ok(())
}

#[get("/api/session")]
pub async fn get_session(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(session_view(&state).await)
}

#[post("/api/session/answer")]
pub async fn select_answer(
    state: web::Data<AppState>,
    request: web::Json<AnswerRequest>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    state
        .session
        .lock()
        .await
        .select_answer(request.into_inner().answer)?;
    Ok(HttpResponse::Ok().json(session_view(&state).await))
}

#[post("/api/session/next")]
pub async fn next_question(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let effect = state.session.lock().await.next_question()?;
    apply_effect(&state, effect).await?;
    Ok(HttpResponse::Ok().json(session_view(&state).await))
}

#[post("/api/session/restart")]
pub async fn restart_session(state: web::Data<AppState>) -> HttpResponse {
    state.session.lock().await.restart();
    HttpResponse::Ok().json(session_view(&state).await)
}

#[get("/api/quiz/export")]
pub async fn export_quiz(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let quiz = match state.session.lock().await.state() {
        SessionState::Viewing(StudyResult::Quiz(progress)) => progress.quiz.clone(),
        _ => return Err(AppError::NotFound("There is no quiz to export".to_string())),
    };

    let json = export_quiz_json(&quiz)?;
    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
        ))
        .body(json))
}

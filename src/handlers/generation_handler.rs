use std::future::Future;

use actix_web::{post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    constants::prompts::DEFAULT_STUDENT_LEVEL,
    errors::{AppError, AppResult},
    models::dto::{
        request::{GenerateQuizRequest, TextRequest, TranslateRequest},
        response::TextResponse,
    },
    services::{
        generation_service::require_text,
        session::{PendingRequest, SessionEvent, TaskKind},
    },
};

/// Runs one generation under a session ticket and reports the outcome back to the session.
/// Blank input is rejected first so the current screen is left alone.
async fn run_generation<T, F>(
    state: &AppState,
    kind: TaskKind,
    text: &str,
    work: F,
    received: fn(T) -> SessionEvent,
) -> AppResult<T>
where
    T: Clone,
    F: Future<Output = AppResult<T>>,
{
    require_text(text)?;
    let ticket = state.session.lock().await.begin_generation(kind)?;
    let pending = PendingRequest::new(state.session.clone(), ticket);
    let outcome = work.await;

    let event = match &outcome {
        Ok(result) => received(result.clone()),
        Err(e) => SessionEvent::GenerationFailed(e.to_string()),
    };
    pending.complete(event).await;

    outcome
}

#[post("/api/quiz")]
pub async fn generate_quiz(
    state: web::Data<AppState>,
    request: web::Json<GenerateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let level = request.level.as_deref().unwrap_or(DEFAULT_STUDENT_LEVEL);

    let quiz = run_generation(
        &state,
        TaskKind::Quiz,
        &request.text,
        state.generation_service.generate_quiz(&request.text, level),
        SessionEvent::QuizReceived,
    )
    .await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[post("/api/summary")]
pub async fn summarize(
    state: web::Data<AppState>,
    request: web::Json<TextRequest>,
) -> Result<HttpResponse, AppError> {
    let summary = run_generation(
        &state,
        TaskKind::Summary,
        &request.text,
        state.generation_service.summarize(&request.text),
        SessionEvent::SummaryReceived,
    )
    .await?;
    Ok(HttpResponse::Ok().json(summary))
}

#[post("/api/flashcards")]
pub async fn generate_flashcards(
    state: web::Data<AppState>,
    request: web::Json<TextRequest>,
) -> Result<HttpResponse, AppError> {
    let deck = run_generation(
        &state,
        TaskKind::Flashcards,
        &request.text,
        state.generation_service.generate_flashcards(&request.text),
        SessionEvent::FlashcardsReceived,
    )
    .await?;
    Ok(HttpResponse::Ok().json(deck))
}

/// Translation rewrites the input text in place and does not change the session screen.
#[post("/api/translate")]
pub async fn translate(
    state: web::Data<AppState>,
    request: web::Json<TranslateRequest>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let text = state
        .generation_service
        .translate(&request.text, &request.target_language)
        .await?;
    Ok(HttpResponse::Ok().json(TextResponse { text }))
}

use actix_web::{get, web, HttpResponse};

use crate::{app_state::AppState, errors::AppError};

#[get("/api/history")]
pub async fn list_history(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.history_service.list().await)
}

/// Returns the entry and opens it in the session as a finished quiz.
#[get("/api/history/{id}")]
pub async fn load_history_entry(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let entry = state.history_service.load(&id).await?;
    state.session.lock().await.load_history(entry.clone())?;
    Ok(HttpResponse::Ok().json(entry))
}

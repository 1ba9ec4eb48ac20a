use actix_web::{delete, get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{request::SignInRequest, response::MessageResponse},
};

#[post("/api/session/user")]
pub async fn sign_in(
    state: web::Data<AppState>,
    request: web::Json<SignInRequest>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let user = state.user_service.sign_in(&request.identifier).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[get("/api/session/user")]
pub async fn current_user(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let user = state
        .user_service
        .current()
        .await
        .ok_or_else(|| AppError::NotFound("No user is signed in".to_string()))?;
    Ok(HttpResponse::Ok().json(user))
}

/// Signing out also abandons whatever the session was doing.
#[delete("/api/session/user")]
pub async fn sign_out(state: web::Data<AppState>) -> HttpResponse {
    state.user_service.sign_out().await;
    state.session.lock().await.restart();

    HttpResponse::Ok().json(MessageResponse {
        message: "Signed out".to_string(),
    })
}

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::state_with_model;
    use crate::services::model_service::MockModelService;
    use crate::services::session::{SessionState, TaskKind};
    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(App::new().service(health_check)).await;

        let req = test::TestRequest::get().uri("/health").to_request();

        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn sign_in_then_sign_out() {
        let state = state_with_model(MockModelService::new()).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .service(sign_in)
                .service(current_user)
                .service(sign_out),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/session/user")
            .set_json(json!({"identifier": "  student@example.com "}))
            .to_request();
        let user: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(user["identifier"], "student@example.com");

        let req = test::TestRequest::get().uri("/api/session/user").to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        state
            .session
            .lock()
            .await
            .begin_generation(TaskKind::Quiz)
            .unwrap();
        let req = test::TestRequest::delete().uri("/api/session/user").to_request();
        assert!(test::call_service(&app, req).await.status().is_success());
        assert_eq!(state.session.lock().await.state(), &SessionState::Idle);

        let req = test::TestRequest::get().uri("/api/session/user").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn blank_identifier_is_bad_request() {
        let state = state_with_model(MockModelService::new()).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(sign_in),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/session/user")
            .set_json(json!({"identifier": " "}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}

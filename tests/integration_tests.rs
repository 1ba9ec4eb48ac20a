use std::{
    collections::VecDeque,
    path::Path,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::{json, Value};

use study_buddy::{
    app_state::AppState,
    config::Config,
    handlers::configure_routes,
    models::domain::{QuizSet, UserAnswers},
    repositories::{FileKeyValueStore, KeyValueStore},
    services::{
        export_service::export_quiz_json,
        model_service::{CompletionRequest, ModelError, ModelService},
        speech::{RelayedSpeechSource, SpeechSource},
    },
};

const QUIZ_REPLY: &str = r#"```json
{
  "keyEntities": ["Mitochondria", "ATP", "Cell"],
  "quiz": [
    {
      "question": "What do mitochondria produce?",
      "options": ["ATP", "DNA", "Starch", "Oxygen"],
      "correctAnswer": "ATP",
      "explanation": "Mitochondria make ATP through respiration."
    },
    {
      "question": "Where are mitochondria found?",
      "options": ["Nucleus", "Cytoplasm", "Cell wall", "Vacuole"],
      "correctAnswer": "Cytoplasm",
      "explanation": "They float in the cytoplasm."
    }
  ]
}
```"#;

/// Replies with canned completions in order and counts every call.
struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, ModelError>>>,
    calls: AtomicUsize,
}

impl ScriptedModel {
    fn new(replies: Vec<Result<String, ModelError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelService for ScriptedModel {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::Service("no scripted reply".to_string())))
    }
}

fn config(data_dir: &Path) -> Config {
    Config {
        model_api_key: SecretString::from("integration-key".to_string()),
        model_api_base: "http://127.0.0.1:9/v1".to_string(),
        model_name: "test-model".to_string(),
        data_dir: data_dir.to_path_buf(),
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 0,
        dictation_enabled: true,
    }
}

async fn state(data_dir: &Path, model: Arc<ScriptedModel>) -> AppState {
    let store: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(data_dir));
    let speech: Option<Box<dyn SpeechSource>> = Some(Box::new(RelayedSpeechSource::new()));
    AppState::from_parts(config(data_dir), model, store, speech).await
}

#[actix_web::test]
async fn quiz_attempt_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(vec![Ok(QUIZ_REPLY.to_string())]);

    {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(dir.path(), model.clone()).await))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/quiz")
            .set_json(json!({"text": "Mitochondria are the powerhouse of the cell.", "level": "College"}))
            .to_request();
        let quiz: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(quiz["quiz"].as_array().map(Vec::len), Some(2));

        let req = test::TestRequest::post()
            .uri("/api/session/answer")
            .set_json(json!({"answer": "ATP"}))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        for _ in 0..2 {
            let req = test::TestRequest::post().uri("/api/session/next").to_request();
            assert!(test::call_service(&app, req).await.status().is_success());
        }

        let req = test::TestRequest::get().uri("/api/session").to_request();
        let view: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(view["score"]["correct"], 1);
        assert_eq!(view["score"]["review"][1]["yourAnswer"], "Not answered");
    }

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(dir.path(), ScriptedModel::new(vec![])).await))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/history").to_request();
    let history: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(history.as_array().map(Vec::len), Some(1));
    assert_eq!(history[0]["title"], "Mitochondria, ATP, Cell");
    assert_eq!(history[0]["userAnswers"], json!(["ATP", null]));

    let quiz: QuizSet = serde_json::from_value(history[0]["quizData"].clone()).unwrap();
    assert_eq!(quiz.quiz[1].correct_answer, "Cytoplasm");
    assert_eq!(model.calls(), 1);
}

#[actix_web::test]
async fn whitespace_text_never_reaches_the_model() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(vec![]);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(dir.path(), model.clone()).await))
            .configure(configure_routes),
    )
    .await;

    for uri in ["/api/quiz", "/api/summary", "/api/flashcards"] {
        let req = test::TestRequest::post()
            .uri(uri)
            .set_json(json!({"text": " \n\t "}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);

        let req = test::TestRequest::post().uri("/api/session/restart").to_request();
        test::call_service(&app, req).await;
    }

    assert_eq!(model.calls(), 0);
}

#[actix_web::test]
async fn invalid_quiz_from_model_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let three_options = QUIZ_REPLY.replace(r#""ATP", "DNA", "Starch", "Oxygen""#, r#""ATP", "DNA", "Starch""#);
    let model = ScriptedModel::new(vec![Ok(three_options)]);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(dir.path(), model).await))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/quiz")
        .set_json(json!({"text": "Mitochondria"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "GENERATION_FAILED");
}

#[actix_web::test]
async fn export_matches_library_serialization() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(vec![Ok(QUIZ_REPLY.to_string())]);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(dir.path(), model).await))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/quiz")
        .set_json(json!({"text": "Mitochondria"}))
        .to_request();
    let quiz: QuizSet = test::call_and_read_body_json(&app, req).await;

    let first = test::call_and_read_body(
        &app,
        test::TestRequest::get().uri("/api/quiz/export").to_request(),
    )
    .await;
    let second = test::call_and_read_body(
        &app,
        test::TestRequest::get().uri("/api/quiz/export").to_request(),
    )
    .await;

    assert_eq!(first, second);
    assert_eq!(first, web::Bytes::from(export_quiz_json(&quiz).unwrap()));
}

#[core::prelude::v1::test]
fn user_answers_serialize_as_nullable_list() {
    let answers = UserAnswers::from_slots(vec![Some("ATP".to_string()), None]);
    assert_eq!(serde_json::to_value(&answers).unwrap(), json!(["ATP", null]));
}

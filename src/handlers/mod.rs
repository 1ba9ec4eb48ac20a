pub mod dictation_handler;
pub mod extraction_handler;
pub mod generation_handler;
pub mod history_handler;
pub mod session_handler;
pub mod user_handler;

use actix_web::web;

pub use dictation_handler::{dictation_error, dictation_result, start_dictation, stop_dictation};
pub use extraction_handler::{extract_text, MAX_UPLOAD_BYTES};
pub use generation_handler::{generate_flashcards, generate_quiz, summarize, translate};
pub use history_handler::{list_history, load_history_entry};
pub use session_handler::{export_quiz, get_session, next_question, restart_session, select_answer};
pub use user_handler::{current_user, health_check, sign_in, sign_out};

/// Registers every route. `AppState` must already be in app data.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
        .service(health_check)
        .service(sign_in)
        .service(current_user)
        .service(sign_out)
        .service(extract_text)
        .service(generate_quiz)
        .service(summarize)
        .service(generate_flashcards)
        .service(translate)
        .service(get_session)
        .service(select_answer)
        .service(next_question)
        .service(restart_session)
        .service(export_quiz)
        .service(start_dictation)
        .service(stop_dictation)
        .service(dictation_result)
        .service(dictation_error)
        .service(list_history)
        .service(load_history_entry);
}

use serde::Serialize;

use crate::{
    models::domain::{QuizScore, User},
    services::session::{SessionState, StudyResult},
};

#[derive(Debug, Clone, Serialize)]
pub struct TextResponse {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DictationResponse {
    pub text: String,
    pub recording: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What the UI needs to render the current screen.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub state: SessionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<QuizScore>,
    pub dictating: bool,
    pub dictation_available: bool,
    pub user: Option<User>,
}

impl SessionView {
    pub fn new(
        state: SessionState,
        dictating: bool,
        dictation_available: bool,
        user: Option<User>,
    ) -> Self {
        let score = match &state {
            SessionState::Viewing(StudyResult::Quiz(progress)) => progress.score(),
            _ => None,
        };
        Self {
            state,
            score,
            dictating,
            dictation_available,
            user,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

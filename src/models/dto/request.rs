use serde::Deserialize;
use validator::Validate;

use crate::services::speech::TranscriptFragment;

// Blank study text is not rejected here; the generation layer reports it as EmptyInput.

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateQuizRequest {
    pub text: String,

    #[validate(length(min = 1, max = 50))]
    pub level: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub text: String,

    #[validate(length(min = 1, max = 50, message = "Choose a target language"))]
    pub target_language: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(length(max = 254))]
    pub identifier: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnswerRequest {
    #[validate(length(min = 1))]
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractQuery {
    pub filename: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictationStartRequest {
    #[serde(default)]
    pub current_text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DictationResultRequest {
    pub fragments: Vec<TranscriptFragment>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DictationErrorRequest {
    #[validate(length(min = 1))]
    pub error: String,
}

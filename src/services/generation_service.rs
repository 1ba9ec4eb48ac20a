use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{
    constants::prompts::{
        render, FLASHCARD_GENERATOR_PROMPT, OCR_PROMPT, QUIZ_GENERATOR_PROMPT, SUMMARISER_PROMPT,
        TRANSLATOR_PROMPT,
    },
    errors::{AppError, AppResult},
    models::domain::{ContractViolation, FlashcardSet, QuizSet, SummaryResult},
    services::model_service::{
        CompletionRequest, ModelError, ModelService, OutputFormat, PromptPart, ResponseContract,
    },
};

pub const QUIZ_TEMPERATURE: f32 = 0.7;
pub const SUMMARY_TEMPERATURE: f32 = 0.5;
pub const FLASHCARD_TEMPERATURE: f32 = 0.6;
pub const TRANSLATION_TEMPERATURE: f32 = 0.2;
pub const OCR_TEMPERATURE: f32 = 0.2;

pub const QUIZ_FAILED: &str = "Failed to generate practice questions. The model may be overloaded or the input text could not be processed.";
pub const SUMMARY_FAILED: &str = "Failed to generate summary.";
pub const FLASHCARDS_FAILED: &str = "Failed to generate flashcards.";
pub const OCR_FAILED: &str = "Failed to extract text from the image. The image may be unsupported or the service is unavailable.";
pub const EMPTY_INPUT: &str = "Input text cannot be empty.";

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z]*\s*\n(.*?)\n?\s*```\s*$")
        .expect("CODE_FENCE is a valid regex pattern")
});

/// Everything that can go wrong between sending a prompt and holding a valid payload.
#[derive(Debug, Error)]
enum GenerationError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("response is not valid JSON for the declared shape: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Contract(#[from] ContractViolation),
}

pub struct GenerationService {
    model: Arc<dyn ModelService>,
    quiz_contract: ResponseContract,
    summary_contract: ResponseContract,
    flashcard_contract: ResponseContract,
}

impl GenerationService {
    pub fn new(model: Arc<dyn ModelService>) -> Self {
        Self {
            model,
            quiz_contract: ResponseContract::for_type::<QuizSet>("quiz"),
            summary_contract: ResponseContract::for_type::<SummaryResult>("summary"),
            flashcard_contract: ResponseContract::for_type::<FlashcardSet>("flashcards"),
        }
    }

    pub async fn generate_quiz(&self, text: &str, level: &str) -> AppResult<QuizSet> {
        require_text(text)?;
        let prompt = render(QUIZ_GENERATOR_PROMPT, &[("level", level), ("text", text)]);

        let result: Result<QuizSet, GenerationError> = async {
            let quiz: QuizSet = self
                .structured(prompt, QUIZ_TEMPERATURE, &self.quiz_contract)
                .await?;
            quiz.validate()?;
            Ok(quiz)
        }
        .await;

        result.map_err(|e| generation_failed("quiz", e, QUIZ_FAILED.to_string()))
    }

    pub async fn summarize(&self, text: &str) -> AppResult<SummaryResult> {
        require_text(text)?;
        let prompt = render(SUMMARISER_PROMPT, &[("text", text)]);

        let result: Result<SummaryResult, GenerationError> = async {
            let summary: SummaryResult = self
                .structured(prompt, SUMMARY_TEMPERATURE, &self.summary_contract)
                .await?;
            summary.validate()?;
            Ok(summary)
        }
        .await;

        result.map_err(|e| generation_failed("summary", e, SUMMARY_FAILED.to_string()))
    }

    pub async fn generate_flashcards(&self, text: &str) -> AppResult<FlashcardSet> {
        require_text(text)?;
        let prompt = render(FLASHCARD_GENERATOR_PROMPT, &[("text", text)]);

        let result: Result<FlashcardSet, GenerationError> = async {
            let deck: FlashcardSet = self
                .structured(prompt, FLASHCARD_TEMPERATURE, &self.flashcard_contract)
                .await?;
            deck.validate()?;
            Ok(deck)
        }
        .await;

        result.map_err(|e| generation_failed("flashcards", e, FLASHCARDS_FAILED.to_string()))
    }

    pub async fn translate(&self, text: &str, target_language: &str) -> AppResult<String> {
        require_text(text)?;
        if target_language.trim().is_empty() {
            return Err(AppError::EmptyInput(
                "A target language is required.".to_string(),
            ));
        }
        let prompt = render(
            TRANSLATOR_PROMPT,
            &[("language", target_language), ("text", text)],
        );

        self.model
            .complete(CompletionRequest {
                parts: vec![PromptPart::Text(prompt)],
                temperature: TRANSLATION_TEMPERATURE,
                output: OutputFormat::Raw,
            })
            .await
            .map(|translated| translated.trim().to_string())
            .map_err(|e| {
                generation_failed(
                    "translation",
                    e.into(),
                    format!("Failed to translate text to {}.", target_language),
                )
            })
    }

    /// OCR through the model. An image without text yields an empty string, not an error.
    pub async fn extract_text_from_image(&self, bytes: &[u8], mime_type: &str) -> AppResult<String> {
        if bytes.is_empty() || mime_type.trim().is_empty() {
            return Err(AppError::EmptyInput(
                "Image data and MIME type are required.".to_string(),
            ));
        }

        self.model
            .complete(CompletionRequest {
                parts: vec![
                    PromptPart::InlineImage {
                        bytes: bytes.to_vec(),
                        mime_type: mime_type.to_string(),
                    },
                    PromptPart::Text(OCR_PROMPT.to_string()),
                ],
                temperature: OCR_TEMPERATURE,
                output: OutputFormat::Raw,
            })
            .await
            .map(|text| text.trim().to_string())
            .map_err(|e| generation_failed("image text", e.into(), OCR_FAILED.to_string()))
    }

    async fn structured<T: DeserializeOwned>(
        &self,
        prompt: String,
        temperature: f32,
        contract: &ResponseContract,
    ) -> Result<T, GenerationError> {
        let raw = self
            .model
            .complete(CompletionRequest {
                parts: vec![PromptPart::Text(prompt)],
                temperature,
                output: OutputFormat::Structured(contract.clone()),
            })
            .await?;

        Ok(serde_json::from_str(strip_code_fence(&raw))?)
    }
}

/// Rejects blank input with `EmptyInput`.
pub fn require_text(text: &str) -> AppResult<()> {
    if text.trim().is_empty() {
        return Err(AppError::EmptyInput(EMPTY_INPUT.to_string()));
    }
    Ok(())
}

fn generation_failed(task: &str, cause: GenerationError, message: String) -> AppError {
    log::error!("Error generating {}: {}", task, cause);
    AppError::GenerationFailed(message)
}

/// Some models wrap JSON in a Markdown fence even when asked for a schema.
pub fn strip_code_fence(raw: &str) -> &str {
    match CODE_FENCE.captures(raw).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => raw.trim(),
    }
}

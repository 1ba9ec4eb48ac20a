use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use schemars::JsonSchema;
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::{
    config::Config,
    models::dto::completion::{
        ChatCompletionRequestDto, ChatCompletionResponseDto, ChatMessageDto, ContentPartDto,
        ImageUrlDto, JsonSchemaDto, ResponseFormatDto,
    },
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("model service error: {0}")]
    Service(String),

    #[error("model returned no completion content")]
    EmptyCompletion,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PromptPart {
    Text(String),
    InlineImage { bytes: Vec<u8>, mime_type: String },
}

/// The declared output shape of a structured task. Kept as data because it is
/// serialised into the request itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseContract {
    pub name: &'static str,
    pub schema: serde_json::Value,
}

impl ResponseContract {
    pub fn for_type<T: JsonSchema>(name: &'static str) -> Self {
        let mut schema = serde_json::to_value(schemars::schema_for!(T))
            .unwrap_or_else(|_| serde_json::json!({ "type": "object" }));
        if let Some(object) = schema.as_object_mut() {
            object.remove("$schema");
        }
        Self { name, schema }
    }

    pub fn required_fields(&self) -> Vec<&str> {
        self.schema
            .get("required")
            .and_then(|r| r.as_array())
            .map(|fields| fields.iter().filter_map(|f| f.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn field_description(&self, field: &str) -> Option<&str> {
        self.schema
            .get("properties")
            .and_then(|p| p.get(field))
            .and_then(|f| f.get("description"))
            .and_then(|d| d.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutputFormat {
    Raw,
    Structured(ResponseContract),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub parts: Vec<PromptPart>,
    pub temperature: f32,
    pub output: OutputFormat,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelService: Send + Sync {
    /// Returns the raw completion text; parsing is the caller's job.
    async fn complete(&self, request: CompletionRequest) -> Result<String, ModelError>;
}

/// Talks to any OpenAI-compatible chat completion endpoint.
pub struct OpenAiModelService {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiModelService {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.model_api_key.expose_secret())
            .with_api_base(config.model_api_base.as_str());

        Self {
            client: Client::with_config(openai_config),
            model: config.model_name.clone(),
        }
    }

    pub fn build_request(&self, request: CompletionRequest) -> ChatCompletionRequestDto {
        let content = request
            .parts
            .into_iter()
            .map(|part| match part {
                PromptPart::Text(text) => ContentPartDto::Text { text },
                PromptPart::InlineImage { bytes, mime_type } => ContentPartDto::ImageUrl {
                    image_url: ImageUrlDto {
                        url: format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes)),
                    },
                },
            })
            .collect();

        let response_format = match request.output {
            OutputFormat::Raw => None,
            OutputFormat::Structured(contract) => Some(ResponseFormatDto::JsonSchema {
                json_schema: JsonSchemaDto {
                    name: contract.name.to_string(),
                    schema: contract.schema,
                    strict: true,
                },
            }),
        };

        ChatCompletionRequestDto {
            model: self.model.clone(),
            messages: vec![ChatMessageDto {
                role: "user",
                content,
            }],
            temperature: request.temperature,
            response_format,
        }
    }
}

#[async_trait]
impl ModelService for OpenAiModelService {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ModelError> {
        let body = self.build_request(request);
        log::debug!(
            "Sending completion request to model {} ({} parts)",
            body.model,
            body.messages.iter().map(|m| m.content.len()).sum::<usize>()
        );

        let response: ChatCompletionResponseDto = self
            .client
            .chat()
            .create_byot(body)
            .await
            .map_err(|e| ModelError::Service(e.to_string()))?;

        response
            .first_content()
            .map(str::to_string)
            .ok_or(ModelError::EmptyCompletion)
    }
}

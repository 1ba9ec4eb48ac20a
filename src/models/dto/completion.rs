use serde::{Deserialize, Serialize};

// Wire shapes for an OpenAI-compatible chat completion. Only the fields this
// crate sends or reads are modelled.

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatCompletionRequestDto {
    pub model: String,
    pub messages: Vec<ChatMessageDto>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormatDto>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatMessageDto {
    pub role: &'static str,
    pub content: Vec<ContentPartDto>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPartDto {
    Text { text: String },
    ImageUrl { image_url: ImageUrlDto },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImageUrlDto {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormatDto {
    JsonSchema { json_schema: JsonSchemaDto },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JsonSchemaDto {
    pub name: String,
    pub schema: serde_json::Value,
    pub strict: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponseDto {
    #[serde(default)]
    pub choices: Vec<ChatChoiceDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceDto {
    pub message: ChatResponseMessageDto,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponseMessageDto {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponseDto {
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

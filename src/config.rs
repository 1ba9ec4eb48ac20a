use std::env;
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

pub const DEFAULT_MODEL_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_MODEL_NAME: &str = "gemini-2.5-flash";

#[derive(Clone, Debug)]
pub struct Config {
    pub model_api_key: SecretString,
    pub model_api_base: String,
    pub model_name: String,
    pub data_dir: PathBuf,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub dictation_enabled: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            model_api_key: SecretString::from(env::var("MODEL_API_KEY").unwrap_or_default()),
            model_api_base: env::var("MODEL_API_BASE")
                .unwrap_or_else(|_| DEFAULT_MODEL_API_BASE.to_string()),
            model_name: env::var("MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL_NAME.to_string()),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".study-buddy")),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            dictation_enabled: env::var("DICTATION_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }

    /// The model service cannot be reached without a key, so startup stops here.
    pub fn validate(&self) -> AppResult<()> {
        if self.model_api_key.expose_secret().trim().is_empty() {
            return Err(AppError::ValidationError(
                "MODEL_API_KEY environment variable is not set".to_string(),
            ));
        }

        if self.model_name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "MODEL_NAME must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            model_api_key: SecretString::from("test-api-key".to_string()),
            model_api_base: "http://127.0.0.1:9/v1".to_string(),
            model_name: "test-model".to_string(),
            data_dir: std::env::temp_dir().join("study-buddy-test"),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            dictation_enabled: true,
        }
    }
}

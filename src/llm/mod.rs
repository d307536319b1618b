//! Vision-language model abstraction and backends

use crate::config::ModelConfig;
use async_trait::async_trait;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub mod encode;
pub mod ollama;
pub mod openai;

pub use ollama::OllamaModel;
pub use openai::OpenAiModel;

/// Error types for model operations
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Invalid model: {model}")]
    InvalidModel { model: String },

    #[error("Request failed: {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Invalid response format: {message}")]
    InvalidResponse { message: String },

    #[error("Model backend unavailable: {message}")]
    Unavailable { message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image encoding error: {0}")]
    ImageEncoding(#[from] image::ImageError),

    #[error("Unknown error: {message}")]
    Unknown { message: String },
}

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
        }
    }
}

/// One piece of a multimodal message.
///
/// An `Image` part is a placeholder; the n-th placeholder across the whole
/// conversation stands for the n-th image handed to [`VisionModel::respond`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentPart {
    Image,
    Text { text: String },
}

impl ContentPart {
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self::Text { text: text.into() }
    }
}

/// A message with structured content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: Vec<ContentPart>,
}

impl ChatMessage {
    pub fn user(content: Vec<ContentPart>) -> Self {
        Self {
            role: MessageRole::User,
            content,
        }
    }

    /// Number of image placeholders in this message
    pub fn image_count(&self) -> usize {
        self.content
            .iter()
            .filter(|part| matches!(part, ContentPart::Image))
            .count()
    }
}

/// Configuration for generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: 200,
            temperature: None,
        }
    }
}

/// The capability the question answerer needs from a model.
///
/// Backends own prompt templating, image tensorization and decoding; callers
/// only see structured messages in and text out.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Backend name (e.g., "ollama", "openai")
    fn provider_name(&self) -> &str;

    /// Model identifier sent to the backend
    fn model_name(&self) -> &str;

    /// Probe the backend once; used at startup
    async fn check_ready(&self) -> Result<(), ModelError>;

    /// Produce a text response for `messages`, whose image placeholders are
    /// filled from `images` in order
    async fn respond(&self, messages: &[ChatMessage], images: &[RgbImage]) -> Result<String, ModelError>;
}

/// Fail early when placeholders and images disagree
pub fn check_image_count(messages: &[ChatMessage], images: &[RgbImage]) -> Result<(), ModelError> {
    let placeholders: usize = messages.iter().map(ChatMessage::image_count).sum();
    if placeholders != images.len() {
        return Err(ModelError::InvalidRequest {
            message: format!(
                "{} image placeholders but {} images",
                placeholders,
                images.len()
            ),
        });
    }
    Ok(())
}

/// Map a non-success HTTP response to a model error
pub(crate) fn parse_error_response(status: u16, body: &str, model: &str) -> ModelError {
    match status {
        401 | 403 => ModelError::Authentication {
            message: "Invalid API key or insufficient permissions".to_string(),
        },
        400 | 404 if body.contains("model") && body.contains("not found") => ModelError::InvalidModel {
            model: model.to_string(),
        },
        _ => ModelError::RequestFailed {
            status,
            message: body.to_string(),
        },
    }
}

/// Factory for creating model backends
pub struct ModelFactory;

impl ModelFactory {
    /// Create a backend from configuration
    pub fn create(config: &ModelConfig) -> Result<Box<dyn VisionModel>, ModelError> {
        let generation = GenerationConfig {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        };
        let timeout = Duration::from_secs(config.timeout_seconds);

        match config.provider.to_lowercase().as_str() {
            "ollama" => Ok(Box::new(OllamaModel::new(
                config.model.clone(),
                config.base_url.clone(),
                generation,
                timeout,
            ))),
            "openai" => Ok(Box::new(OpenAiModel::new(
                config.model.clone(),
                config.base_url.clone(),
                config.resolved_api_key(),
                generation,
                timeout,
            ))),
            other => Err(ModelError::Unknown {
                message: format!("Unknown provider: {}", other),
            }),
        }
    }

    /// List all available provider names
    pub fn list_providers() -> Vec<&'static str> {
        vec!["ollama", "openai"]
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// A model that replays a fixed reply and records what it was asked
    pub(crate) struct ScriptedModel {
        reply: Result<String, String>,
        pub(crate) calls: Mutex<Vec<(Vec<ChatMessage>, usize)>>,
    }

    impl ScriptedModel {
        pub(crate) fn replying<S: Into<String>>(reply: S) -> Self {
            Self {
                reply: Ok(reply.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing<S: Into<String>>(message: S) -> Self {
            Self {
                reply: Err(message.into()),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl VisionModel for ScriptedModel {
        fn provider_name(&self) -> &str {
            "scripted"
        }

        fn model_name(&self) -> &str {
            "scripted-model"
        }

        async fn check_ready(&self) -> Result<(), ModelError> {
            Ok(())
        }

        async fn respond(&self, messages: &[ChatMessage], images: &[RgbImage]) -> Result<String, ModelError> {
            check_image_count(messages, images)?;
            self.calls
                .lock()
                .unwrap()
                .push((messages.to_vec(), images.len()));
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(message) => Err(ModelError::Unavailable {
                    message: message.clone(),
                }),
            }
        }
    }

    #[test]
    fn test_content_part_serialization() {
        let message = ChatMessage::user(vec![ContentPart::Image, ContentPart::text("hi")]);
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "role": "user",
                "content": [{"type": "image"}, {"type": "text", "text": "hi"}]
            })
        );
    }

    #[test]
    fn test_check_image_count() {
        let messages = vec![ChatMessage::user(vec![ContentPart::Image, ContentPart::text("q")])];
        assert!(check_image_count(&messages, &[RgbImage::new(1, 1)]).is_ok());
        assert!(matches!(
            check_image_count(&messages, &[]),
            Err(ModelError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn test_parse_error_response() {
        assert!(matches!(
            parse_error_response(401, "", "m"),
            ModelError::Authentication { .. }
        ));
        assert!(matches!(
            parse_error_response(404, "model 'x' not found", "x"),
            ModelError::InvalidModel { .. }
        ));
        assert!(matches!(
            parse_error_response(500, "boom", "m"),
            ModelError::RequestFailed { status: 500, .. }
        ));
    }

    #[test]
    fn test_factory() {
        let mut config = ModelConfig::default();
        assert_eq!(ModelFactory::create(&config).unwrap().provider_name(), "ollama");

        config.provider = "OpenAI".to_string();
        let model = ModelFactory::create(&config).unwrap();
        assert_eq!(model.provider_name(), "openai");
        assert_eq!(model.model_name(), config.model);

        config.provider = "nope".to_string();
        assert!(ModelFactory::create(&config).is_err());
        assert_eq!(ModelFactory::list_providers(), vec!["ollama", "openai"]);
    }
}

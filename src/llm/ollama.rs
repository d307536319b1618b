//! Ollama backend (`/api/chat`)

use super::encode::png_base64;
use super::{
    check_image_count, parse_error_response, ChatMessage, ContentPart, GenerationConfig,
    ModelError, VisionModel,
};
use async_trait::async_trait;
use image::RgbImage;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// A model served by a local or remote Ollama instance
pub struct OllamaModel {
    client: Client,
    base_url: String,
    model: String,
    generation: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct OllamaMessage {
    role: String,
    content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    images: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
struct OllamaOptions {
    num_predict: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
struct OllamaChatResponse {
    message: OllamaResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

impl OllamaModel {
    pub fn new(
        model: String,
        base_url: Option<String>,
        generation: GenerationConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model,
            generation,
        }
    }

    /// Flatten structured messages into Ollama's shape: text parts joined by
    /// newlines, images attached to the message that holds their placeholder
    fn convert_messages(
        messages: &[ChatMessage],
        images: &[RgbImage],
    ) -> Result<Vec<OllamaMessage>, ModelError> {
        check_image_count(messages, images)?;
        let mut pending = images.iter();

        messages
            .iter()
            .map(|message| -> Result<OllamaMessage, ModelError> {
                let mut texts = Vec::new();
                let mut encoded = Vec::new();
                for part in &message.content {
                    match part {
                        ContentPart::Image => {
                            if let Some(image) = pending.next() {
                                encoded.push(png_base64(image)?);
                            }
                        }
                        ContentPart::Text { text } => texts.push(text.as_str()),
                    }
                }
                Ok(OllamaMessage {
                    role: message.role.as_str().to_string(),
                    content: texts.join("\n"),
                    images: encoded,
                })
            })
            .collect()
    }
}

#[async_trait]
impl VisionModel for OllamaModel {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn check_ready(&self) -> Result<(), ModelError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self.client.get(&url).send().await.map_err(|e| ModelError::Unavailable {
            message: format!("{} did not answer: {}", url, e),
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(parse_error_response(status, &body, &self.model));
        }
        Ok(())
    }

    async fn respond(&self, messages: &[ChatMessage], images: &[RgbImage]) -> Result<String, ModelError> {
        let request = OllamaChatRequest {
            model: &self.model,
            messages: Self::convert_messages(messages, images)?,
            stream: false,
            options: OllamaOptions {
                num_predict: self.generation.max_tokens,
                temperature: self.generation.temperature,
            },
        };

        let url = format!("{}/api/chat", self.base_url);
        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(parse_error_response(status, &body, &self.model));
        }

        let body: OllamaChatResponse = response.json().await.map_err(|e| ModelError::InvalidResponse {
            message: format!("Failed to parse chat response: {}", e),
        })?;
        Ok(body.message.content)
    }
}

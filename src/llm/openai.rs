//! OpenAI-compatible chat-completions backend (vLLM, OpenRouter, ...)

use super::encode::png_data_url;
use super::{
    check_image_count, parse_error_response, ChatMessage, ContentPart, GenerationConfig,
    ModelError, VisionModel,
};
use async_trait::async_trait;
use image::RgbImage;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/v1";

/// A model behind an OpenAI-compatible `/chat/completions` endpoint
pub struct OpenAiModel {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    generation: GenerationConfig,
}

impl OpenAiModel {
    pub fn new(
        model: String,
        base_url: Option<String>,
        api_key: Option<String>,
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
            api_key,
            model,
            generation,
        }
    }

    fn create_headers(&self) -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(api_key) = &self.api_key {
            if let Ok(value) = format!("Bearer {}", api_key).parse::<reqwest::header::HeaderValue>() {
                headers.insert(reqwest::header::AUTHORIZATION, value);
            }
        }
        headers
    }

    /// Build the request body; image placeholders become `image_url` parts
    fn build_request(&self, messages: &[ChatMessage], images: &[RgbImage]) -> Result<Value, ModelError> {
        check_image_count(messages, images)?;
        let mut pending = images.iter();

        let mut converted = Vec::with_capacity(messages.len());
        for message in messages {
            let mut parts = Vec::with_capacity(message.content.len());
            for part in &message.content {
                match part {
                    ContentPart::Image => {
                        if let Some(image) = pending.next() {
                            parts.push(json!({
                                "type": "image_url",
                                "image_url": { "url": png_data_url(image)? }
                            }));
                        }
                    }
                    ContentPart::Text { text } => {
                        parts.push(json!({ "type": "text", "text": text }));
                    }
                }
            }
            converted.push(json!({ "role": message.role.as_str(), "content": parts }));
        }

        let mut request_body = json!({
            "model": self.model,
            "messages": converted,
            "max_tokens": self.generation.max_tokens,
        });
        if let Some(temperature) = self.generation.temperature {
            request_body["temperature"] = temperature.into();
        }
        Ok(request_body)
    }
}

#[async_trait]
impl VisionModel for OpenAiModel {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn check_ready(&self) -> Result<(), ModelError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .headers(self.create_headers())
            .send()
            .await
            .map_err(|e| ModelError::Unavailable {
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
        let request_body = self.build_request(messages, images)?;
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .headers(self.create_headers())
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(parse_error_response(status, &body, &self.model));
        }

        let body: Value = response.json().await.map_err(|e| ModelError::InvalidResponse {
            message: format!("Failed to parse generation response: {}", e),
        })?;

        // Some servers report errors inside a 200 response
        if let Some(error) = body.get("error") {
            return Err(ModelError::RequestFailed {
                status: 400,
                message: error.to_string(),
            });
        }

        body["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| ModelError::InvalidResponse {
                message: "No message content in response".to_string(),
            })
    }
}

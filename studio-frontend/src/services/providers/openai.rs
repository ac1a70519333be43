//! OpenAI provider implementation.
//!
//! One shared client implements all three capabilities against the OpenAI
//! HTTP API: chat completions for text, the images endpoint for image
//! generation and the audio endpoint for transcription. Transient failures
//! are retried with exponential backoff.

use super::{GeneratedImage, ImageProvider, ProviderError, TextProvider, TranscriptionProvider};
use crate::config::OpenAiSettings;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use studio_core::retry::{retry_call, RetryConfig};

#[derive(Clone)]
pub struct OpenAiClient {
    settings: OpenAiSettings,
    retry: RetryConfig,
    client: Client,
}

impl OpenAiClient {
    pub fn new(settings: OpenAiSettings) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");
        let retry = RetryConfig::with_max_retries(settings.max_retries);

        Self {
            settings,
            retry,
            client,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.settings.api_base.trim_end_matches('/'), path)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.settings.api_key.expose_secret())
    }

    async fn send_chat(&self, body: &ChatCompletionRequest) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(self.api_url("chat/completions"))
            .header(AUTHORIZATION, self.bearer())
            .json(body)
            .send()
            .await
            .map_err(request_error)?;
        let response = check_status(response).await?;

        let completion: ChatCompletionResponse = response.json().await.map_err(parse_error)?;
        if let Some(usage) = &completion.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "chat completion token usage"
            );
        }

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::Api {
                status: 200,
                message: "response contained no choices".to_string(),
            })
    }

    async fn send_image(&self, body: &ImageGenerationRequest) -> Result<GeneratedImage, ProviderError> {
        let response = self
            .client
            .post(self.api_url("images/generations"))
            .header(AUTHORIZATION, self.bearer())
            .json(body)
            .send()
            .await
            .map_err(request_error)?;
        let response = check_status(response).await?;

        let generation: ImageGenerationResponse = response.json().await.map_err(parse_error)?;
        generation
            .data
            .into_iter()
            .next()
            .map(|datum| GeneratedImage { url: datum.url })
            .ok_or_else(|| ProviderError::Api {
                status: 200,
                message: "response contained no image data".to_string(),
            })
    }

    async fn send_transcription(
        &self,
        audio: &[u8],
        file_name: &str,
    ) -> Result<String, ProviderError> {
        // The multipart form is consumed per request, so it is rebuilt on
        // every retry attempt.
        let part = Part::bytes(audio.to_vec()).file_name(file_name.to_string());
        let form = Form::new()
            .text("model", self.settings.transcribe_model.clone())
            .part("file", part);

        let response = self
            .client
            .post(self.api_url("audio/transcriptions"))
            .header(AUTHORIZATION, self.bearer())
            .multipart(form)
            .send()
            .await
            .map_err(request_error)?;
        let response = check_status(response).await?;

        let transcription: TranscriptionResponse = response.json().await.map_err(parse_error)?;
        Ok(transcription.text)
    }
}

#[async_trait]
impl TextProvider for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = ChatCompletionRequest {
            model: self.settings.chat_model.clone(),
            messages: vec![ApiMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        tracing::debug!(
            model = %self.settings.chat_model,
            prompt_chars = prompt.len(),
            "requesting chat completion"
        );

        retry_call(&self.retry, "chat_completion", || self.send_chat(&body)).await
    }
}

#[async_trait]
impl ImageProvider for OpenAiClient {
    async fn generate(&self, description: &str) -> Result<GeneratedImage, ProviderError> {
        let body = ImageGenerationRequest {
            model: self.settings.image_model.clone(),
            prompt: description.to_string(),
            n: 1,
            size: Some(self.settings.image_size.clone()),
        };

        tracing::debug!(
            model = %self.settings.image_model,
            size = %self.settings.image_size,
            "requesting image generation"
        );

        retry_call(&self.retry, "image_generation", || self.send_image(&body)).await
    }
}

#[async_trait]
impl TranscriptionProvider for OpenAiClient {
    async fn transcribe(&self, audio: &[u8], file_name: &str) -> Result<String, ProviderError> {
        tracing::debug!(
            model = %self.settings.transcribe_model,
            bytes = audio.len(),
            file_name = %file_name,
            "requesting transcription"
        );

        retry_call(&self.retry, "transcription", || {
            self.send_transcription(audio, file_name)
        })
        .await
    }
}

/// Classify a transport-level failure.
fn request_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Network(err.to_string())
    }
}

fn parse_error(err: reqwest::Error) -> ProviderError {
    ProviderError::Api {
        status: 200,
        message: format!("failed to parse response: {}", err),
    }
}

/// Map non-success statuses onto the provider error taxonomy.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(status_error(status.as_u16(), message))
}

fn status_error(status: u16, message: String) -> ProviderError {
    match status {
        400 => ProviderError::InvalidRequest(message),
        401 | 403 => ProviderError::Unauthorized(message),
        429 => ProviderError::RateLimited,
        _ => ProviderError::Api { status, message },
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ApiMessage>,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct TokenUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ImageGenerationRequest {
    model: String,
    prompt: String,
    n: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    url: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn test_settings(api_base: &str) -> OpenAiSettings {
        OpenAiSettings {
            api_base: api_base.to_string(),
            api_key: Secret::new("sk-test".to_string()),
            chat_model: "gpt-4o-mini".to_string(),
            image_model: "dall-e-3".to_string(),
            image_size: "1024x1024".to_string(),
            transcribe_model: "whisper-1".to_string(),
            timeout_seconds: 5,
            max_retries: 0,
        }
    }

    #[test]
    fn api_url_handles_trailing_slash() {
        let client = OpenAiClient::new(test_settings("https://api.openai.com/v1/"));
        assert_eq!(
            client.api_url("chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn status_error_maps_common_statuses() {
        assert!(matches!(
            status_error(429, String::new()),
            ProviderError::RateLimited
        ));
        assert!(matches!(
            status_error(401, "bad key".to_string()),
            ProviderError::Unauthorized(_)
        ));
        assert!(matches!(
            status_error(400, "empty prompt".to_string()),
            ProviderError::InvalidRequest(_)
        ));
        assert!(matches!(
            status_error(500, "boom".to_string()),
            ProviderError::Api { status: 500, .. }
        ));
    }

    #[test]
    fn chat_completion_response_parses() {
        let raw = r#"{
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Hello there"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 4, "completion_tokens": 2, "total_tokens": 6}
        }"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "Hello there");
        assert_eq!(parsed.usage.as_ref().unwrap().prompt_tokens, 4);
    }

    #[test]
    fn image_generation_response_parses() {
        let raw = r#"{
            "created": 1700000000,
            "data": [{"url": "https://images.example.com/abc.png"}]
        }"#;
        let parsed: ImageGenerationResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.data[0].url, "https://images.example.com/abc.png");
    }

    #[test]
    fn transcription_response_parses() {
        let parsed: TranscriptionResponse =
            serde_json::from_str(r#"{"text": "hello world"}"#).unwrap();
        assert_eq!(parsed.text, "hello world");
    }
}

//! Mock provider implementations for tests and local development.

use super::{GeneratedImage, ImageProvider, ProviderError, TextProvider, TranscriptionProvider};
use async_trait::async_trait;
use std::time::Duration;

/// Mock text provider returning a canned completion that echoes the prompt.
pub struct MockTextProvider {
    enabled: bool,
}

impl MockTextProvider {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock text provider is not enabled".to_string(),
            ));
        }

        // Simulate some processing time
        tokio::time::sleep(Duration::from_millis(10)).await;

        Ok(format!("Mock response for: {}", prompt))
    }
}

/// Mock image provider returning a fixed hosting URL.
pub struct MockImageProvider {
    enabled: bool,
    url: String,
}

impl MockImageProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            url: "https://images.example.com/mock.png".to_string(),
        }
    }

    /// Mock that reports the image as hosted at the given URL.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            enabled: true,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ImageProvider for MockImageProvider {
    async fn generate(&self, _description: &str) -> Result<GeneratedImage, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock image provider is not enabled".to_string(),
            ));
        }

        tokio::time::sleep(Duration::from_millis(10)).await;

        Ok(GeneratedImage {
            url: self.url.clone(),
        })
    }
}

/// Mock transcription provider that names the file it was given.
pub struct MockTranscriptionProvider {
    enabled: bool,
}

impl MockTranscriptionProvider {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

#[async_trait]
impl TranscriptionProvider for MockTranscriptionProvider {
    async fn transcribe(&self, _audio: &[u8], file_name: &str) -> Result<String, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock transcription provider is not enabled".to_string(),
            ));
        }

        tokio::time::sleep(Duration::from_millis(10)).await;

        Ok(format!("Mock transcription for: {}", file_name))
    }
}

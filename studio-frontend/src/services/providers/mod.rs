//! AI provider abstractions and implementations.
//!
//! Each generative capability is a separate trait so handlers depend on
//! exactly what they use and tests can swap in mocks per capability.

pub mod mock;
pub mod openai;

use async_trait::async_trait;
use studio_core::error::AppError;
use studio_core::retry::RetryableError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limited by the AI service")]
    RateLimited,

    #[error("AI service error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("AI service request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),
}

impl RetryableError for ProviderError {
    fn is_retryable(&self) -> bool {
        match self {
            ProviderError::RateLimited | ProviderError::Timeout | ProviderError::Network(_) => true,
            ProviderError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured(msg) => AppError::ConfigError(anyhow::anyhow!(msg)),
            ProviderError::InvalidRequest(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
            ProviderError::RateLimited => AppError::TooManyRequests(
                "The AI service is rate limiting requests. Try again shortly.".to_string(),
                None,
            ),
            ProviderError::Unauthorized(msg) => AppError::BadGateway(msg),
            ProviderError::Api { status, message } => {
                AppError::BadGateway(format!("AI service returned {}: {}", status, message))
            }
            ProviderError::Timeout => {
                AppError::ServiceUnavailable("The AI service did not respond in time".to_string())
            }
            ProviderError::Network(msg) => AppError::ServiceUnavailable(msg),
        }
    }
}

/// A generated image hosted by the provider. The URL is short-lived, so
/// callers download a copy before showing anything to the user.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub url: String,
}

/// Text completion capability.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Produce a completion for the given prompt.
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Image generation capability.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generate an image and return where the provider hosts it.
    async fn generate(&self, description: &str) -> Result<GeneratedImage, ProviderError>;
}

/// Audio transcription capability.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Transcribe the given audio bytes. `file_name` carries the uploaded
    /// name so the provider can infer the container format.
    async fn transcribe(&self, audio: &[u8], file_name: &str) -> Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limits_timeouts_and_server_errors_are_retryable() {
        assert!(ProviderError::RateLimited.is_retryable());
        assert!(ProviderError::Timeout.is_retryable());
        assert!(ProviderError::Network("connection reset".to_string()).is_retryable());
        assert!(ProviderError::Api {
            status: 503,
            message: "overloaded".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn client_errors_are_not_retryable() {
        assert!(!ProviderError::Unauthorized("bad key".to_string()).is_retryable());
        assert!(!ProviderError::InvalidRequest("empty prompt".to_string()).is_retryable());
        assert!(!ProviderError::Api {
            status: 404,
            message: "no such model".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn rate_limit_maps_to_too_many_requests() {
        let err = AppError::from(ProviderError::RateLimited);
        assert!(matches!(err, AppError::TooManyRequests(_, None)));
    }
}

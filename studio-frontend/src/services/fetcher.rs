//! Downloads provider-hosted generated images.

use std::time::Duration;
use studio_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("download failed with status {0}")]
    Status(u16),

    #[error("download failed: {0}")]
    Network(String),
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        AppError::TransferError(err.to_string())
    }
}

/// Fetches image bytes from the short-lived URLs the image provider hands
/// out, so a durable local copy can be stored.
#[derive(Clone)]
pub struct ImageFetcher {
    client: reqwest::Client,
}

impl ImageFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch the image at `url`. A non-success status is a failed download,
    /// reported separately from generation failures.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_errors_map_to_transfer_errors() {
        let err = AppError::from(FetchError::Status(404));
        assert!(matches!(err, AppError::TransferError(_)));

        let err = AppError::from(FetchError::Network("connection refused".to_string()));
        assert!(matches!(err, AppError::TransferError(_)));
    }

    #[test]
    fn status_error_names_the_status() {
        assert_eq!(
            FetchError::Status(404).to_string(),
            "download failed with status 404"
        );
    }
}

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use studio_core::error::AppError;

/// Application configuration, loaded from YAML with environment overrides.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub openai: OpenAiSettings,
    pub artifacts: ArtifactSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Secret used to protect session state. Rotate to invalidate all
    /// existing sessions.
    pub session_secret: Secret<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OpenAiSettings {
    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    pub api_key: Secret<String>,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_image_size")]
    pub image_size: String,
    #[serde(default = "default_transcribe_model")]
    pub transcribe_model: String,
    /// Per-request timeout for calls to the API, in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Retries for transient failures (rate limits, 5xx, network errors).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArtifactSettings {
    /// Directory where generated artifacts are written and served from.
    pub dir: String,
    /// Upper bound for uploaded audio files, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_image_model() -> String {
    "dall-e-3".to_string()
}

fn default_image_size() -> String {
    "1024x1024".to_string()
}

fn default_transcribe_model() -> String {
    "whisper-1".to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_max_retries() -> u32 {
    3
}

fn default_max_upload_bytes() -> usize {
    // 25 MB, the documented transcription upload limit.
    25 * 1024 * 1024
}

impl Settings {
    /// Reject configurations that cannot produce a working service.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.server.session_secret.expose_secret().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "server.session_secret must not be empty"
            )));
        }
        if self.openai.api_key.expose_secret().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "openai.api_key must not be empty"
            )));
        }
        Ok(())
    }
}

/// Load configuration from config/base.yaml, then apply environment
/// variable overrides with prefix APP (e.g. APP_SERVER__PORT=0).
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");

    // Support running from the workspace root or the service directory
    let configuration_directory = if base_path.ends_with("studio-frontend") {
        base_path.join("config")
    } else {
        base_path.join("studio-frontend").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with(session_secret: &str, api_key: &str) -> Settings {
        Settings {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 0,
                session_secret: Secret::new(session_secret.to_string()),
            },
            openai: OpenAiSettings {
                api_base: default_api_base(),
                api_key: Secret::new(api_key.to_string()),
                chat_model: default_chat_model(),
                image_model: default_image_model(),
                image_size: default_image_size(),
                transcribe_model: default_transcribe_model(),
                timeout_seconds: default_timeout_seconds(),
                max_retries: default_max_retries(),
            },
            artifacts: ArtifactSettings {
                dir: "static/generated".to_string(),
                max_upload_bytes: default_max_upload_bytes(),
            },
        }
    }

    #[test]
    fn validate_accepts_populated_secrets() {
        assert!(settings_with("secret", "sk-test").validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_session_secret() {
        assert!(settings_with("", "sk-test").validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_api_key() {
        assert!(settings_with("secret", "").validate().is_err());
    }
}

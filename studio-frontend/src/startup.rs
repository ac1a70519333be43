//! Application startup and router assembly.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use time::Duration;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use studio_core::error::AppError;
use studio_core::middleware::tracing::{request_id, request_id_middleware};

use crate::config::Settings;
use crate::handlers::app::{health_check, index};
use crate::handlers::audio::{audio_page, transcribe_audio};
use crate::handlers::chatbot::{chatbot_page, chatbot_turn, clear_chat};
use crate::handlers::essay::{essay_page, generate_essay};
use crate::handlers::image::{generate_image, image_page};
use crate::handlers::metrics::metrics;
use crate::handlers::summary::{summarize, summary_page};
use crate::middleware::metrics::metrics_middleware;
use crate::services::artifacts::ArtifactStore;
use crate::services::fetcher::ImageFetcher;
use crate::services::providers::openai::OpenAiClient;
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    // Session setup
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false) // Set to true in production with HTTPS
        .with_expiry(Expiry::OnInactivity(Duration::hours(24)));

    let artifact_root = state.artifacts.root().to_path_buf();
    let max_upload_bytes = state.settings.artifacts.max_upload_bytes;

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/essay", get(essay_page).post(generate_essay))
        .route("/image", get(image_page).post(generate_image))
        .route("/chatbot", get(chatbot_page).post(chatbot_turn))
        .route("/clear_chat", post(clear_chat))
        .route("/audio", get(audio_page).post(transcribe_audio))
        .route("/summary", get(summary_page).post(summarize))
        .nest_service(
            ArtifactStore::PUBLIC_PREFIX,
            ServeDir::new(artifact_root),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(session_layer)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request_id(request.headers()).unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(settings: Settings) -> Result<Self, AppError> {
        settings.validate()?;

        let client = Arc::new(OpenAiClient::new(settings.openai.clone()));
        tracing::info!(
            chat_model = %settings.openai.chat_model,
            image_model = %settings.openai.image_model,
            transcribe_model = %settings.openai.transcribe_model,
            "initialized OpenAI provider"
        );

        let fetcher = ImageFetcher::new(std::time::Duration::from_secs(
            settings.openai.timeout_seconds,
        ));
        let artifacts = ArtifactStore::new(&settings.artifacts.dir);
        tokio::fs::create_dir_all(artifacts.root()).await?;

        let address = format!("{}:{}", settings.server.host, settings.server.port);
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let state = AppState::new(
            settings,
            client.clone(),
            client.clone(),
            client,
            fetcher,
            artifacts,
        );

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let app = build_router(self.state);

        tracing::info!("studio-frontend listening on port {}", self.port);

        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

//! studio-frontend: Web front-end for AI-assisted content generation.
//!
//! Serves HTML pages for essay writing, image generation, chat, audio
//! transcription and summarization, forwarding each submission to an AI
//! provider and storing downloadable artifacts per session.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use std::sync::Arc;

use config::Settings;
use services::artifacts::ArtifactStore;
use services::fetcher::ImageFetcher;
use services::providers::{ImageProvider, TextProvider, TranscriptionProvider};

/// Shared application state: the AI capabilities plus artifact plumbing.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub text: Arc<dyn TextProvider>,
    pub image: Arc<dyn ImageProvider>,
    pub transcription: Arc<dyn TranscriptionProvider>,
    pub fetcher: ImageFetcher,
    pub artifacts: ArtifactStore,
}

impl AppState {
    pub fn new(
        settings: Settings,
        text: Arc<dyn TextProvider>,
        image: Arc<dyn ImageProvider>,
        transcription: Arc<dyn TranscriptionProvider>,
        fetcher: ImageFetcher,
        artifacts: ArtifactStore,
    ) -> Self {
        Self {
            settings,
            text,
            image,
            transcription,
            fetcher,
            artifacts,
        }
    }
}

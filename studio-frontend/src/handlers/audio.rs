use askama::Template;
use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
};
use studio_core::error::AppError;

use crate::models::scope::ArtifactScope;
use crate::services::artifacts::ArtifactKind;
use crate::services::metrics;
use crate::AppState;

#[derive(Template)]
#[template(path = "audio.html")]
pub struct AudioTemplate {
    pub transcription: Option<String>,
    pub download_href: Option<String>,
}

pub async fn audio_page() -> impl IntoResponse {
    AudioTemplate {
        transcription: None,
        download_href: None,
    }
}

pub async fn transcribe_audio(
    State(state): State<AppState>,
    scope: ArtifactScope,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("invalid multipart payload: {}", e)))?
    {
        if field.name() != Some("audio") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload.bin").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("failed to read upload: {}", e)))?;
        upload = Some((file_name, data.to_vec()));
        break;
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("missing audio file upload")))?;
    if data.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "uploaded audio file is empty"
        )));
    }

    // The upload is spooled to disk for the duration of the call and the
    // guard removes it on every exit path, success or not.
    let spooled = state.artifacts.spool_upload(&file_name, &data).await?;
    let audio = tokio::fs::read(spooled.path()).await?;

    let result = state
        .transcription
        .transcribe(&audio, spooled.original_name())
        .await;
    metrics::observe_generation("transcription", metrics::outcome(&result));
    let transcription = result.map_err(AppError::from)?;

    let artifact = state
        .artifacts
        .write(
            scope.as_str(),
            ArtifactKind::Transcript,
            transcription.as_bytes(),
        )
        .await?;

    tracing::info!(
        scope = %scope.as_str(),
        file = %spooled.original_name(),
        chars = transcription.len(),
        "audio transcribed"
    );

    Ok(AudioTemplate {
        transcription: Some(transcription),
        download_href: Some(artifact.href),
    })
}

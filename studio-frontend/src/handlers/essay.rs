use askama::Template;
use axum::{extract::State, response::IntoResponse, Form};
use serde::Deserialize;
use studio_core::error::AppError;
use validator::Validate;

use crate::models::scope::ArtifactScope;
use crate::services::artifacts::ArtifactKind;
use crate::services::metrics;
use crate::AppState;

#[derive(Template)]
#[template(path = "essay.html")]
pub struct EssayTemplate {
    pub essay: Option<String>,
    pub download_href: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EssayForm {
    #[validate(length(min = 1, message = "Topic is required"))]
    pub topic: String,
    #[validate(length(min = 1, message = "Length is required"))]
    pub length: String,
    #[validate(length(min = 1, message = "Tone is required"))]
    pub tone: String,
}

fn essay_prompt(topic: &str, length: &str, tone: &str) -> String {
    format!("Write a {}, {} essay on {}.", length, tone, topic)
}

pub async fn essay_page() -> impl IntoResponse {
    EssayTemplate {
        essay: None,
        download_href: None,
    }
}

pub async fn generate_essay(
    State(state): State<AppState>,
    scope: ArtifactScope,
    Form(form): Form<EssayForm>,
) -> Result<impl IntoResponse, AppError> {
    form.validate()?;

    let prompt = essay_prompt(&form.topic, &form.length, &form.tone);
    let result = state.text.complete(&prompt).await;
    metrics::observe_generation("essay", metrics::outcome(&result));
    let essay = result.map_err(AppError::from)?;

    let artifact = state
        .artifacts
        .write(scope.as_str(), ArtifactKind::Essay, essay.as_bytes())
        .await?;

    tracing::info!(scope = %scope.as_str(), chars = essay.len(), "essay generated");

    Ok(EssayTemplate {
        essay: Some(essay),
        download_href: Some(artifact.href),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn essay_prompt_places_every_field() {
        assert_eq!(
            essay_prompt("volcanoes", "short", "formal"),
            "Write a short, formal essay on volcanoes."
        );
    }
}

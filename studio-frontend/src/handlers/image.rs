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
#[template(path = "image.html")]
pub struct ImageTemplate {
    pub image_href: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ImageForm {
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

pub async fn image_page() -> impl IntoResponse {
    ImageTemplate { image_href: None }
}

pub async fn generate_image(
    State(state): State<AppState>,
    scope: ArtifactScope,
    Form(form): Form<ImageForm>,
) -> Result<impl IntoResponse, AppError> {
    form.validate()?;

    let result = state.image.generate(&form.description).await;
    metrics::observe_generation("image", metrics::outcome(&result));
    let generated = result.map_err(AppError::from)?;

    // The provider hosts the image at a short-lived URL; a failed download
    // is reported as a transfer error and writes nothing.
    let fetched = state.fetcher.fetch(&generated.url).await;
    metrics::observe_generation("image_download", metrics::outcome(&fetched));
    let bytes = fetched.map_err(|e| {
        tracing::warn!(url = %generated.url, error = %e, "image download failed");
        AppError::from(e)
    })?;

    let artifact = state
        .artifacts
        .write(scope.as_str(), ArtifactKind::Image, &bytes)
        .await?;

    tracing::info!(scope = %scope.as_str(), bytes = bytes.len(), "image generated");

    Ok(ImageTemplate {
        image_href: Some(artifact.href),
    })
}

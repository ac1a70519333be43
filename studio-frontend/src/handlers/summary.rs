use askama::Template;
use axum::{extract::State, response::IntoResponse, Form};
use serde::Deserialize;
use studio_core::error::AppError;
use validator::Validate;

use crate::services::metrics;
use crate::AppState;

#[derive(Template)]
#[template(path = "summary.html")]
pub struct SummaryTemplate {
    pub summary: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SummaryForm {
    #[validate(length(min = 1, message = "Text is required"))]
    pub text: String,
}

fn summary_prompt(text: &str) -> String {
    format!("Summarize the following text: {}", text)
}

pub async fn summary_page() -> impl IntoResponse {
    SummaryTemplate { summary: None }
}

/// Summaries are rendered inline only; nothing is written to disk.
pub async fn summarize(
    State(state): State<AppState>,
    Form(form): Form<SummaryForm>,
) -> Result<impl IntoResponse, AppError> {
    form.validate()?;

    let result = state.text.complete(&summary_prompt(&form.text)).await;
    metrics::observe_generation("summary", metrics::outcome(&result));
    let summary = result.map_err(AppError::from)?;

    tracing::info!(chars = summary.len(), "summary generated");

    Ok(SummaryTemplate {
        summary: Some(summary),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_prompt_prefixes_the_text() {
        assert_eq!(
            summary_prompt("a long article"),
            "Summarize the following text: a long article"
        );
    }
}

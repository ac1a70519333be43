use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    Form,
};
use serde::Deserialize;
use studio_core::error::AppError;
use tower_sessions::Session;

use crate::models::chat::{ChatLog, ChatTurn};
use crate::services::metrics;
use crate::AppState;

#[derive(Template)]
#[template(path = "chatbot.html")]
pub struct ChatbotTemplate {
    pub chat_history: Vec<ChatTurn>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}

pub async fn chatbot_page(session: Session) -> Result<impl IntoResponse, AppError> {
    let chat = ChatLog::new(session);

    Ok(ChatbotTemplate {
        chat_history: chat.turns().await?,
        error_message: None,
    })
}

pub async fn chatbot_turn(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ChatForm>,
) -> Result<impl IntoResponse, AppError> {
    let chat = ChatLog::new(session);

    // An empty message is not an error; the history is shown unchanged.
    if form.message.is_empty() {
        return Ok(ChatbotTemplate {
            chat_history: chat.turns().await?,
            error_message: None,
        });
    }

    match state.text.complete(&form.message).await {
        Ok(bot_message) => {
            let turns = chat
                .append(ChatTurn {
                    user_message: form.message,
                    bot_message,
                })
                .await?;
            metrics::observe_generation("chat", "ok");

            Ok(ChatbotTemplate {
                chat_history: turns,
                error_message: None,
            })
        }
        Err(e) => {
            // A failed turn stays on the page: the fault is shown inline
            // and the stored history is left exactly as it was.
            metrics::observe_generation("chat", "error");
            tracing::warn!(error = %e, "chat completion failed");

            Ok(ChatbotTemplate {
                chat_history: chat.turns().await?,
                error_message: Some(e.to_string()),
            })
        }
    }
}

pub async fn clear_chat(session: Session) -> Result<impl IntoResponse, AppError> {
    let chat = ChatLog::new(session);
    chat.clear().await?;

    tracing::info!("chat history cleared");

    Ok(Redirect::to("/chatbot"))
}

//! Session-backed chat history.

use serde::{Deserialize, Serialize};
use studio_core::error::AppError;
use tower_sessions::Session;

/// One user/bot exchange in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user_message: String,
    pub bot_message: String,
}

/// The chat history for one session.
///
/// All access to the stored conversation goes through this wrapper, so
/// there is exactly one place that knows the session key and its shape.
pub struct ChatLog {
    session: Session,
}

impl ChatLog {
    const KEY: &'static str = "chat_history";

    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Turns in insertion order. A session with no history reads as empty.
    pub async fn turns(&self) -> Result<Vec<ChatTurn>, AppError> {
        Ok(self
            .session
            .get::<Vec<ChatTurn>>(Self::KEY)
            .await
            .map_err(session_error)?
            .unwrap_or_default())
    }

    /// Append a turn, creating the history on first use. Returns the
    /// updated sequence.
    pub async fn append(&self, turn: ChatTurn) -> Result<Vec<ChatTurn>, AppError> {
        let mut turns = self.turns().await?;
        turns.push(turn);

        self.session
            .insert(Self::KEY, &turns)
            .await
            .map_err(session_error)?;

        Ok(turns)
    }

    /// Remove the history from the session entirely. Idempotent: clearing
    /// an absent history succeeds quietly.
    pub async fn clear(&self) -> Result<(), AppError> {
        self.session
            .remove::<Vec<ChatTurn>>(Self::KEY)
            .await
            .map_err(session_error)?;
        Ok(())
    }
}

fn session_error(err: tower_sessions::session::Error) -> AppError {
    AppError::SessionError(err.to_string())
}

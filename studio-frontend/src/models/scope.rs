//! Per-session artifact scope.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use uuid::Uuid;

/// Stable identifier that namespaces a session's generated artifacts, so
/// concurrent sessions never overwrite each other's downloads.
#[derive(Debug, Clone)]
pub struct ArtifactScope(String);

impl ArtifactScope {
    const KEY: &'static str = "artifact_scope";

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ArtifactScope
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await.map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to extract session",
            )
                .into_response()
        })?;

        if let Some(scope) = session.get::<String>(Self::KEY).await.unwrap_or(None) {
            return Ok(ArtifactScope(scope));
        }

        // First artifact-producing request in this session; mint a scope
        // and pin it to the session.
        let scope = Uuid::new_v4().to_string();
        if session.insert(Self::KEY, &scope).await.is_err() {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to persist artifact scope",
            )
                .into_response());
        }

        Ok(ArtifactScope(scope))
    }
}

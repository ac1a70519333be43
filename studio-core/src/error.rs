use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

/// Application-level error rendered as an HTML error page.
///
/// Every handler returns `Result<_, AppError>`; the variant determines the
/// HTTP status and the page copy, so no failure path falls through as an
/// unhandled panic.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Too many requests: {0}")]
    TooManyRequests(String, Option<u64>),

    #[error("Bad Gateway: {0}")]
    BadGateway(String),

    #[error("Transfer error: {0}")]
    TransferError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, title, detail, retry_after) = match self {
            AppError::ValidationError(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation error".to_string(),
                Some(err.to_string()),
                None,
            ),
            AppError::BadRequest(err) => (
                StatusCode::BAD_REQUEST,
                "Bad request".to_string(),
                Some(err.to_string()),
                None,
            ),
            AppError::TooManyRequests(msg, retry) => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many requests".to_string(),
                Some(msg),
                retry,
            ),
            AppError::BadGateway(msg) => (
                StatusCode::BAD_GATEWAY,
                "Upstream service error".to_string(),
                Some(msg),
                None,
            ),
            AppError::TransferError(msg) => (
                StatusCode::BAD_GATEWAY,
                "Download failed".to_string(),
                Some(msg),
                None,
            ),
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service unavailable".to_string(),
                Some(msg),
                None,
            ),
            AppError::SessionError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Session error".to_string(),
                Some(msg),
                None,
            ),
            AppError::InternalError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                Some(err.to_string()),
                None,
            ),
            AppError::ConfigError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
                Some(err.to_string()),
                None,
            ),
        };

        let mut res = (status, Html(error_page(status, &title, detail.as_deref()))).into_response();

        if let Some(retry) = retry_after {
            res.headers_mut()
                .insert(axum::http::header::RETRY_AFTER, retry.into());
        }

        res
    }
}

/// Minimal self-contained error page; detail text is HTML-escaped since it
/// may echo upstream response bodies.
fn error_page(status: StatusCode, title: &str, detail: Option<&str>) -> String {
    let detail_html = detail
        .map(|d| format!("<p class=\"detail\">{}</p>", escape_html(d)))
        .unwrap_or_default();

    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{code} {title}</title></head>\n\
         <body style=\"font-family: sans-serif; max-width: 40rem; margin: 4rem auto;\">\n\
         <h1>{code} {title}</h1>\n{detail}\n<p><a href=\"/\">Back to the studio</a></p>\n</body>\n</html>\n",
        code = status.as_u16(),
        title = escape_html(title),
        detail = detail_html,
    )
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("a & b"), "a &amp; b");
    }

    #[test]
    fn transfer_error_page_is_distinct_from_bad_gateway() {
        let transfer = error_page(StatusCode::BAD_GATEWAY, "Download failed", Some("status 404"));
        let gateway = error_page(
            StatusCode::BAD_GATEWAY,
            "Upstream service error",
            Some("rate limited"),
        );
        assert!(transfer.contains("Download failed"));
        assert!(gateway.contains("Upstream service error"));
        assert_ne!(transfer, gateway);
    }
}

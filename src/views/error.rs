use askama::Template;
use axum::http::StatusCode;

/// Standalone error page. It renders without the layout since there may be no session.
#[derive(Template)]
#[template(path = "errors/error.html")]
pub struct ErrorView {
    pub status_code: u16,
    pub title: String,
    pub message: String,
}

impl ErrorView {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            message: message.into(),
        }
    }
}

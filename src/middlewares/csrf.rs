use axum::{
    body::{self, Body},
    extract::Request,
    http::Method,
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::services::Session;

/// Hidden form field carrying the token
pub const CSRF_FORM_FIELD: &str = "authenticity_token";
/// Header alternative for non-form clients
pub const CSRF_HEADER: &str = "x-csrf-token";

const MAX_FORM_BYTES: usize = 64 * 1024;

/// CSRF middleware - unsafe methods must echo the session's token in the form or a header
pub async fn verify_csrf(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_safe(request.method()) {
        return Ok(next.run(request).await);
    }

    let expected = session.csrf_token();

    if let Some(token) = request.headers().get(CSRF_HEADER) {
        if !tokens_match(token.as_bytes(), expected.as_bytes()) {
            return Err(invalid_token());
        }
        return Ok(next.run(request).await);
    }

    // Buffer the form, check the token, then hand the body on untouched
    let (parts, body) = request.into_parts();
    let bytes = body::to_bytes(body, MAX_FORM_BYTES)
        .await
        .map_err(|e| AppError::BadRequest(format!("Unreadable request body: {}", e)))?;

    let fields: Vec<(String, String)> = serde_urlencoded::from_bytes(&bytes).unwrap_or_default();
    let submitted = fields
        .iter()
        .find(|(name, _)| name == CSRF_FORM_FIELD)
        .map(|(_, value)| value.as_str());

    let matches =
        submitted.is_some_and(|token| tokens_match(token.as_bytes(), expected.as_bytes()));
    if !matches {
        return Err(invalid_token());
    }

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

fn is_safe(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE)
}

/// Constant-time byte comparison
fn tokens_match(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn invalid_token() -> AppError {
    tracing::warn!("Rejected request with a missing or invalid authenticity token");
    AppError::Forbidden("Invalid authenticity token".to_string())
}

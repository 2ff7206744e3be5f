use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::SET_COOKIE, request::Parts, HeaderValue},
    middleware::Next,
    response::{IntoResponseParts, Response, ResponseParts},
};

use crate::error::AppError;
use crate::services::Session;
use crate::state::AppState;

/// Session middleware - decodes the session cookie once and injects the Session into request
/// extensions.
///
/// A session that was only just started is persisted here unless the handler already wrote
/// the cookie, so its CSRF token survives to the next request.
pub async fn load_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = state.sessions.load(request.headers());
    let fresh = session.is_dirty().then(|| session.clone());
    request.extensions_mut().insert(session);

    let mut response = next.run(request).await;

    if let Some(session) = fresh {
        if !response.headers().contains_key(SET_COOKIE) {
            match session.codec().cookie(session.data()) {
                Ok(cookie) => match HeaderValue::from_str(&cookie.to_string()) {
                    Ok(value) => {
                        response.headers_mut().append(SET_COOKIE, value);
                    }
                    Err(e) => tracing::error!("Invalid session cookie: {}", e),
                },
                Err(e) => tracing::error!("Failed to persist new session: {}", e),
            }
        }
    }

    response
}

/// Extractor for Session - can be used directly in handlers and middleware
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("Session layer is not installed".to_string()))
    }
}

/// Returning the Session from a handler rewrites the cookie when it changed
impl IntoResponseParts for Session {
    type Error = AppError;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if !self.is_dirty() {
            return Ok(res);
        }

        let cookie = self.codec().cookie(self.data())?;
        let value = HeaderValue::from_str(&cookie.to_string())
            .map_err(|e| AppError::Internal(format!("Invalid session cookie: {}", e)))?;
        res.headers_mut().append(SET_COOKIE, value);

        Ok(res)
    }
}

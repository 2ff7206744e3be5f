//! Rendering helpers shared by the page handlers

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::error::AppResult;
use crate::services::Session;

/// Render `view` with `status`, writing the session cookie when the session changed
pub fn render_page<T: Template>(session: Session, status: StatusCode, view: T) -> AppResult<Response> {
    let html = view.render()?;
    Ok((status, session, Html(html)).into_response())
}

/// Render a page with 200 OK
pub fn render_ok<T: Template>(session: Session, view: T) -> AppResult<Response> {
    render_page(session, StatusCode::OK, view)
}

/// Attach the session to a redirect
pub fn redirect(session: Session, response: Response) -> Response {
    (session, response).into_response()
}

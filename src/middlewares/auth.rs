use std::collections::HashMap;
use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Path, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::handlers::common::found;
use crate::models::User;
use crate::repositories::UserRepository;
use crate::services::{FlashLevel, Session};
use crate::state::AppState;

/// The signed-in user loaded for this request, if any
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<User>);

/// Extractor for CurrentUser - anonymous requests yield `CurrentUser(None)`
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .unwrap_or_default())
    }
}

/// Loads the session's user into request extensions. A session pointing at a user that no
/// longer exists is treated as anonymous.
pub async fn set_current_user(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(user_id) = session.current_user_id() else {
        return Ok(next.run(request).await);
    };

    let user = UserRepository::find_optional(&state.db, user_id).await?;
    let email = user.as_ref().map(|u| u.email.clone());
    let path = request.uri().path().to_string();
    request.extensions_mut().insert(CurrentUser(user));

    let response = next.run(request).await;

    if let Some(email) = email {
        tracing::debug!(event = "route_finished", %path, %email, status = %response.status());
    }
    Ok(response)
}

/// Requires a user be logged in before accessing a route
pub async fn authorize(mut session: Session, request: Request, next: Next) -> Response {
    if session.current_user_id().is_none() {
        session.flash(FlashLevel::Danger, "You must be authorized to see that page");
        return (session, found("/")).into_response();
    }
    next.run(request).await
}

/// Requires the `user_id` path parameter to be the session's user
pub async fn is_owner(
    mut session: Session,
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Response {
    let owns_path = match (session.current_user_id(), params.get("user_id")) {
        (Some(user_id), Some(path_user_id)) => user_id.to_string() == *path_user_id,
        _ => false,
    };

    if !owns_path {
        session.flash(FlashLevel::Warning, "You do not have access to that user.");
        return (session, found("/")).into_response();
    }
    next.run(request).await
}

/// Requires the session's user to have the admin role. The loaded user replaces the
/// request's current user.
pub async fn is_admin(
    State(state): State<AppState>,
    mut session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(user_id) = session.current_user_id() else {
        session.flash(FlashLevel::Danger, "You must be logged in to see that page");
        return Ok((session, found("/")).into_response());
    };

    let user = match UserRepository::find_optional(&state.db, user_id).await? {
        Some(user) if user.is_admin() => user,
        _ => {
            session.flash(FlashLevel::Danger, "You are not authorized to view that page");
            return Ok((session, found("/")).into_response());
        }
    };

    request.extensions_mut().insert(CurrentUser(Some(user)));
    Ok(next.run(request).await)
}

/// Rejects logged-in users by sending them to their profile
pub async fn anon_only(
    State(state): State<AppState>,
    mut session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(user_id) = session.current_user_id() else {
        return Ok(next.run(request).await);
    };

    match UserRepository::find_optional(&state.db, user_id).await? {
        Some(user) => {
            session.flash(FlashLevel::Success, "You are logged in");
            Ok((session, found(&format!("/users/{}", user.id))).into_response())
        }
        None => {
            // Stale session; forget it and carry on anonymously
            session.clear();
            request.extensions_mut().insert(session);
            Ok(next.run(request).await)
        }
    }
}

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::Response,
    Form,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::common::found;
use crate::handlers::view_renderer::{redirect, render_ok, render_page};
use crate::middlewares::CurrentUser;
use crate::services::{AuthService, FlashLevel, Session};
use crate::state::AppState;
use crate::views::{Layout, SignInView};

/// Shown for both an unknown email and a wrong password
pub const INVALID_CREDENTIALS: &str = "email: invalid email/password";

// ============ Request DTOs ============

#[derive(Debug, Default, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

// ============ Handlers ============

/// Render the sign-in form
pub async fn sign_in_form(
    State(state): State<AppState>,
    mut session: Session,
    CurrentUser(current): CurrentUser,
    uri: Uri,
) -> AppResult<Response> {
    let layout = Layout::new(
        "Sign in",
        &mut session,
        current.as_ref(),
        state.config.environment,
        uri.path(),
    );
    render_ok(session, SignInView::new(layout))
}

/// Check credentials and start a session for the user
pub async fn sign_in(
    State(state): State<AppState>,
    mut session: Session,
    CurrentUser(current): CurrentUser,
    uri: Uri,
    Form(form): Form<SignInForm>,
) -> AppResult<Response> {
    let Some(user) = AuthService::authenticate(&state.db, &form.email, &form.password).await?
    else {
        tracing::info!(event = "sign_in_failed", email = %form.email.trim());

        let layout = Layout::new(
            "Sign in",
            &mut session,
            current.as_ref(),
            state.config.environment,
            uri.path(),
        );
        let view = SignInView {
            layout,
            email: form.email,
            errors: vec![INVALID_CREDENTIALS.to_string()],
        };
        return render_page(session, StatusCode::UNPROCESSABLE_ENTITY, view);
    };

    session.set_current_user_id(user.id);
    session.flash(FlashLevel::Success, "You are logged in.");
    tracing::info!(event = "user_signed_in", user_id = %user.id);

    Ok(redirect(session, found(&format!("/users/{}", user.id))))
}

/// Forget the session and go home
pub async fn sign_out(mut session: Session) -> Response {
    if let Some(user_id) = session.current_user_id() {
        tracing::info!(event = "user_signed_out", %user_id);
    }

    session.clear();
    session.flash(FlashLevel::Success, "You have been logged out!");
    redirect(session, found("/"))
}

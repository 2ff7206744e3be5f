use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::Response,
    Form,
};
use sea_orm::TransactionTrait;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::common::{found, see_other, temporary};
use crate::handlers::view_renderer::{redirect, render_ok, render_page};
use crate::middlewares::CurrentUser;
use crate::models::{CreateUser, User, ValidationErrors};
use crate::repositories::{ContractRepository, UserRepository};
use crate::services::{AuthService, FlashLevel, Session};
use crate::state::AppState;
use crate::views::{Layout, NewUserView, UserShowView};

// ============ Request DTOs ============

/// Password change form on the profile page
#[derive(Debug, Default, Deserialize)]
pub struct ChangePasswordForm {
    #[serde(default, rename = "CurrentPassword", alias = "current_password")]
    pub current_password: String,
    #[serde(default, rename = "NewPassword", alias = "new_password")]
    pub new_password: String,
}

// ============ Handlers ============

/// Render the sign-up form
pub async fn new_user(
    State(state): State<AppState>,
    mut session: Session,
    CurrentUser(current): CurrentUser,
    uri: Uri,
) -> AppResult<Response> {
    let layout = Layout::new(
        "Sign up",
        &mut session,
        current.as_ref(),
        state.config.environment,
        uri.path(),
    );
    render_ok(session, NewUserView::new(layout))
}

/// Register a new member account
pub async fn create_user(
    State(state): State<AppState>,
    mut session: Session,
    CurrentUser(current): CurrentUser,
    uri: Uri,
    Form(form): Form<CreateUser>,
) -> AppResult<Response> {
    let mut errors = form.validate();

    let txn = state.db.begin().await?;

    let email = form.normalized_email();
    if !email.is_empty() && UserRepository::email_taken(&txn, &email, None).await? {
        errors.add("email", "Email is already taken");
    }

    if errors.has_any() {
        drop(txn);
        let page = SignUpPage {
            current: current.as_ref(),
            path: uri.path(),
            form: &form,
        };
        return render_sign_up_errors(&state, session, page, errors);
    }

    let password_hash = AuthService::hash_password(&form.password, state.config.bcrypt_cost)?;
    let user = match UserRepository::create(&txn, &form, &password_hash).await {
        Ok(user) => user,
        // Lost a race with a concurrent sign-up for the same email
        Err(AppError::Conflict(message)) => {
            drop(txn);
            errors.add("email", message);
            let page = SignUpPage {
                current: current.as_ref(),
                path: uri.path(),
                form: &form,
            };
            return render_sign_up_errors(&state, session, page, errors);
        }
        Err(e) => return Err(e),
    };
    txn.commit().await?;

    tracing::info!(event = "user_created", user_id = %user.id, email = %user.email);

    session.flash(FlashLevel::Success, "New account created. Please log in.");
    Ok(redirect(session, see_other("/signin")))
}

/// Profile page of the signed-in user
pub async fn show_user(
    State(state): State<AppState>,
    mut session: Session,
    CurrentUser(current): CurrentUser,
    uri: Uri,
    Path(user_id): Path<Uuid>,
) -> AppResult<Response> {
    let Some(user) = UserRepository::find_optional(&state.db, user_id).await? else {
        session.flash(FlashLevel::Warning, "Cannot find that user.");
        return Ok(redirect(session, temporary("/")));
    };

    let contracts = ContractRepository::list_by_user(&state.db, user.id).await?;

    let layout = Layout::new(
        user.full_name(),
        &mut session,
        current.as_ref(),
        state.config.environment,
        uri.path(),
    );
    render_ok(session, UserShowView::new(layout, &user, contracts))
}

/// Change the signed-in user's password
pub async fn update_user(
    State(state): State<AppState>,
    mut session: Session,
    Path(user_id): Path<Uuid>,
    Form(form): Form<ChangePasswordForm>,
) -> AppResult<Response> {
    let profile_url = format!("/users/{}", user_id);

    if form.current_password.is_empty() || form.new_password.is_empty() {
        session.flash(FlashLevel::Warning, "Form is incomplete.");
        return Ok(redirect(session, found(&profile_url)));
    }

    let txn = state.db.begin().await?;

    let Some(user) = UserRepository::find_optional(&txn, user_id).await? else {
        session.flash(FlashLevel::Warning, "Cannot find that user.");
        return Ok(redirect(session, temporary("/")));
    };

    if !AuthService::verify_password(&form.current_password, &user.password_hash)? {
        session.flash(
            FlashLevel::Warning,
            "Password does not match the one on record.",
        );
        return Ok(redirect(session, see_other(&profile_url)));
    }

    let password_hash = AuthService::hash_password(&form.new_password, state.config.bcrypt_cost)?;
    UserRepository::update_password(&txn, user.id, &password_hash).await?;
    txn.commit().await?;

    tracing::info!(event = "password_changed", user_id = %user.id);

    session.flash(FlashLevel::Success, "Password changed.");
    Ok(redirect(session, see_other(&profile_url)))
}

// ============ Helpers ============

struct SignUpPage<'a> {
    current: Option<&'a User>,
    path: &'a str,
    form: &'a CreateUser,
}

fn render_sign_up_errors(
    state: &AppState,
    mut session: Session,
    page: SignUpPage<'_>,
    errors: ValidationErrors,
) -> AppResult<Response> {
    let layout = Layout::new(
        "Sign up",
        &mut session,
        page.current,
        state.config.environment,
        page.path,
    );
    let view = NewUserView::with_form(layout, page.form, errors.messages());
    render_page(session, StatusCode::UNPROCESSABLE_ENTITY, view)
}

use axum::{
    extract::{Path, State},
    http::Uri,
    response::Response,
    Form,
};
use sea_orm::TransactionTrait;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::common::{see_other, temporary};
use crate::handlers::view_renderer::{redirect, render_ok};
use crate::middlewares::CurrentUser;
use crate::models::Role;
use crate::repositories::{ContractRepository, UserRepository};
use crate::services::{FlashLevel, Session};
use crate::state::AppState;
use crate::views::{AdminUserView, AdminUsersView, Layout};

/// Checkbox value granting the admin role
pub const SET_ADMIN: &str = "set_admin";

// ============ Request DTOs ============

#[derive(Debug, Default, Deserialize)]
pub struct UpdateRoleForm {
    /// Absent when the checkbox is cleared
    #[serde(default, rename = "AdminRole")]
    pub admin_role: Option<String>,
}

impl UpdateRoleForm {
    /// The requested role; `None` leaves the role unchanged
    pub fn role(&self) -> Option<Role> {
        match self.admin_role.as_deref() {
            None => Some(Role::Member),
            Some(SET_ADMIN) => Some(Role::Admin),
            Some(_) => None,
        }
    }
}

// ============ Handlers ============

/// Every user account
pub async fn list_users(
    State(state): State<AppState>,
    mut session: Session,
    CurrentUser(current): CurrentUser,
    uri: Uri,
) -> AppResult<Response> {
    let users = UserRepository::all(&state.db).await?;

    let layout = Layout::new(
        "Users",
        &mut session,
        current.as_ref(),
        state.config.environment,
        uri.path(),
    );
    render_ok(session, AdminUsersView::new(layout, &users))
}

/// One account with its contracts and the role form
pub async fn show_user(
    State(state): State<AppState>,
    mut session: Session,
    CurrentUser(current): CurrentUser,
    uri: Uri,
    Path(user_id): Path<String>,
) -> AppResult<Response> {
    let user = match user_id.trim().parse::<Uuid>() {
        Ok(id) => UserRepository::find_optional(&state.db, id).await?,
        Err(_) => None,
    };
    let Some(user) = user else {
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
    render_ok(session, AdminUserView::new(layout, &user, &contracts))
}

/// Grant or revoke the admin role
pub async fn update_user(
    State(state): State<AppState>,
    mut session: Session,
    Path(user_id): Path<String>,
    Form(form): Form<UpdateRoleForm>,
) -> AppResult<Response> {
    let txn = state.db.begin().await?;

    let user = match user_id.trim().parse::<Uuid>() {
        Ok(id) => UserRepository::find_optional(&txn, id).await?,
        Err(_) => None,
    };
    let Some(user) = user else {
        session.flash(FlashLevel::Warning, "Cannot find that user.");
        return Ok(redirect(session, temporary("/")));
    };

    if let Some(role) = form.role() {
        UserRepository::set_role(&txn, user.id, role).await?;
        txn.commit().await?;
        tracing::info!(event = "user_role_changed", user_id = %user.id, %role);
        session.flash(FlashLevel::Success, "User updated.");
    }

    Ok(redirect(session, see_other(&format!("/admin/users/{}", user.id))))
}

use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    response::Response,
    Form,
};
use sea_orm::TransactionTrait;

use crate::error::{AppError, AppResult};
use crate::handlers::common::{see_other, temporary, Pagination, PaginationParams, BOSSES_PER_PAGE};
use crate::handlers::view_renderer::{redirect, render_ok, render_page};
use crate::middlewares::CurrentUser;
use crate::models::CreateBoss;
use crate::repositories::{BossRepository, Repository};
use crate::services::{FlashLevel, Session};
use crate::state::AppState;
use crate::views::{BossShowView, BossesIndexView, Layout, NewBossView};

/// Paginated list of bosses
pub async fn list_bosses(
    State(state): State<AppState>,
    mut session: Session,
    CurrentUser(current): CurrentUser,
    uri: Uri,
    Query(params): Query<PaginationParams>,
) -> AppResult<Response> {
    let total = BossRepository::count(&state.db).await?;
    let pagination = Pagination::new(params.page(), BOSSES_PER_PAGE, total);
    let bosses = if pagination.is_out_of_range() {
        session.flash(
            FlashLevel::Warning,
            "No bosses found. Try a lower page number.",
        );
        Vec::new()
    } else {
        BossRepository::list(&state.db, pagination.per_page, pagination.offset()).await?
    };

    let layout = Layout::new(
        "Bosses",
        &mut session,
        current.as_ref(),
        state.config.environment,
        uri.path(),
    );
    render_ok(session, BossesIndexView::new(layout, &bosses, &pagination))
}

/// Render the new-boss form
pub async fn new_boss(
    State(state): State<AppState>,
    mut session: Session,
    CurrentUser(current): CurrentUser,
    uri: Uri,
) -> AppResult<Response> {
    tracing::debug!(event = "new_boss_form", user_id = ?session.current_user_id());

    let layout = Layout::new(
        "New boss",
        &mut session,
        current.as_ref(),
        state.config.environment,
        uri.path(),
    );
    render_ok(session, NewBossView::new(layout))
}

/// Create a boss, optionally continuing to the contract form for it
pub async fn create_boss(
    State(state): State<AppState>,
    mut session: Session,
    CurrentUser(current): CurrentUser,
    uri: Uri,
    Form(form): Form<CreateBoss>,
) -> AppResult<Response> {
    let errors = form.validate();
    if errors.has_any() {
        let layout = Layout::new(
            "New boss",
            &mut session,
            current.as_ref(),
            state.config.environment,
            uri.path(),
        );
        let view = NewBossView::with_form(layout, &form, errors.messages());
        return render_page(session, StatusCode::UNPROCESSABLE_ENTITY, view);
    }

    let txn = state.db.begin().await?;
    let boss = BossRepository::create(&txn, &form.name).await?;
    txn.commit().await?;

    tracing::info!(event = "boss_created", boss_id = boss.id, name = %boss.name);
    session.flash(FlashLevel::Success, "Boss was created successfully");

    if !form.wants_contract() {
        return Ok(redirect(session, see_other(&format!("/bosses/{}", boss.id))));
    }

    let Some(user_id) = session.current_user_id() else {
        return Err(AppError::Unauthorized);
    };
    session.flash(FlashLevel::Warning, "Set a rate for this contract");
    Ok(redirect(
        session,
        see_other(&format!("/users/{}/contracts/new?bid={}", user_id, boss.id)),
    ))
}

/// A boss with its contracts
pub async fn show_boss(
    State(state): State<AppState>,
    mut session: Session,
    CurrentUser(current): CurrentUser,
    uri: Uri,
    Path(boss_id): Path<String>,
) -> AppResult<Response> {
    let detail = match boss_id.trim().parse::<i32>() {
        Ok(id) => match BossRepository::find_detail(&state.db, id).await {
            Ok(detail) => Some(detail),
            Err(AppError::NotFound(_)) => None,
            Err(e) => return Err(e),
        },
        Err(_) => None,
    };

    let Some(detail) = detail else {
        session.flash(FlashLevel::Warning, "Cannot find that boss.");
        return Ok(redirect(session, temporary("/")));
    };

    let user_id = session.current_user_id().map(|id| id.to_string());
    let layout = Layout::new(
        detail.boss.name.clone(),
        &mut session,
        current.as_ref(),
        state.config.environment,
        uri.path(),
    );
    render_ok(session, BossShowView::new(layout, &detail, user_id))
}

use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::Response,
    Form,
};
use sea_orm::{ConnectionTrait, TransactionTrait};
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::common::{see_other, temporary};
use crate::handlers::view_renderer::{redirect, render_ok, render_page};
use crate::middlewares::CurrentUser;
use crate::models::{Contract, Task, TaskDefaults, TaskForm};
use crate::repositories::{ContractRepository, TaskRepository};
use crate::services::{FlashLevel, Session};
use crate::state::AppState;
use crate::views::{Layout, TaskEditView, TaskFormView, TaskRow, TaskShowView};

const TASK_NOT_FOUND: &str = "Cannot find that task.";

/// Show one task
pub async fn show_task(
    State(state): State<AppState>,
    mut session: Session,
    CurrentUser(current): CurrentUser,
    uri: Uri,
    Path(task_id): Path<String>,
) -> AppResult<Response> {
    let Some((task, contract)) =
        load_owned_task(&state.db, session.current_user_id(), &task_id).await?
    else {
        session.flash(FlashLevel::Warning, TASK_NOT_FOUND);
        return Ok(redirect(session, temporary("/")));
    };

    let layout = Layout::new(
        task.description.clone(),
        &mut session,
        current.as_ref(),
        state.config.environment,
        uri.path(),
    );
    let view = TaskShowView {
        layout,
        task: TaskRow::from(&task),
        contract_url: contract_url(&contract),
    };
    render_ok(session, view)
}

/// Render the edit form for a task
pub async fn edit_task(
    State(state): State<AppState>,
    mut session: Session,
    CurrentUser(current): CurrentUser,
    uri: Uri,
    Path(task_id): Path<String>,
) -> AppResult<Response> {
    let Some((task, contract)) =
        load_owned_task(&state.db, session.current_user_id(), &task_id).await?
    else {
        session.flash(FlashLevel::Warning, TASK_NOT_FOUND);
        return Ok(redirect(session, temporary("/")));
    };

    let layout = Layout::new(
        "Edit task",
        &mut session,
        current.as_ref(),
        state.config.environment,
        uri.path(),
    );
    let view = TaskEditView {
        layout,
        form: TaskFormView::new(edit_url(&task), "Save task", &TaskForm::from_task(&task)),
        errors: Vec::new(),
        contract_url: contract_url(&contract),
    };
    render_ok(session, view)
}

/// Save an edited task. Blank fields keep the stored values.
pub async fn update_task(
    State(state): State<AppState>,
    mut session: Session,
    CurrentUser(current): CurrentUser,
    uri: Uri,
    Path(task_id): Path<String>,
    Form(form): Form<TaskForm>,
) -> AppResult<Response> {
    let txn = state.db.begin().await?;

    let Some((task, contract)) =
        load_owned_task(&txn, session.current_user_id(), &task_id).await?
    else {
        session.flash(FlashLevel::Warning, TASK_NOT_FOUND);
        return Ok(redirect(session, temporary("/")));
    };

    let input = match form.validate(TaskDefaults::from(&task)) {
        Ok(input) => input,
        Err(errors) => {
            drop(txn);
            let layout = Layout::new(
                "Edit task",
                &mut session,
                current.as_ref(),
                state.config.environment,
                uri.path(),
            );
            let view = TaskEditView {
                layout,
                form: TaskFormView::new(edit_url(&task), "Save task", &form),
                errors: errors.messages(),
                contract_url: contract_url(&contract),
            };
            return render_page(session, StatusCode::UNPROCESSABLE_ENTITY, view);
        }
    };

    TaskRepository::update(&txn, task.id, &input).await?;
    txn.commit().await?;

    tracing::info!(event = "task_updated", task_id = task.id, contract_id = contract.id);

    session.flash(FlashLevel::Success, "Task updated.");
    Ok(redirect(session, see_other(&contract_url(&contract))))
}

// ============ Helpers ============

fn contract_url(contract: &Contract) -> String {
    format!("/users/{}/contracts/{}", contract.user_id, contract.id)
}

fn edit_url(task: &Task) -> String {
    format!("/tasks/{}/edit", task.id)
}

/// Load a task together with its contract. Tasks on other users' contracts are treated
/// like missing ones.
async fn load_owned_task<C>(
    db: &C,
    user_id: Option<Uuid>,
    raw_task_id: &str,
) -> AppResult<Option<(Task, Contract)>>
where
    C: ConnectionTrait,
{
    let (Some(user_id), Ok(task_id)) = (user_id, raw_task_id.trim().parse::<i32>()) else {
        return Ok(None);
    };

    let Some(task) = TaskRepository::find_optional(db, task_id).await? else {
        return Ok(None);
    };

    match ContractRepository::find_optional(db, task.contract_id).await? {
        Some(contract) if contract.user_id == user_id => Ok(Some((task, contract))),
        _ => Ok(None),
    }
}

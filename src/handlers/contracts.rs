use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    response::Response,
    Form,
};
use sea_orm::{ConnectionTrait, TransactionTrait};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::common::{see_other, temporary};
use crate::handlers::view_renderer::{redirect, render_ok, render_page};
use crate::middlewares::CurrentUser;
use crate::models::{ContractDetail, CreateContract, TaskDefaults, TaskForm, User};
use crate::repositories::{BossRepository, ContractRepository, TaskRepository};
use crate::services::{FlashLevel, Session};
use crate::state::AppState;
use crate::views::{ContractShowView, ContractsIndexView, Layout, NewContractView, TaskFormView};

// ============ Request DTOs ============

#[derive(Debug, Default, Deserialize)]
pub struct NewContractParams {
    /// Boss to preselect
    pub bid: Option<String>,
}

// ============ Handlers ============

/// The user's contracts
pub async fn list_contracts(
    State(state): State<AppState>,
    mut session: Session,
    CurrentUser(current): CurrentUser,
    uri: Uri,
    Path(user_id): Path<Uuid>,
) -> AppResult<Response> {
    let contracts = ContractRepository::list_by_user(&state.db, user_id).await?;

    let layout = Layout::new(
        "Contracts",
        &mut session,
        current.as_ref(),
        state.config.environment,
        uri.path(),
    );
    let view = ContractsIndexView::new(layout, &user_id.to_string(), &contracts);
    render_ok(session, view)
}

/// Render the new-contract form, optionally preset to `?bid=`
pub async fn new_contract(
    State(state): State<AppState>,
    session: Session,
    CurrentUser(current): CurrentUser,
    uri: Uri,
    Path(user_id): Path<Uuid>,
    Query(params): Query<NewContractParams>,
) -> AppResult<Response> {
    let selected = params.bid.as_deref().and_then(|bid| bid.trim().parse().ok());
    let form = CreateContract::default();

    render_contract_form(
        &state.db,
        &state,
        session,
        ContractFormPage {
            current: current.as_ref(),
            path: uri.path(),
            user_id,
            selected,
            form: &form,
            errors: Vec::new(),
            status: StatusCode::OK,
        },
    )
    .await
}

/// Open a contract between the user and a boss. At most one contract per pair.
pub async fn create_contract(
    State(state): State<AppState>,
    mut session: Session,
    CurrentUser(current): CurrentUser,
    uri: Uri,
    Path(user_id): Path<Uuid>,
    Form(form): Form<CreateContract>,
) -> AppResult<Response> {
    let mut page = ContractFormPage {
        current: current.as_ref(),
        path: uri.path(),
        user_id,
        selected: form.boss_id.trim().parse().ok(),
        form: &form,
        errors: Vec::new(),
        status: StatusCode::OK,
    };

    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            page.errors = errors.messages();
            page.status = StatusCode::UNPROCESSABLE_ENTITY;
            return render_contract_form(&state.db, &state, session, page).await;
        }
    };

    let txn = state.db.begin().await?;

    if BossRepository::find_optional(&txn, input.boss_id)
        .await?
        .is_none()
    {
        session.flash(FlashLevel::Warning, "Cannot find that Employer.");
        return render_contract_form(&txn, &state, session, page).await;
    }

    // Read-then-write: two concurrent submissions can still both pass this check
    if ContractRepository::exists_for(&txn, user_id, input.boss_id).await? {
        session.flash(FlashLevel::Warning, "Contract already exists.");
        return render_contract_form(&txn, &state, session, page).await;
    }

    let contract = ContractRepository::create(&txn, user_id, &input).await?;
    txn.commit().await?;

    tracing::info!(
        event = "contract_created",
        contract_id = contract.id,
        boss_id = contract.boss_id,
        %user_id
    );

    session.flash(FlashLevel::Success, "Contract created.");
    Ok(redirect(session, see_other(&format!("/users/{}", user_id))))
}

/// One contract with its tasks in chronological order
pub async fn show_contract(
    State(state): State<AppState>,
    mut session: Session,
    CurrentUser(current): CurrentUser,
    uri: Uri,
    Path((user_id, contract_id)): Path<(Uuid, String)>,
) -> AppResult<Response> {
    let Some(detail) = load_owned_contract(&state.db, user_id, &contract_id).await? else {
        session.flash(FlashLevel::Warning, "Cannot find that contract.");
        return Ok(redirect(session, temporary(&format!("/users/{}", user_id))));
    };

    let form = TaskForm::blank(TaskDefaults::new_on_contract(detail.contract.rate));
    let layout = Layout::new(
        detail.boss.name.clone(),
        &mut session,
        current.as_ref(),
        state.config.environment,
        uri.path(),
    );
    let form = TaskFormView::new(
        ContractShowView::task_create_url(&detail),
        "Add task",
        &form,
    );

    render_ok(session, ContractShowView::new(layout, &detail, form, Vec::new()))
}

/// Log a task on the contract. Blank fields fall back to "now" and the contract rate.
pub async fn create_task(
    State(state): State<AppState>,
    mut session: Session,
    CurrentUser(current): CurrentUser,
    uri: Uri,
    Path((user_id, contract_id)): Path<(Uuid, String)>,
    Form(form): Form<TaskForm>,
) -> AppResult<Response> {
    let txn = state.db.begin().await?;

    let Some(detail) = load_owned_contract(&txn, user_id, &contract_id).await? else {
        session.flash(FlashLevel::Warning, "Cannot find that contract.");
        return Ok(redirect(session, temporary(&format!("/users/{}", user_id))));
    };

    let input = match form.validate(TaskDefaults::new_on_contract(detail.contract.rate)) {
        Ok(input) => input,
        Err(errors) => {
            drop(txn);
            let layout = Layout::new(
                detail.boss.name.clone(),
                &mut session,
                current.as_ref(),
                state.config.environment,
                uri.path(),
            );
            let form = TaskFormView::new(
                ContractShowView::task_create_url(&detail),
                "Add task",
                &form,
            );
            let view = ContractShowView::new(layout, &detail, form, errors.messages());
            return render_page(session, StatusCode::UNPROCESSABLE_ENTITY, view);
        }
    };

    let task = TaskRepository::create(&txn, detail.contract.id, &input).await?;
    txn.commit().await?;

    tracing::info!(event = "task_created", task_id = task.id, contract_id = task.contract_id);

    session.flash(FlashLevel::Success, "Task created successfully");
    Ok(redirect(
        session,
        see_other(&format!("/users/{}/contracts/{}", user_id, detail.contract.id)),
    ))
}

// ============ Helpers ============

/// Everything the new-contract form needs besides the boss list
struct ContractFormPage<'a> {
    current: Option<&'a User>,
    path: &'a str,
    user_id: Uuid,
    selected: Option<i32>,
    form: &'a CreateContract,
    errors: Vec<String>,
    status: StatusCode,
}

async fn render_contract_form<C>(
    db: &C,
    state: &AppState,
    mut session: Session,
    page: ContractFormPage<'_>,
) -> AppResult<Response>
where
    C: ConnectionTrait,
{
    let bosses = BossRepository::all(db).await?;

    let layout = Layout::new(
        "New contract",
        &mut session,
        page.current,
        state.config.environment,
        page.path,
    );
    let view = NewContractView::new(layout, &page.user_id.to_string(), &bosses, page.selected)
        .with_form(page.form, page.errors);

    render_page(session, page.status, view)
}

/// Load a contract of `user_id`. Unknown ids and contracts of other users yield `None`.
async fn load_owned_contract<C>(
    db: &C,
    user_id: Uuid,
    raw_contract_id: &str,
) -> AppResult<Option<ContractDetail>>
where
    C: ConnectionTrait,
{
    let Ok(contract_id) = raw_contract_id.trim().parse::<i32>() else {
        return Ok(None);
    };

    match ContractRepository::load_contract(db, contract_id).await {
        Ok(detail) if detail.contract.user_id == user_id => Ok(Some(detail)),
        Ok(_) | Err(AppError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

use axum::{extract::State, http::Uri, response::Response};

use crate::error::AppResult;
use crate::handlers::view_renderer::render_ok;
use crate::middlewares::CurrentUser;
use crate::repositories::ContractRepository;
use crate::services::Session;
use crate::state::AppState;
use crate::views::{HomeView, Layout};

/// Landing page
pub async fn home(
    State(state): State<AppState>,
    mut session: Session,
    CurrentUser(current): CurrentUser,
    uri: Uri,
) -> AppResult<Response> {
    let layout = Layout::new(
        "Home",
        &mut session,
        current.as_ref(),
        state.config.environment,
        uri.path(),
    );

    let view = match &current {
        Some(user) => {
            let contracts = ContractRepository::list_by_user(&state.db, user.id).await?;
            HomeView::signed_in(layout, &contracts)
        }
        None => HomeView::anonymous(layout),
    };

    render_ok(session, view)
}

// Library crate for Timesheet
// Exports modules for use by the server binary and tests

pub mod config;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod middlewares;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod views;

use axum::{
    handler::Handler,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::handlers::{
    admin, create_boss, create_contract, create_task, create_user, edit_task, home,
    list_bosses, list_contracts, new_boss, new_contract, new_user, show_boss, show_contract,
    show_task, show_user, sign_in, sign_in_form, sign_out, update_task, update_user,
};
use crate::middlewares::{
    anon_only, authorize, force_ssl, is_admin, is_owner, load_session, set_current_user,
    verify_csrf,
};
use crate::state::AppState;

/// Build the application router with the given state
pub fn build_router(state: AppState) -> Router {
    // Routes under a user's own path
    let owner_routes = Router::new()
        .route("/users/{user_id}", get(show_user).post(update_user))
        .route(
            "/users/{user_id}/contracts",
            get(list_contracts).post(create_contract),
        )
        .route("/users/{user_id}/contracts/new", get(new_contract))
        .route(
            "/users/{user_id}/contracts/{contract_id}",
            get(show_contract),
        )
        .route(
            "/users/{user_id}/contracts/{contract_id}/task/create",
            post(create_task),
        )
        .route_layer(from_fn(is_owner))
        .route_layer(from_fn(authorize));

    // Routes for any signed-in user
    let protected_routes = Router::new()
        .route("/bosses", get(list_bosses))
        .route("/bosses/index", get(list_bosses))
        .route("/bosses/new", get(new_boss))
        .route("/bosses/create", post(create_boss))
        .route("/bosses/{boss_id}", get(show_boss))
        .route("/tasks/{task_id}", get(show_task))
        .route("/tasks/{task_id}/edit", get(edit_task).post(update_task))
        .route_layer(from_fn(authorize));

    let admin_routes = Router::new()
        .route("/admin/users", get(admin::list_users))
        .route(
            "/admin/users/{user_id}",
            get(admin::show_user).post(admin::update_user),
        )
        .route_layer(from_fn_with_state(state.clone(), is_admin))
        .route_layer(from_fn(authorize));

    let anon_only_layer = from_fn_with_state(state.clone(), anon_only);

    Router::new()
        .route("/", get(home))
        // Public auth routes
        .route(
            "/signin",
            get(sign_in_form.layer(anon_only_layer.clone())).post(sign_in),
        )
        .route("/signout", delete(sign_out).post(sign_out))
        .route(
            "/users",
            get(new_user.layer(anon_only_layer)).post(create_user),
        )
        .merge(owner_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .fallback_service(ServeDir::new(&state.config.assets_dir))
        // Outermost last: trace, force SSL, session, CSRF, current user
        .layer(from_fn_with_state(state.clone(), set_current_user))
        .layer(from_fn(verify_csrf))
        .layer(from_fn_with_state(state.clone(), load_session))
        .layer(from_fn_with_state(state.clone(), force_ssl))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

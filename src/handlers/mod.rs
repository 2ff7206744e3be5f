pub mod admin;
pub mod auth;
pub mod bosses;
pub mod common;
pub mod contracts;
pub mod home;
pub mod tasks;
pub mod users;
pub mod view_renderer;

pub use auth::{sign_in, sign_in_form, sign_out, SignInForm};
pub use bosses::{create_boss, list_bosses, new_boss, show_boss};
pub use common::{Pagination, PaginationParams};
pub use contracts::{create_contract, create_task, list_contracts, new_contract, show_contract};
pub use home::home;
pub use tasks::{edit_task, show_task, update_task};
pub use users::{create_user, new_user, show_user, update_user, ChangePasswordForm};

//! View models for the HTML pages
//!
//! Handlers turn domain models into these structs; each one is an askama template, so the
//! templates only ever see display-ready strings.

pub mod admin;
pub mod auth;
pub mod bosses;
pub mod contracts;
pub mod error;
pub mod home;
pub mod layout;
pub mod tasks;
pub mod users;

pub use admin::{AdminUserView, AdminUsersView};
pub use auth::SignInView;
pub use bosses::{BossShowView, BossesIndexView, NewBossView, PagerView};
pub use contracts::{ContractRow, ContractShowView, ContractsIndexView, NewContractView};
pub use error::ErrorView;
pub use home::HomeView;
pub use layout::{FlashView, Layout};
pub use tasks::{TaskEditView, TaskFormView, TaskRow, TaskShowView};
pub use users::{NewUserView, UserRow, UserShowView};

use askama::Template;

use super::{ContractRow, Layout};
use crate::models::{ContractWithBoss, CreateUser, User};

/// A user as listed on profile and admin pages
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub url: String,
    pub admin_url: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            full_name: user.full_name(),
            role: user.role.to_string(),
            url: format!("/users/{}", user.id),
            admin_url: format!("/admin/users/{}", user.id),
        }
    }
}

/// Sign-up form
#[derive(Template)]
#[template(path = "users/new.html")]
pub struct NewUserView {
    pub layout: Layout,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub errors: Vec<String>,
}

impl NewUserView {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            errors: Vec::new(),
        }
    }

    /// Re-render a rejected form; passwords are never echoed back
    pub fn with_form(layout: Layout, form: &CreateUser, errors: Vec<String>) -> Self {
        Self {
            layout,
            email: form.email.clone(),
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            errors,
        }
    }
}

/// Profile page with the password change form
#[derive(Template)]
#[template(path = "users/show.html")]
pub struct UserShowView {
    pub layout: Layout,
    pub user: UserRow,
    pub contracts: Vec<ContractRow>,
}

impl UserShowView {
    pub fn new(layout: Layout, user: &User, contracts: Vec<ContractWithBoss>) -> Self {
        Self {
            layout,
            user: UserRow::from(user),
            contracts: contracts.iter().map(ContractRow::from).collect(),
        }
    }
}

use askama::Template;

use super::{ContractRow, Layout, UserRow};
use crate::models::{ContractWithBoss, User};

#[derive(Template)]
#[template(path = "admin/index.html")]
pub struct AdminUsersView {
    pub layout: Layout,
    pub users: Vec<UserRow>,
}

impl AdminUsersView {
    pub fn new(layout: Layout, users: &[User]) -> Self {
        Self {
            layout,
            users: users.iter().map(UserRow::from).collect(),
        }
    }
}

/// One user with the role form
#[derive(Template)]
#[template(path = "admin/show.html")]
pub struct AdminUserView {
    pub layout: Layout,
    pub user: UserRow,
    pub is_admin: bool,
    pub contracts: Vec<ContractRow>,
}

impl AdminUserView {
    pub fn new(layout: Layout, user: &User, contracts: &[ContractWithBoss]) -> Self {
        Self {
            layout,
            user: UserRow::from(user),
            is_admin: user.is_admin(),
            contracts: contracts.iter().map(ContractRow::from).collect(),
        }
    }
}

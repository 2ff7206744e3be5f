use askama::Template;

use super::{Layout, TaskFormView, TaskRow};
use crate::models::{format_duration, Boss, ContractDetail, ContractWithBoss, CreateContract};

/// A contract as listed on a user's pages
#[derive(Debug, Clone)]
pub struct ContractRow {
    pub id: i32,
    pub boss_name: String,
    pub boss_url: String,
    pub rate: i32,
    pub url: String,
}

impl From<&ContractWithBoss> for ContractRow {
    fn from(row: &ContractWithBoss) -> Self {
        Self {
            id: row.contract.id,
            boss_name: row.boss.name.clone(),
            boss_url: format!("/bosses/{}", row.boss.id),
            rate: row.contract.rate,
            url: format!(
                "/users/{}/contracts/{}",
                row.contract.user_id, row.contract.id
            ),
        }
    }
}

#[derive(Template)]
#[template(path = "users/contracts_index.html")]
pub struct ContractsIndexView {
    pub layout: Layout,
    pub new_url: String,
    pub contracts: Vec<ContractRow>,
}

impl ContractsIndexView {
    pub fn new(layout: Layout, user_id: &str, contracts: &[ContractWithBoss]) -> Self {
        Self {
            layout,
            new_url: format!("/users/{}/contracts/new", user_id),
            contracts: contracts.iter().map(ContractRow::from).collect(),
        }
    }
}

/// An entry of the employer select list
#[derive(Debug, Clone)]
pub struct BossOption {
    pub id: i32,
    pub name: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "users/contracts_new.html")]
pub struct NewContractView {
    pub layout: Layout,
    pub action_url: String,
    pub bosses: Vec<BossOption>,
    pub rate: String,
    pub errors: Vec<String>,
}

impl NewContractView {
    /// `selected` presets the employer select, as given by `?bid=` or a rejected form
    pub fn new(layout: Layout, user_id: &str, bosses: &[Boss], selected: Option<i32>) -> Self {
        Self {
            layout,
            action_url: format!("/users/{}/contracts", user_id),
            bosses: bosses
                .iter()
                .map(|boss| BossOption {
                    id: boss.id,
                    name: boss.name.clone(),
                    selected: Some(boss.id) == selected,
                })
                .collect(),
            rate: String::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_form(mut self, form: &CreateContract, errors: Vec<String>) -> Self {
        self.rate = form.rate.clone();
        self.errors = errors;
        self
    }
}

/// Contract page: tasks in chronological order, totals and the new-task form
#[derive(Template)]
#[template(path = "users/contract_show.html")]
pub struct ContractShowView {
    pub layout: Layout,
    pub boss_name: String,
    pub boss_url: String,
    pub user_name: String,
    pub rate: i32,
    pub tasks: Vec<TaskRow>,
    pub total_time: String,
    pub total_earned: i64,
    pub form: TaskFormView,
    pub errors: Vec<String>,
}

impl ContractShowView {
    pub fn new(
        layout: Layout,
        detail: &ContractDetail,
        form: TaskFormView,
        errors: Vec<String>,
    ) -> Self {
        let total_minutes = i32::try_from(detail.total_minutes()).unwrap_or(i32::MAX);

        Self {
            layout,
            boss_name: detail.boss.name.clone(),
            boss_url: format!("/bosses/{}", detail.boss.id),
            user_name: detail.user.full_name(),
            rate: detail.contract.rate,
            tasks: detail.tasks.iter().map(TaskRow::from).collect(),
            total_time: format_duration(total_minutes),
            total_earned: detail.total_earned(),
            form,
            errors,
        }
    }

    /// Where new tasks for `detail` are posted
    pub fn task_create_url(detail: &ContractDetail) -> String {
        format!(
            "/users/{}/contracts/{}/task/create",
            detail.contract.user_id, detail.contract.id
        )
    }
}

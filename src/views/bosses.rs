use askama::Template;

use super::Layout;
use crate::handlers::common::Pagination;
use crate::models::{Boss, BossDetail, CreateBoss};

#[derive(Debug, Clone)]
pub struct BossRow {
    pub id: i32,
    pub name: String,
    pub url: String,
}

impl From<&Boss> for BossRow {
    fn from(boss: &Boss) -> Self {
        Self {
            id: boss.id,
            name: boss.name.clone(),
            url: format!("/bosses/{}", boss.id),
        }
    }
}

/// Previous/next links for an index page
#[derive(Debug, Clone)]
pub struct PagerView {
    pub page: u64,
    pub total_pages: u64,
    pub previous_url: Option<String>,
    pub next_url: Option<String>,
}

impl PagerView {
    pub fn new(pagination: &Pagination, base_url: &str) -> Self {
        Self {
            page: pagination.page,
            total_pages: pagination.total_pages(),
            previous_url: pagination
                .previous_page()
                .map(|page| format!("{}?page={}", base_url, page)),
            next_url: pagination
                .next_page()
                .map(|page| format!("{}?page={}", base_url, page)),
        }
    }
}

#[derive(Template)]
#[template(path = "bosses/index.html")]
pub struct BossesIndexView {
    pub layout: Layout,
    pub bosses: Vec<BossRow>,
    pub pager: PagerView,
}

impl BossesIndexView {
    pub fn new(layout: Layout, bosses: &[Boss], pagination: &Pagination) -> Self {
        Self {
            layout,
            bosses: bosses.iter().map(BossRow::from).collect(),
            pager: PagerView::new(pagination, "/bosses"),
        }
    }
}

#[derive(Template)]
#[template(path = "bosses/new.html")]
pub struct NewBossView {
    pub layout: Layout,
    pub name: String,
    pub create_contract: bool,
    pub errors: Vec<String>,
}

impl NewBossView {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            name: String::new(),
            create_contract: false,
            errors: Vec::new(),
        }
    }

    pub fn with_form(layout: Layout, form: &CreateBoss, errors: Vec<String>) -> Self {
        Self {
            layout,
            name: form.name.clone(),
            create_contract: form.wants_contract(),
            errors,
        }
    }
}

/// A contract held by the boss, named after the contracted user
#[derive(Debug, Clone)]
pub struct BossContractRow {
    pub user_name: String,
    pub rate: i32,
}

#[derive(Template)]
#[template(path = "bosses/show.html")]
pub struct BossShowView {
    pub layout: Layout,
    pub name: String,
    pub contracts: Vec<BossContractRow>,
    /// Contract form preset to this boss, for the signed-in user
    pub new_contract_url: Option<String>,
}

impl BossShowView {
    pub fn new(layout: Layout, detail: &BossDetail, current_user_id: Option<String>) -> Self {
        Self {
            layout,
            name: detail.boss.name.clone(),
            contracts: detail
                .contracts
                .iter()
                .map(|(contract, user)| BossContractRow {
                    user_name: user.full_name(),
                    rate: contract.rate,
                })
                .collect(),
            new_contract_url: current_user_id.map(|user_id| {
                format!("/users/{}/contracts/new?bid={}", user_id, detail.boss.id)
            }),
        }
    }
}

use askama::Template;

use super::{ContractRow, Layout};
use crate::models::ContractWithBoss;

/// Landing page: a sign-up prompt for visitors, the contract list for signed-in users
#[derive(Template)]
#[template(path = "home/index.html")]
pub struct HomeView {
    pub layout: Layout,
    pub signed_in: bool,
    pub contracts: Vec<ContractRow>,
}

impl HomeView {
    pub fn anonymous(layout: Layout) -> Self {
        Self {
            layout,
            signed_in: false,
            contracts: Vec::new(),
        }
    }

    pub fn signed_in(layout: Layout, contracts: &[ContractWithBoss]) -> Self {
        Self {
            layout,
            signed_in: true,
            contracts: contracts.iter().map(ContractRow::from).collect(),
        }
    }
}

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{Contract, User, ValidationErrors};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub id: i32,
    pub name: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// New-boss form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBoss {
    #[serde(default)]
    pub name: String,
    /// Checkbox; present when the creator wants to open a contract right away
    #[serde(default, alias = "CreateContract")]
    pub create_contract: Option<String>,
}

impl CreateBoss {
    pub fn wants_contract(&self) -> bool {
        matches!(
            self.create_contract.as_deref(),
            Some("true") | Some("on") | Some("1")
        )
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require("name", "Name", &self.name);
        errors
    }
}

/// A boss together with every contract it holds and the contracted users
#[derive(Debug, Clone)]
pub struct BossDetail {
    pub boss: Boss,
    pub contracts: Vec<(Contract, User)>,
}

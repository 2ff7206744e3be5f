use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{Boss, Task, User, ValidationErrors};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub id: i32,
    /// Per hour
    pub rate: i32,
    pub boss_id: i32,
    pub user_id: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// New-contract form
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateContract {
    #[serde(default, alias = "BossID")]
    pub boss_id: String,
    #[serde(default, alias = "Rate")]
    pub rate: String,
}

/// A checked contract form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractInput {
    pub boss_id: i32,
    pub rate: i32,
}

impl CreateContract {
    pub fn validate(&self) -> Result<ContractInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        errors.require("boss_id", "Employer", &self.boss_id);
        let boss_id = if errors.has_any() {
            None
        } else {
            errors.parse_int("boss_id", "Employer", &self.boss_id)
        };

        let rate = if self.rate.trim().is_empty() {
            errors.add("rate", "Rate can not be blank.");
            None
        } else {
            errors.parse_int("rate", "Rate", &self.rate)
        };
        if matches!(rate, Some(r) if r < 0) {
            errors.add("rate", "Rate can not be negative.");
        }

        match (boss_id, rate) {
            (Some(boss_id), Some(rate)) if !errors.has_any() => Ok(ContractInput { boss_id, rate }),
            _ => Err(errors),
        }
    }
}

/// A contract with its boss, as listed on a user's pages
#[derive(Debug, Clone)]
pub struct ContractWithBoss {
    pub contract: Contract,
    pub boss: Boss,
}

/// A contract with every association loaded and its tasks in chronological order
#[derive(Debug, Clone)]
pub struct ContractDetail {
    pub contract: Contract,
    pub user: User,
    pub boss: Boss,
    pub tasks: Vec<Task>,
}

impl ContractDetail {
    /// Assemble the aggregate, ordering `tasks` by start time.
    pub fn new(contract: Contract, user: User, boss: Boss, mut tasks: Vec<Task>) -> Self {
        sort_tasks_by_start(&mut tasks);
        Self {
            contract,
            user,
            boss,
            tasks,
        }
    }

    pub fn total_minutes(&self) -> i64 {
        self.tasks.iter().map(|t| i64::from(t.duration)).sum()
    }

    /// Amount earned across all tasks, each billed at its own hourly rate, rounded down
    pub fn total_earned(&self) -> i64 {
        let rate_minutes: i64 = self
            .tasks
            .iter()
            .map(|t| i64::from(t.duration) * i64::from(t.rate))
            .sum();
        rate_minutes.div_euclid(60)
    }
}

/// Stable sort by ascending start time; tasks starting together keep their relative order.
pub fn sort_tasks_by_start(tasks: &mut [Task]) {
    tasks.sort_by_key(|t| t.start_time);
}

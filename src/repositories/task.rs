use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entity::task::{self, ActiveModel, Column, Entity as TaskEntity};
use crate::error::{AppError, AppResult};
use crate::models::{Task, TaskInput};

/// Task repository for database operations
pub struct TaskRepository;

impl TaskRepository {
    /// Find task by ID, `None` when it does not exist
    pub async fn find_optional<C>(db: &C, id: i32) -> AppResult<Option<Task>>
    where
        C: ConnectionTrait,
    {
        let model = TaskEntity::find_by_id(id).one(db).await?;
        Ok(model.map(|m| m.into()))
    }

    /// Create a new task on a contract
    pub async fn create<C>(db: &C, contract_id: i32, input: &TaskInput) -> AppResult<Task>
    where
        C: ConnectionTrait,
    {
        let now = time::OffsetDateTime::now_utc();
        let model = ActiveModel {
            contract_id: Set(contract_id),
            rate: Set(input.rate),
            description: Set(input.description.clone()),
            start_time: Set(input.start_time),
            end_time: Set(input.end_time),
            duration: Set(input.duration),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(db).await?;
        Ok(result.into())
    }

    /// Overwrite the editable fields of a task
    pub async fn update<C>(db: &C, id: i32, input: &TaskInput) -> AppResult<Task>
    where
        C: ConnectionTrait,
    {
        let model = TaskEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Task".to_string()))?;

        let mut active: ActiveModel = model.into();
        active.rate = Set(input.rate);
        active.description = Set(input.description.clone());
        active.start_time = Set(input.start_time);
        active.end_time = Set(input.end_time);
        active.duration = Set(input.duration);
        active.updated_at = Set(time::OffsetDateTime::now_utc());

        let result = active.update(db).await?;
        Ok(result.into())
    }

    /// Tasks of one contract in insertion (id) order
    pub async fn list_by_contract<C>(db: &C, contract_id: i32) -> AppResult<Vec<Task>>
    where
        C: ConnectionTrait,
    {
        let models = TaskEntity::find()
            .filter(Column::ContractId.eq(contract_id))
            .order_by_asc(Column::Id)
            .all(db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }
}

// Conversion from SeaORM model to our domain model
impl From<task::Model> for Task {
    fn from(m: task::Model) -> Self {
        Self {
            id: m.id,
            contract_id: m.contract_id,
            rate: m.rate,
            description: m.description,
            start_time: m.start_time,
            end_time: m.end_time,
            duration: m.duration,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

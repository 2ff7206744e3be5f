use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::boss::Entity as BossEntity;
use crate::entity::contract::{self, ActiveModel, Column, Entity as ContractEntity};
use crate::entity::user::Entity as UserEntity;
use crate::error::{AppError, AppResult};
use crate::models::{Contract, ContractDetail, ContractInput, ContractWithBoss};
use crate::repositories::TaskRepository;

/// Contract repository for database operations
pub struct ContractRepository;

impl ContractRepository {
    /// Find contract by ID, `None` when it does not exist
    pub async fn find_optional<C>(db: &C, id: i32) -> AppResult<Option<Contract>>
    where
        C: ConnectionTrait,
    {
        let model = ContractEntity::find_by_id(id).one(db).await?;
        Ok(model.map(|m| m.into()))
    }

    /// Create a new contract between `user_id` and `input.boss_id`.
    ///
    /// Callers check [`ContractRepository::exists_for`] first; nothing here prevents a
    /// concurrent duplicate.
    pub async fn create<C>(db: &C, user_id: Uuid, input: &ContractInput) -> AppResult<Contract>
    where
        C: ConnectionTrait,
    {
        let now = time::OffsetDateTime::now_utc();
        let model = ActiveModel {
            rate: Set(input.rate),
            boss_id: Set(input.boss_id),
            user_id: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(db).await?;
        Ok(result.into())
    }

    /// Whether the user already holds a contract with the boss
    pub async fn exists_for<C>(db: &C, user_id: Uuid, boss_id: i32) -> AppResult<bool>
    where
        C: ConnectionTrait,
    {
        let count = ContractEntity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::BossId.eq(boss_id))
            .count(db)
            .await?;

        Ok(count > 0)
    }

    /// The user's contracts with their bosses, oldest first
    pub async fn list_by_user<C>(db: &C, user_id: Uuid) -> AppResult<Vec<ContractWithBoss>>
    where
        C: ConnectionTrait,
    {
        let rows = ContractEntity::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .find_also_related(BossEntity)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(contract, boss)| {
                boss.map(|b| ContractWithBoss {
                    contract: contract.into(),
                    boss: b.into(),
                })
            })
            .collect())
    }

    /// Load a contract with its user, boss and tasks; tasks come back in start-time order
    pub async fn load_contract<C>(db: &C, id: i32) -> AppResult<ContractDetail>
    where
        C: ConnectionTrait,
    {
        let model = ContractEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Contract".to_string()))?;

        let user = model
            .find_related(UserEntity)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;
        let boss = model
            .find_related(BossEntity)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Boss".to_string()))?;
        let tasks = TaskRepository::list_by_contract(db, model.id).await?;

        Ok(ContractDetail::new(model.into(), user.into(), boss.into(), tasks))
    }
}

// Conversion from SeaORM model to our domain model
impl From<contract::Model> for Contract {
    fn from(m: contract::Model) -> Self {
        Self {
            id: m.id,
            rate: m.rate,
            boss_id: m.boss_id,
            user_id: m.user_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

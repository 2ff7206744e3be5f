use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entity::boss::{self, ActiveModel, Column, Entity as BossEntity};
use crate::entity::contract::{self, Entity as ContractEntity};
use crate::entity::user::Entity as UserEntity;
use crate::error::{AppError, AppResult};
use crate::models::{Boss, BossDetail};
use crate::repositories::Repository;

/// Boss repository for database operations
pub struct BossRepository;

#[async_trait]
impl Repository for BossRepository {
    type Model = Boss;
    type Id = i32;

    async fn find_by_id<C>(db: &C, id: i32) -> AppResult<Boss>
    where
        C: ConnectionTrait,
    {
        let model = BossEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Boss".to_string()))?;

        Ok(model.into())
    }

    async fn list<C>(db: &C, limit: u64, offset: u64) -> AppResult<Vec<Boss>>
    where
        C: ConnectionTrait,
    {
        let limit = limit.max(1);
        let models = BossEntity::find()
            .order_by_asc(Column::Id)
            .paginate(db, limit)
            .fetch_page(offset / limit)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn count<C>(db: &C) -> AppResult<u64>
    where
        C: ConnectionTrait,
    {
        let count = BossEntity::find().count(db).await?;
        Ok(count)
    }
}

impl BossRepository {
    /// Find boss by ID, `None` when it does not exist
    pub async fn find_optional<C>(db: &C, id: i32) -> AppResult<Option<Boss>>
    where
        C: ConnectionTrait,
    {
        let model = BossEntity::find_by_id(id).one(db).await?;
        Ok(model.map(|m| m.into()))
    }

    /// Create a new boss
    pub async fn create<C>(db: &C, name: &str) -> AppResult<Boss>
    where
        C: ConnectionTrait,
    {
        let now = time::OffsetDateTime::now_utc();
        let model = ActiveModel {
            name: Set(name.trim().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(db).await?;
        Ok(result.into())
    }

    /// Every boss, for select lists
    pub async fn all<C>(db: &C) -> AppResult<Vec<Boss>>
    where
        C: ConnectionTrait,
    {
        let models = BossEntity::find().order_by_asc(Column::Name).all(db).await?;
        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    /// Load a boss with its contracts and the contracted users
    pub async fn find_detail<C>(db: &C, id: i32) -> AppResult<BossDetail>
    where
        C: ConnectionTrait,
    {
        let boss = Self::find_by_id(db, id).await?;

        let rows = ContractEntity::find()
            .filter(contract::Column::BossId.eq(id))
            .order_by_asc(contract::Column::Id)
            .find_also_related(UserEntity)
            .all(db)
            .await?;

        let contracts = rows
            .into_iter()
            .filter_map(|(contract, user)| user.map(|u| (contract.into(), u.into())))
            .collect();

        Ok(BossDetail { boss, contracts })
    }
}

// Conversion from SeaORM model to our domain model
impl From<boss::Model> for Boss {
    fn from(m: boss::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use crate::entity::user::{self, ActiveModel, Column, Entity as UserEntity};
use crate::error::{AppError, AppResult};
use crate::models::{CreateUser, Role, User};

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Find user by ID, `None` when it does not exist
    pub async fn find_optional<C>(db: &C, id: Uuid) -> AppResult<Option<User>>
    where
        C: ConnectionTrait,
    {
        let model = UserEntity::find_by_id(id).one(db).await?;
        Ok(model.map(|m| m.into()))
    }

    /// Find user by (already case-folded) email
    pub async fn find_by_email<C>(db: &C, email: &str) -> AppResult<Option<User>>
    where
        C: ConnectionTrait,
    {
        let model = UserEntity::find()
            .filter(Column::Email.eq(email))
            .one(db)
            .await?;

        Ok(model.map(|m| m.into()))
    }

    /// Check if email is used by any user other than `except`
    pub async fn email_taken<C>(db: &C, email: &str, except: Option<Uuid>) -> AppResult<bool>
    where
        C: ConnectionTrait,
    {
        let mut query = UserEntity::find().filter(Column::Email.eq(email));
        if let Some(id) = except {
            query = query.filter(Column::Id.ne(id));
        }

        let count = query.count(db).await?;
        Ok(count > 0)
    }

    /// Every user, ordered by email
    pub async fn all<C>(db: &C) -> AppResult<Vec<User>>
    where
        C: ConnectionTrait,
    {
        let models = UserEntity::find()
            .order_by_asc(Column::Email)
            .all(db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    /// Create a new user with the member role. A taken email yields [`AppError::Conflict`].
    pub async fn create<C>(db: &C, input: &CreateUser, password_hash: &str) -> AppResult<User>
    where
        C: ConnectionTrait,
    {
        let now = time::OffsetDateTime::now_utc();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(input.normalized_email()),
            first_name: Set(input.first_name.trim().to_string()),
            last_name: Set(input.last_name.trim().to_string()),
            password_hash: Set(password_hash.to_string()),
            roles: Set(Role::Member.as_db_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model.insert(db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Conflict("Email is already taken".to_string())
            }
            _ => AppError::from(e),
        })?;

        Ok(result.into())
    }

    /// Replace the stored password hash
    pub async fn update_password<C>(db: &C, id: Uuid, password_hash: &str) -> AppResult<User>
    where
        C: ConnectionTrait,
    {
        let mut active = Self::find_model(db, id).await?;
        active.password_hash = Set(password_hash.to_string());
        active.updated_at = Set(time::OffsetDateTime::now_utc());

        let result = active.update(db).await?;
        Ok(result.into())
    }

    /// Change the user's role
    pub async fn set_role<C>(db: &C, id: Uuid, role: Role) -> AppResult<User>
    where
        C: ConnectionTrait,
    {
        let mut active = Self::find_model(db, id).await?;
        active.roles = Set(role.as_db_str().to_string());
        active.updated_at = Set(time::OffsetDateTime::now_utc());

        let result = active.update(db).await?;
        Ok(result.into())
    }

    async fn find_model<C>(db: &C, id: Uuid) -> AppResult<ActiveModel>
    where
        C: ConnectionTrait,
    {
        let model = UserEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        Ok(model.into())
    }
}

// Conversion from SeaORM model to our domain model
impl From<user::Model> for User {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            first_name: m.first_name,
            last_name: m.last_name,
            password_hash: m.password_hash,
            role: Role::from_db_str(&m.roles),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

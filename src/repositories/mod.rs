pub mod boss;
pub mod contract;
pub mod task;
pub mod user;

pub use boss::BossRepository;
pub use contract::ContractRepository;
pub use task::TaskRepository;
pub use user::UserRepository;

use async_trait::async_trait;
use sea_orm::ConnectionTrait;

use crate::error::AppResult;

/// Base repository trait for common read operations.
///
/// Every method takes the connection or transaction to run on, so a handler decides the
/// transaction scope and passes the same handle to each call.
#[async_trait]
pub trait Repository {
    type Model: Send;
    type Id: Send + 'static;

    /// Find entity by ID
    async fn find_by_id<C>(db: &C, id: Self::Id) -> AppResult<Self::Model>
    where
        C: ConnectionTrait;

    /// List entities with pagination
    async fn list<C>(db: &C, limit: u64, offset: u64) -> AppResult<Vec<Self::Model>>
    where
        C: ConnectionTrait;

    /// Count total entities
    async fn count<C>(db: &C) -> AppResult<u64>
    where
        C: ConnectionTrait;
}

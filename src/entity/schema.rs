use sea_orm::{ConnectionTrait, DbErr, Schema};

use super::{boss, contract, task, user};

/// Create the application tables if they do not exist yet.
///
/// Tables are derived from the entity definitions and created parents first so that the
/// foreign keys (contract -> user/boss, task -> contract) resolve.
pub async fn create_tables<C>(db: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut statements = [
        schema.create_table_from_entity(user::Entity),
        schema.create_table_from_entity(boss::Entity),
        schema.create_table_from_entity(contract::Entity),
        schema.create_table_from_entity(task::Entity),
    ];

    for statement in statements.iter_mut() {
        statement.if_not_exists();
        db.execute(backend.build(&*statement)).await?;
    }

    Ok(())
}

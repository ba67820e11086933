use sea_orm::sea_query::{ColumnDef, Table, TableCreateStatement};
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection};

use crate::entity::{geetest_challenges, users};
use geetest_relay_domain::storage::{StorageError, StorageResult};

pub async fn run_migrations(db: &DatabaseConnection) -> StorageResult<()> {
    let backend = db.get_database_backend();

    let users_table = Table::create()
        .if_not_exists()
        .table(users::Entity)
        .col(
            ColumnDef::new(users::Column::DiscordId)
                .big_integer()
                .not_null()
                .primary_key(),
        )
        .to_owned();
    create_table(db, backend, users_table).await?;

    let challenges_table = Table::create()
        .if_not_exists()
        .table(geetest_challenges::Entity)
        .col(
            ColumnDef::new(geetest_challenges::Column::DiscordId)
                .big_integer()
                .not_null()
                .primary_key(),
        )
        .col(
            ColumnDef::new(geetest_challenges::Column::Genshin)
                .json()
                .null(),
        )
        .col(
            ColumnDef::new(geetest_challenges::Column::Honkai3rd)
                .json()
                .null(),
        )
        .col(
            ColumnDef::new(geetest_challenges::Column::Starrail)
                .json()
                .null(),
        )
        .to_owned();
    create_table(db, backend, challenges_table).await?;

    Ok(())
}

async fn create_table(
    db: &DatabaseConnection,
    backend: DatabaseBackend,
    mut statement: TableCreateStatement,
) -> StorageResult<()> {
    statement.if_not_exists();
    db.execute(backend.build(&statement))
        .await
        .map_err(StorageError::from_source)?;
    Ok(())
}

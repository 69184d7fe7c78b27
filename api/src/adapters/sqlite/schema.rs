//! Connection setup and schema bootstrap
//!
//! Tables are created from the SeaORM entities when absent, so a fresh
//! database file is usable without a migration step.

use sea_orm::sea_query::Index;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};

use crate::entity::{hyperparameters, metrics, model_versions, training_jobs};

/// Connect to the database and make sure all tables exist
pub async fn connect(url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(url.to_owned());
    options.sqlx_logging(false);
    if url.contains(":memory:") {
        // Every pooled connection would otherwise get its own empty database
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options).await?;
    create_schema(&db).await?;
    Ok(db)
}

/// Create all tables and indexes if they don't exist
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, model_versions::Entity).await?;
    create_table(db, training_jobs::Entity).await?;
    create_table(db, metrics::Entity).await?;
    create_table(db, hyperparameters::Entity).await?;

    let backend = db.get_database_backend();
    let unique_version = Index::create()
        .name("idx-model_versions-model_name-version")
        .table(model_versions::Entity)
        .col(model_versions::Column::ModelName)
        .col(model_versions::Column::Version)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(backend.build(&unique_version)).await?;

    tracing::debug!("Database schema ready");
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait + Copy,
{
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(backend.build(&table)).await?;

    for mut index in schema.create_index_from_entity(entity) {
        index.if_not_exists();
        db.execute(backend.build(&index)).await?;
    }

    Ok(())
}

pub mod entities;
pub mod models;
pub mod store;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};
use tracing::{debug, info};

use crate::db::entities::prelude::{Slot, TagLink, User};
use crate::server::config::ServerConfig;

pub async fn connect(config: &ServerConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.db_dsn.to_owned());
    opt.max_connections(config.db_max_connections)
        .sqlx_logging(false);
    Database::connect(opt).await
}

/// Creates the `users`, `tag_links` and `slots` tables when they are missing.
/// Parents are created before children so the foreign keys resolve.
pub async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table_for(db, User).await?;
    create_table_for(db, TagLink).await?;
    create_table_for(db, Slot).await?;
    info!("Tables are migrated");
    Ok(())
}

async fn create_table_for<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    debug!(table = entity.table_name(), "Ensuring table exists");
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}

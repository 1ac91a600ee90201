#![cfg(test)]
use std::sync::Arc;

use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::connect;

use crate::product::ProductService;
use crate::repo::InMemoryGateway;
use crate::user::UserService;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

/// Postgres connection for gateway tests; `None` when no database is configured.
pub async fn get_db() -> Result<Option<DatabaseConnection>, anyhow::Error> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        return Ok(None);
    }
    let migrated = *MIGRATED
        .get_or_init(|| async {
            match connect().await {
                Ok(db) => migration::Migrator::up(&db, None).await.is_ok(),
                Err(_) => false,
            }
        })
        .await;
    if !migrated {
        return Ok(None);
    }
    Ok(Some(connect().await?))
}

/// Both services wired to one fresh in-process gateway.
pub fn memory_services() -> (UserService<InMemoryGateway>, ProductService<InMemoryGateway, InMemoryGateway>) {
    let gateway = Arc::new(InMemoryGateway::new());
    (UserService::new(gateway.clone()), ProductService::new(gateway.clone(), gateway))
}

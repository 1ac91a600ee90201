use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::db::connect;
use crate::{product, user};

async fn setup() -> Result<Option<DatabaseConnection>> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        return Ok(None);
    }
    let db = connect().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(Some(db))
}

/// Ids high enough to stay clear of store-assigned ones.
fn fresh_id() -> i64 {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as i64)
        .unwrap_or(0);
    1_000_000_000 + nanos
}

#[tokio::test]
async fn test_user_save_update_delete() -> Result<()> {
    let Some(db) = setup().await? else { return Ok(()) };

    let id = fresh_id();
    let created = user::save(&db, Some(id), "Ana", "ana@x.com").await?;
    assert_eq!(created.id, id);

    let updated = user::save(&db, Some(id), "Ana Maria", "am@x.com").await?;
    assert_eq!(updated.id, id);
    assert_eq!(updated.name, "Ana Maria");

    let found = user::find(&db, id).await?.expect("user stored");
    assert_eq!(found, updated);

    assert!(user::delete(&db, id).await?);
    assert!(!user::delete(&db, id).await?);
    assert!(user::find(&db, id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_store_assigned_id_after_explicit_id() -> Result<()> {
    let Some(db) = setup().await? else { return Ok(()) };

    let first = user::save(&db, None, "First", "first@x.com").await?;
    let second = user::save(&db, Some(first.id + 1), "Second", "second@x.com").await?;
    // sequence must have moved past the client-chosen id
    let third = user::save(&db, None, "Third", "third@x.com").await?;
    assert!(third.id > second.id);

    for id in [first.id, second.id, third.id] {
        user::delete(&db, id).await?;
    }
    Ok(())
}

#[tokio::test]
async fn test_products_by_usuario_and_detach_on_user_delete() -> Result<()> {
    let Some(db) = setup().await? else { return Ok(()) };

    let owner = user::save(&db, None, "Owner", "owner@x.com").await?;
    let a = product::save(&db, None, "Pen", 1.5, Some(owner.id)).await?;
    let b = product::save(&db, None, "Ink", 3.0, Some(owner.id)).await?;
    let loose = product::save(&db, None, "Pad", 2.0, None).await?;

    let owned = product::find_by_usuario(&db, owner.id).await?;
    let ids: Vec<i64> = owned.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![a.id, b.id]);

    user::delete(&db, owner.id).await?;
    let after = product::Entity::find_by_id(a.id).one(&db).await?.expect("product kept");
    assert_eq!(after.usuario_id, None);

    for id in [a.id, b.id, loose.id] {
        product::delete(&db, id).await?;
    }
    Ok(())
}

#[tokio::test]
async fn test_save_rejects_invalid_values() -> Result<()> {
    let Some(db) = setup().await? else { return Ok(()) };
    assert!(product::save(&db, None, "", 1.0, None).await.is_err());
    assert!(product::save(&db, None, "Pen", -1.0, None).await.is_err());
    assert!(user::save(&db, None, "Ana", "nope").await.is_err());
    Ok(())
}

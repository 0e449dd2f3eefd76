//! Database round trips for the `api_key` entity. Skipped unless a Postgres
//! instance is reachable through `DATABASE_URL`.

use crate::{api_key, db};
use migration::MigratorTrait;
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

async fn test_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        return None;
    }
    let db = match db::connect_from_env().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }
    Some(db)
}

#[tokio::test]
async fn api_key_create_find_delete() -> anyhow::Result<()> {
    let Some(db) = test_db().await else { return Ok(()) };

    let key = format!("model_key_{}", Uuid::new_v4().simple());
    assert!(api_key::insert_if_absent(&db, &key).await?);
    let created = api_key::find_by_key(&db, &key).await?.expect("row just inserted");
    assert_eq!(created.key, key);
    assert!(api_key::list_keys(&db).await?.contains(&key));

    assert_eq!(api_key::delete_by_key(&db, &key).await?, 1);
    assert_eq!(api_key::delete_by_key(&db, &key).await?, 0);
    assert!(api_key::Entity::find_by_id(created.id).one(&db).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn api_key_insert_if_absent_skips_duplicates() -> anyhow::Result<()> {
    let Some(db) = test_db().await else { return Ok(()) };

    let key = format!("upsert_key_{}", Uuid::new_v4().simple());
    assert!(api_key::insert_if_absent(&db, &key).await?);
    assert!(!api_key::insert_if_absent(&db, &key).await?);
    assert_eq!(api_key::delete_by_key(&db, &key).await?, 1);
    Ok(())
}

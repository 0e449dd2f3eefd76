//! Runtime wiring: turn configuration into a ready, seeded key store.

use std::sync::Arc;

use anyhow::Context;
use configs::{AppConfig, StorageBackend};
use migration::MigratorTrait;
use tracing::info;

use crate::keys::KeyService;
use crate::keystore::{JsonFileKeyStore, KeyStore, MemoryKeyStore, SeaOrmKeyStore};

/// Open the configured backend. Database backends are migrated first.
pub async fn build_key_store(cfg: &AppConfig) -> anyhow::Result<Arc<dyn KeyStore>> {
    let store: Arc<dyn KeyStore> = match cfg.storage.backend {
        StorageBackend::Memory => Arc::new(MemoryKeyStore::new()),
        StorageBackend::File => {
            let store = JsonFileKeyStore::open(&cfg.storage.path)
                .await
                .with_context(|| format!("cannot open key file {}", cfg.storage.path))?;
            Arc::new(store)
        }
        StorageBackend::Database => {
            let db = models::db::connect_with_config(&cfg.database)
                .await
                .context("cannot connect to database")?;
            migration::Migrator::up(&db, None).await.context("database migration failed")?;
            Arc::new(SeaOrmKeyStore::new(db))
        }
    };
    info!(backend = store.backend(), "key store opened");
    Ok(store)
}

/// Open the configured backend and seed it if empty.
pub async fn build_key_service(cfg: &AppConfig) -> anyhow::Result<KeyService> {
    let keys = KeyService::new(build_key_store(cfg).await?);
    keys.ensure_seeded().await.context("cannot seed key store")?;
    Ok(keys)
}

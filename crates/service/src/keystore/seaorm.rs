use async_trait::async_trait;
use models::api_key;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

use super::{validate_new_key, KeyStore};
use crate::errors::ServiceError;

/// Key set stored in the `api_key` table.
pub struct SeaOrmKeyStore {
    pub db: DatabaseConnection,
}

impl SeaOrmKeyStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KeyStore for SeaOrmKeyStore {
    fn backend(&self) -> &'static str {
        "database"
    }

    async fn contains(&self, key: &str) -> Result<bool, ServiceError> {
        let key = key.trim();
        if key.is_empty() {
            return Ok(false);
        }
        Ok(api_key::find_by_key(&self.db, key).await?.is_some())
    }

    async fn add(&self, key: &str) -> Result<bool, ServiceError> {
        let key = validate_new_key(key)?;
        Ok(api_key::insert_if_absent(&self.db, key).await?)
    }

    async fn remove(&self, key: &str) -> Result<bool, ServiceError> {
        let key = key.trim();
        if key.is_empty() {
            return Ok(false);
        }
        Ok(api_key::delete_by_key(&self.db, key).await? > 0)
    }

    async fn list(&self) -> Result<Vec<String>, ServiceError> {
        Ok(api_key::list_keys(&self.db).await?)
    }

    async fn ensure_seeded(&self) -> Result<bool, ServiceError> {
        if api_key::Entity::find().count(&self.db).await? > 0 {
            return Ok(false);
        }
        for key in super::DEFAULT_KEYS {
            self.add(key).await?;
        }
        Ok(true)
    }
}

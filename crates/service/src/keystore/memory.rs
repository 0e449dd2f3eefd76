use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{validate_new_key, KeyStore};
use crate::errors::ServiceError;

/// In-process key set. Nothing survives a restart; used for tests and
/// throwaway deployments.
#[derive(Default)]
pub struct MemoryKeyStore {
    keys: RwLock<HashSet<String>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = keys
            .into_iter()
            .map(|k| k.as_ref().trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keys: RwLock::new(keys) }
    }
}

#[async_trait]
impl KeyStore for MemoryKeyStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn contains(&self, key: &str) -> Result<bool, ServiceError> {
        Ok(self.keys.read().await.contains(key.trim()))
    }

    async fn add(&self, key: &str) -> Result<bool, ServiceError> {
        let key = validate_new_key(key)?;
        Ok(self.keys.write().await.insert(key.to_string()))
    }

    async fn remove(&self, key: &str) -> Result<bool, ServiceError> {
        Ok(self.keys.write().await.remove(key.trim()))
    }

    async fn list(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.keys.read().await.iter().cloned().collect())
    }
}

use std::{collections::HashSet, path::PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::{fs, sync::RwLock};
use tracing::{debug, info};

use super::{validate_new_key, KeyStore, DEFAULT_KEYS};
use crate::errors::ServiceError;
use crate::storage::json_file::{read_json, write_json_atomic};

/// On-disk layout: `{"valid_keys": ["...", ...]}`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct KeyDocument {
    #[serde(default)]
    valid_keys: Vec<String>,
}

/// File-backed key set persisted as a JSON document.
///
/// The whole set is cached in memory. Mutations hold the write lock while the
/// document is rewritten (temp file + rename), so writers are serialized and
/// the cache only changes once the new document is on disk.
pub struct JsonFileKeyStore {
    keys: RwLock<HashSet<String>>,
    file_path: PathBuf,
}

impl JsonFileKeyStore {
    /// Load the store from `path`. A missing file starts empty and is created
    /// on the first write; a malformed file is an error.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ServiceError::Storage(format!("create {}: {e}", parent.display())))?;
        }

        let keys: HashSet<String> = match read_json::<KeyDocument>(&file_path).await? {
            Some(doc) => doc
                .valid_keys
                .into_iter()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
            None => HashSet::new(),
        };
        debug!(path = %file_path.display(), count = keys.len(), "key file loaded");

        Ok(Self { keys: RwLock::new(keys), file_path })
    }

    async fn persist(&self, keys: &HashSet<String>) -> Result<(), ServiceError> {
        let mut valid_keys: Vec<String> = keys.iter().cloned().collect();
        valid_keys.sort();
        write_json_atomic(&self.file_path, &KeyDocument { valid_keys }).await
    }
}

#[async_trait]
impl KeyStore for JsonFileKeyStore {
    fn backend(&self) -> &'static str {
        "file"
    }

    async fn contains(&self, key: &str) -> Result<bool, ServiceError> {
        Ok(self.keys.read().await.contains(key.trim()))
    }

    async fn add(&self, key: &str) -> Result<bool, ServiceError> {
        let key = validate_new_key(key)?;
        let mut keys = self.keys.write().await;
        if !keys.insert(key.to_string()) {
            return Ok(false);
        }
        if let Err(e) = self.persist(&keys).await {
            keys.remove(key);
            return Err(e);
        }
        Ok(true)
    }

    async fn remove(&self, key: &str) -> Result<bool, ServiceError> {
        let key = key.trim();
        let mut keys = self.keys.write().await;
        if !keys.remove(key) {
            return Ok(false);
        }
        if let Err(e) = self.persist(&keys).await {
            keys.insert(key.to_string());
            return Err(e);
        }
        Ok(true)
    }

    async fn list(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.keys.read().await.iter().cloned().collect())
    }

    /// Seeds in a single write instead of one rewrite per default key.
    async fn ensure_seeded(&self) -> Result<bool, ServiceError> {
        let mut keys = self.keys.write().await;
        if !keys.is_empty() {
            return Ok(false);
        }
        let seeded: HashSet<String> = DEFAULT_KEYS.iter().map(|k| k.to_string()).collect();
        self.persist(&seeded).await?;
        *keys = seeded;
        info!(path = %self.file_path.display(), "key file seeded with default keys");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn tmp_path() -> PathBuf {
        std::env::temp_dir().join(format!("svc_keys_{}", Uuid::new_v4())).join("keys.json")
    }

    #[tokio::test]
    async fn file_store_crud_persists() -> Result<(), anyhow::Error> {
        let path = tmp_path();
        let store = JsonFileKeyStore::open(&path).await?;

        // initially empty, nothing written yet
        assert!(store.list().await?.is_empty());
        assert!(fs::metadata(&path).await.is_err());

        assert!(store.add("alpha").await?);
        assert!(store.add(" beta ").await?);
        assert!(!store.add("alpha").await?);
        assert!(store.contains("beta").await?);

        assert!(store.remove("alpha").await?);
        assert!(!store.remove("alpha").await?);

        // reload from disk
        let reloaded = JsonFileKeyStore::open(&path).await?;
        assert_eq!(reloaded.list().await?, vec!["beta".to_string()]);

        let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path).await?)?;
        assert_eq!(raw, serde_json::json!({"valid_keys": ["beta"]}));

        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn seeds_missing_file_once() -> Result<(), anyhow::Error> {
        let path = tmp_path();
        let store = JsonFileKeyStore::open(&path).await?;
        assert!(store.ensure_seeded().await?);
        assert!(!store.ensure_seeded().await?);

        let reloaded = JsonFileKeyStore::open(&path).await?;
        let mut keys = reloaded.list().await?;
        keys.sort();
        assert_eq!(keys, vec!["DUONG123", "TESTKEY", "VIP2025"]);

        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn existing_document_is_loaded_not_reseeded() -> Result<(), anyhow::Error> {
        let path = tmp_path();
        fs::create_dir_all(path.parent().unwrap()).await?;
        fs::write(&path, br#"{"valid_keys": ["LEGACY1", "  ", "LEGACY2"]}"#).await?;

        let store = JsonFileKeyStore::open(&path).await?;
        assert!(!store.ensure_seeded().await?);
        assert!(store.contains("LEGACY1").await?);
        assert!(!store.contains("VIP2025").await?);
        assert_eq!(store.list().await?.len(), 2);

        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn malformed_document_fails_to_open() -> Result<(), anyhow::Error> {
        let path = tmp_path();
        fs::create_dir_all(path.parent().unwrap()).await?;
        fs::write(&path, b"valid_keys = nope").await?;

        assert!(matches!(JsonFileKeyStore::open(&path).await, Err(ServiceError::Storage(_))));
        // the broken file is left untouched for the operator
        assert_eq!(fs::read(&path).await?, b"valid_keys = nope");

        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_writers_never_lose_keys() -> Result<(), anyhow::Error> {
        let path = tmp_path();
        let store = std::sync::Arc::new(JsonFileKeyStore::open(&path).await?);
        let mut handles = Vec::new();
        for i in 0..16 {
            let s = store.clone();
            handles.push(tokio::spawn(async move { s.add(&format!("KEY{i}")).await }));
        }
        for h in handles {
            h.await??;
        }

        let reloaded = JsonFileKeyStore::open(&path).await?;
        assert_eq!(reloaded.list().await?.len(), 16);

        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }
}

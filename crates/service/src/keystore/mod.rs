//! The authoritative set of valid keys and its storage backends.

pub mod memory;
pub mod file;
pub mod seaorm;

use async_trait::async_trait;

use crate::errors::ServiceError;

pub use file::JsonFileKeyStore;
pub use memory::MemoryKeyStore;
pub use seaorm::SeaOrmKeyStore;

/// Seeded into an empty store on first start.
pub const DEFAULT_KEYS: [&str; 3] = ["DUONG123", "VIP2025", "TESTKEY"];

/// Storage abstraction for the key set.
/// Implementations can be in-memory, file-backed or database-backed; the
/// contract is identical. Keys are trimmed before every operation.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    async fn contains(&self, key: &str) -> Result<bool, ServiceError>;

    /// Insert if absent; `Ok(true)` when newly added. Blank keys are rejected.
    async fn add(&self, key: &str) -> Result<bool, ServiceError>;

    /// Delete if present; `Ok(true)` when something was removed.
    async fn remove(&self, key: &str) -> Result<bool, ServiceError>;

    /// All keys, unordered.
    async fn list(&self) -> Result<Vec<String>, ServiceError>;

    /// Populate `DEFAULT_KEYS` when the store is empty; `Ok(true)` if it seeded.
    async fn ensure_seeded(&self) -> Result<bool, ServiceError> {
        if !self.list().await?.is_empty() {
            return Ok(false);
        }
        for key in DEFAULT_KEYS {
            self.add(key).await?;
        }
        Ok(true)
    }
}

/// Trim a key and check it is acceptable for insertion.
pub fn validate_new_key(raw: &str) -> Result<&str, ServiceError> {
    let key = raw.trim();
    models::api_key::validate_key(key)?;
    Ok(key)
}

/// Render a key for logs without exposing it.
pub fn mask_key(key: &str) -> String {
    let visible = key.chars().count().min(6) / 2;
    let prefix: String = key.chars().take(visible).collect();
    format!("{prefix}***")
}

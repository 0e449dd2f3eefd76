use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::errors::ServiceError;
use crate::keystore::{mask_key, KeyStore};

/// Outcome of checking a candidate key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Valid,
    /// No key, or only whitespace, was supplied.
    Missing,
    /// Unknown key, or the store could not be reached.
    Invalid,
}

/// Key management on top of an injected `KeyStore`.
#[derive(Clone)]
pub struct KeyService {
    store: Arc<dyn KeyStore>,
}

impl KeyService {
    pub fn new(store: Arc<dyn KeyStore>) -> Self {
        Self { store }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Check a candidate key. Fails closed: a store error is logged and
    /// reported as `Invalid`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::keys::{KeyService, Verification};
    /// use service::keystore::MemoryKeyStore;
    ///
    /// let keys = KeyService::new(Arc::new(MemoryKeyStore::with_keys(["VIP2025"])));
    /// assert_eq!(tokio_test::block_on(keys.verify(Some("VIP2025"))), Verification::Valid);
    /// assert_eq!(tokio_test::block_on(keys.verify(Some("NOPE"))), Verification::Invalid);
    /// assert_eq!(tokio_test::block_on(keys.verify(None)), Verification::Missing);
    /// ```
    pub async fn verify(&self, candidate: Option<&str>) -> Verification {
        let key = match candidate.map(str::trim) {
            Some(k) if !k.is_empty() => k,
            _ => return Verification::Missing,
        };
        match self.store.contains(key).await {
            Ok(true) => Verification::Valid,
            Ok(false) => Verification::Invalid,
            Err(e) => {
                error!(backend = self.store.backend(), error = %e, "key lookup failed; treating key as invalid");
                Verification::Invalid
            }
        }
    }

    #[instrument(skip_all, fields(backend = self.store.backend(), key = %mask_key(key.trim())))]
    pub async fn add(&self, key: &str) -> Result<bool, ServiceError> {
        let added = self.store.add(key).await?;
        info!(added, "key_add");
        Ok(added)
    }

    #[instrument(skip_all, fields(backend = self.store.backend(), key = %mask_key(key.trim())))]
    pub async fn remove(&self, key: &str) -> Result<bool, ServiceError> {
        let removed = self.store.remove(key).await?;
        info!(removed, "key_remove");
        Ok(removed)
    }

    /// All keys in lexicographic order, for display.
    pub async fn list_sorted(&self) -> Result<Vec<String>, ServiceError> {
        let mut keys = self.store.list().await?;
        keys.sort();
        Ok(keys)
    }

    pub async fn ensure_seeded(&self) -> Result<bool, ServiceError> {
        let seeded = self.store.ensure_seeded().await?;
        if seeded {
            info!(backend = self.store.backend(), "empty key store seeded with default keys");
        }
        Ok(seeded)
    }
}

//! Service layer for key issuance and verification.
//! - `keystore`: the key-set contract and its file, memory and database backends.
//! - `keys`: verification and admin operations on top of an injected store.
//! - `auth`: admin credentials and session tokens.

pub mod errors;
pub mod auth;
pub mod keys;
pub mod keystore;
pub mod runtime;
pub mod storage;

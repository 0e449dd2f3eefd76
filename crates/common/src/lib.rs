//! Shared plumbing for the keygate crates: logging setup and the JSON wire
//! types used by the public endpoints.

pub mod types;

pub mod utils {
    pub mod logging;
}

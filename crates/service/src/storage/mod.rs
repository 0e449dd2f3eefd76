//! Storage helpers for the service layer
//!
//! Small JSON documents persisted on local disk.

pub mod json_file;

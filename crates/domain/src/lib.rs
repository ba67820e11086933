//! Domain-level building blocks shared by the HTTP API and storage crates:
//! the supported game enumeration, challenge records, parameter validation,
//! configuration loading and telemetry bootstrap.

pub mod config;
pub mod model;
pub mod services;
pub mod storage;

pub use storage::{ChallengeStore, StorageError, StorageResult, UserStore};

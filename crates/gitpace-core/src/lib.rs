//! Core types, configuration, and error handling for gitpace.
//!
//! This crate provides the shared foundation used by the other gitpace crates:
//! - [`GitpaceError`]: unified error type using `thiserror`
//! - [`GitpaceConfig`]: configuration loaded from `.gitpace.toml`
//! - History records: [`CommitRecord`], [`ChangeStats`], [`FileDelta`],
//!   [`FileRecord`], [`Session`]

mod config;
mod error;
mod types;

pub use config::{
    EstimationConfig, FileHourModel, GitpaceConfig, HistoryConfig, ScenarioRates, SessionConfig,
};
pub use error::GitpaceError;
pub use types::{
    extension_of, language_tag, ChangeStats, CommitRecord, FileCategory, FileDelta, FileRecord,
    OutputFormat, Session,
};

/// A convenience `Result` type for gitpace operations.
pub type Result<T> = std::result::Result<T, GitpaceError>;

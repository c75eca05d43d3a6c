use std::path::PathBuf;

/// Errors that can occur across the gitpace workspace.
///
/// The analysis engine itself never fails on history content; these variants
/// cover the surfaces around it (configuration, opening a repository,
/// writing the exported document). The binary converts to `miette`
/// diagnostics at the boundary.
///
/// # Examples
///
/// ```
/// use gitpace_core::GitpaceError;
///
/// let err = GitpaceError::Config("overhead_multiplier must be finite".into());
/// assert!(err.to_string().contains("overhead_multiplier"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum GitpaceError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Repository could not be opened or read.
    #[error("git error: {0}")]
    Git(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

//! Error types for rule storage, classification, configuration and organization.
//!
//! Each subsystem has its own enum so callers can match on the condition
//! they care about. Nothing in the library retries; failures are reported
//! upward with enough context (record path, rule position, file name) to
//! present a message and carry on with the next file.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while creating a rule.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// The pattern was empty after trimming.
    #[error("rule pattern must not be empty")]
    EmptyPattern,

    /// The destination folder was empty after trimming.
    #[error("rule folder must not be empty")]
    EmptyFolder,
}

/// Errors raised by the persisted rule record.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record exists but does not parse as a rule sequence.
    #[error("malformed rule record {}: {source}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A 1-based position outside `[1, len]` was given for removal.
    #[error("rule #{index} does not exist (there are {len} rules)")]
    OutOfRange { index: i64, len: usize },

    /// The record could not be written.
    #[error("could not write rule record {}: {source}", .path.display())]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The record exists but could not be read.
    #[error("could not read rule record {}: {source}", .path.display())]
    StorageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rule sequence could not be serialized.
    #[error("could not serialize rules: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Errors raised while resolving the category of a file name.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// A `regex` rule carries a pattern that does not compile.
    #[error(
        "rule #{rule_position} has an invalid regex '{pattern}' (while classifying '{file_name}'): {source}"
    )]
    Pattern {
        file_name: String,
        /// 1-based position of the offending rule.
        rule_position: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist.
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The configuration file is not valid TOML for this schema.
    #[error("invalid configuration {}: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The configuration file could not be read.
    #[error("could not read configuration {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An exclude glob pattern failed to compile.
    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidGlobPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// No target directory was configured and the platform has no download dir.
    #[error("no target directory configured and no download directory could be determined")]
    NoTargetDir,
}

/// Errors raised while sorting a directory.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The directory to sort could not be listed.
    #[error("could not read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An entry of the directory being sorted could not be read.
    #[error("could not read an entry of {}: {source}", .path.display())]
    ReadEntry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A category subdirectory could not be created.
    #[error("failed to create directory {}: {source}", .path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file could not be moved into its category subdirectory.
    #[error("failed to move {} to {}: {source}", .from.display(), .to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file name could not be classified.
    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

/// Result type for rule store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

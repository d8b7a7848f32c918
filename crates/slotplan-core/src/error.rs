//! Core error types for slotplan-core.
//!
//! This module defines the error hierarchy using thiserror. Configuration
//! and contract problems are fatal before any scheduling begins; the
//! scheduler itself never fails mid-run.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for slotplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Contract parsing/validation errors
    #[error("Contract error: {0}")]
    Contract(#[from] ContractError),

    /// Scheduling configuration errors
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Integration-related errors
    #[error("Integration error for '{service}': {message}")]
    Integration { service: String, message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Missing required configuration key
    #[error("Missing required configuration key: {0}")]
    MissingKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Contract parsing and validation errors.
#[derive(Error, Debug)]
pub enum ContractError {
    /// Contract file not found
    #[error("Contract file not found: {0}")]
    NotFound(PathBuf),

    /// Note does not begin with a frontmatter fence
    #[error("Contract must start with YAML frontmatter")]
    MissingFrontmatter,

    /// Frontmatter fences are unbalanced
    #[error("Invalid YAML frontmatter format")]
    MalformedFrontmatter,

    /// Frontmatter is not valid YAML
    #[error("Invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// A required top-level field is absent
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The tickets list is absent, empty, or not a list
    #[error("tickets must be a non-empty list")]
    NoTickets,

    /// A ticket entry has no name
    #[error("Each ticket must have a name")]
    UnnamedTicket,
}

/// Scheduling configuration errors.
///
/// Raised before any placement happens; a planner that constructs
/// successfully cannot fail mid-run.
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// Work-hour string is not HH:MM
    #[error("Invalid work hours '{value}': expected HH:MM")]
    InvalidWorkHours { value: String },

    /// Slot duration must be positive
    #[error("Slot duration must be positive, got {minutes}")]
    InvalidSlotDuration { minutes: u32 },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

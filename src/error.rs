// src/error.rs

//! Error types for recipe validation, cooking and matrix submission

use thiserror::Error;

/// Errors produced by the recipe driver and the build-matrix orchestrator
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or missing settings, options or environment values
    #[error("Invalid configuration: {0}")]
    ConfigurationError(String),

    /// A build-time tool requirement is not available
    #[error("Missing tool requirement: {0}")]
    ToolRequirementError(String),

    /// The underlying project's configure or build step failed
    #[error("{phase} step failed: {reason}")]
    BuildFailure { phase: String, reason: String },

    /// The install or artifact-copy step failed
    #[error("Packaging failed: {0}")]
    PackagingFailure(String),

    /// The remote build service rejected or failed a job
    #[error("Remote job failed: {0}")]
    RemoteJobFailure(String),

    /// Malformed recipe, reference or setting
    #[error("Parse error: {0}")]
    ParseError(String),

    /// I/O failure with context
    #[error("I/O error: {0}")]
    IoError(String),

    /// I/O failure without context
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to set up a client or tool
    #[error("Initialization error: {0}")]
    InitError(String),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error was raised before any build or network action
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::ConfigurationError(_))
    }
}

//! Error types and handling
//!
//! This module contains the error types used across the simulation engine.
//! Most runtime irregularities (unknown archetypes, malformed distributions,
//! out-of-state commands, clock skew) are handled softly with logging; the
//! hard errors below are reserved for genuinely unusable input and I/O.

use crate::types::ConfigValidationError;
use thiserror::Error;

/// Errors that can occur during simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    Configuration(#[from] ConfigValidationError),

    /// A command could not be applied in the current state
    #[error("Command rejected: {0}")]
    CommandRejected(String),

    /// Time management error
    #[error("Time management error: {0}")]
    Time(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<anyhow::Error> for SimulationError {
    fn from(error: anyhow::Error) -> Self {
        SimulationError::CommandRejected(error.to_string())
    }
}

impl SimulationError {
    /// Create a command-rejection error
    pub fn command_rejected(msg: impl Into<String>) -> Self {
        Self::CommandRejected(msg.into())
    }

    /// Create a time management error
    pub fn time_error(msg: impl Into<String>) -> Self {
        Self::Time(msg.into())
    }

    /// Whether the simulation can keep running after this error
    pub fn is_recoverable(&self) -> bool {
        match self {
            SimulationError::Configuration(_) => false,
            SimulationError::CommandRejected(_) => true,
            SimulationError::Time(_) => true,
            SimulationError::Io(_) => true,
            SimulationError::Serialization(_) => true,
        }
    }
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;

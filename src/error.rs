//! Error types for Cohort
//!
//! Assignment and tracking are designed to degrade rather than fail: the
//! variants here surface configuration and I/O problems to the embedding
//! application, never to the visitor-facing flow.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Cohort error types
#[derive(Error, Debug)]
pub enum Error {
    /// Experiment has no segments to assign from
    #[error("experiment {experiment_id} has no segments\nRegister at least one segment before resolving assignments")]
    EmptySegments {
        /// ID of the misconfigured experiment
        experiment_id: u64,
    },

    /// Experiment ID not present in the registry
    #[error("experiment {experiment_id} is not registered\nAdd it to the builder before calling resolve")]
    UnknownExperiment {
        /// The unregistered experiment ID
        experiment_id: u64,
    },

    /// Assignment store read/write failed
    #[error("assignment store error: {0}")]
    Storage(String),

    /// Snapshot or payload (de)serialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Webhook transport could not be constructed
    #[error("telemetry transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

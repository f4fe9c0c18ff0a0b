//! Error types for the sim crate.

use tessera_ir::IrError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors produced while executing a circuit or reading its result.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// The circuit references bits it does not own, or carries a malformed
    /// instruction (bad `Initialize` vector, custom gate without a matrix).
    #[error("Invalid circuit: {reason}")]
    InvalidCircuit {
        /// What is wrong with the circuit.
        reason: String,
        /// The IR check that failed, if the problem was found there.
        #[source]
        source: Option<IrError>,
    },

    /// Several snapshot labels exist and none was requested.
    #[error("Snapshot label is ambiguous; available labels: {labels:?}")]
    AmbiguousSnapshot {
        /// All labels recorded by the execution.
        labels: Vec<String>,
    },

    /// No snapshot was recorded under the requested label.
    #[error("No snapshot recorded under label '{0}'")]
    SnapshotNotFound(String),

    /// The execution recorded no snapshots at all.
    #[error("Execution recorded no snapshots")]
    NoSnapshots,

    /// shots must be ≥ 1.
    #[error("shots must be at least 1, got {0}")]
    InvalidShots(u32),

    /// The circuit is wider than the simulator allows.
    #[error("Circuit has {num_qubits} qubits but simulator only supports {max_qubits}")]
    TooManyQubits {
        /// Qubits in the circuit.
        num_qubits: usize,
        /// Configured limit.
        max_qubits: usize,
    },

    /// The executor was built from a configuration that fails validation.
    #[error("Invalid simulator configuration: {0}")]
    Config(#[from] ConfigError),
}

impl SimError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        SimError::InvalidCircuit {
            reason: reason.into(),
            source: None,
        }
    }
}

impl From<IrError> for SimError {
    fn from(err: IrError) -> Self {
        SimError::InvalidCircuit {
            reason: err.to_string(),
            source: Some(err),
        }
    }
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;

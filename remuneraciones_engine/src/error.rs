//! Error types for the remuneraciones engine.
//!
//! The calculation itself is total: once inputs have passed boundary
//! validation nothing in the pipeline can fail.  The errors below
//! therefore describe rejected input, unreadable parameter files and
//! export failures, never arithmetic problems.

use thiserror::Error;

/// Input rejected at the engine boundary before any arithmetic runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInputError {
    /// A numeric field was NaN or infinite.
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    /// A monetary amount, day count or rate was below zero.
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    /// A value was above the largest one the engine accepts for its
    /// field.
    #[error("{field} must not exceed {max} (got {value})")]
    TooLarge {
        field: &'static str,
        value: f64,
        max: f64,
    },

    /// The contract type text did not name one of the four known
    /// contract types.
    #[error("unknown contract type '{0}' (expected Indefinido, Plazo Fijo, Por Obra or Honorarios)")]
    UnknownContractType(String),

    /// A RUT failed format or check digit validation.
    #[error("invalid RUT '{rut}': {reason}")]
    InvalidRut { rut: String, reason: &'static str },
}

/// Failure loading a parameter file from disk.
#[derive(Debug, Error)]
pub enum ParametersError {
    #[error("failed to read parameter file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse parameter file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The file parsed but carries values the engine cannot use.
    #[error("parameter file {path} is invalid: {source}")]
    Invalid {
        path: String,
        #[source]
        source: InvalidInputError,
    },
}

/// Failure in a batch payroll run.
#[derive(Debug, Error)]
pub enum PayrollError {
    /// One worker's input was rejected; the run stops at the first one.
    #[error("worker {rut}: {source}")]
    Worker {
        rut: String,
        #[source]
        source: InvalidInputError,
    },

    /// The run-wide parameter overrides were rejected.
    #[error("payroll parameters: {0}")]
    Parameters(#[source] InvalidInputError),
}

/// Failure writing the Previred export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error during export: {0}")]
    Io(#[from] std::io::Error),
}

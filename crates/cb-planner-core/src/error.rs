use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the coverage planner library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The offset polygon has empty interior, or a cell is narrower than
    /// the vehicle diameter.
    #[error("geometry infeasible: {reason}")]
    GeometryInfeasible { reason: String },

    /// `select_ingress(p)` was called with a point that is not in the
    /// constraint's current ingress set.
    #[error("point is not a valid ingress for this constraint")]
    InvalidIngress,

    /// `coordinates(ingress)` was asked for an endpoint that contradicts
    /// an already-installed `direction`.
    #[error("requested ingress contradicts the constraint's fixed direction")]
    DirectionViolation,

    /// A refinement or sequencer required `direction` to already be set
    /// and found it absent.
    #[error("missing precondition: {what}")]
    MissingPrecondition { what: String },

    /// Raised when saving a path to disk fails.
    #[error("failed to write path to {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Wrapper for JSON (de)serialization errors encountered in `save()`.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

use thiserror::Error;

/// Top-level error type for the Lamina kernel.
#[derive(Debug, Error)]
pub enum LaminaError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric computations.
///
/// These are fatal: once plane construction degenerates, every
/// downstream contour and board is meaningless.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to the zone/face topology.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("contour reconstruction produced a degenerate cycle of length {len}")]
    InvalidContour { len: usize },
}

/// Errors related to decomposition operators.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error(
        "requested lengths exceed the zone extent by {overflow}mm \
         ({requested}mm over {available}mm)"
    )]
    OverconstrainedPartition {
        available: f64,
        requested: f64,
        overflow: f64,
    },

    #[error("zone has no boundary faces")]
    EmptyZone,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("contact between boards has fewer than two anchor points")]
    UnresolvedContact,
}

/// Convenience type alias for results using [`LaminaError`].
pub type Result<T> = std::result::Result<T, LaminaError>;

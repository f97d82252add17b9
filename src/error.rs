use thiserror::Error;

/// Top-level error type for the strata kernel.
#[derive(Debug, Error)]
pub enum StrataError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Layer(#[from] LayerError),
}

/// Errors raised by the affine kernel.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Inversion was requested on a transform whose determinant is zero.
    ///
    /// `basis` holds the linear part in column-major order.
    #[error("degenerate transform: determinant is {determinant}")]
    Degenerate {
        determinant: f64,
        basis: Vec<f64>,
        offset: Vec<f64>,
    },
}

/// Errors related to shape data.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("point index {index} is out of range for {len} points")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("point reference no longer resolves in its arena")]
    StaleReference,

    #[error("point reference {index} names the same point as reference {first}")]
    DuplicateReference { first: usize, index: usize },
}

/// Errors related to building a layer stack.
#[derive(Debug, Error)]
pub enum LayerError {
    #[error("duplicate layer height {height}")]
    DuplicateHeight { height: f64 },

    #[error("layer height {height} does not follow the last height {last}")]
    NonMonotonic { height: f64, last: f64 },

    #[error("invalid layer height {0}")]
    InvalidHeight(f64),
}

/// Convenience type alias for results using [`StrataError`].
pub type Result<T> = std::result::Result<T, StrataError>;

use thiserror::Error;

/// Errors originating from the coordinate and grid math.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid bounds: {reason}")]
    InvalidBounds { reason: String },

    #[error("invalid buffer dimensions: {width}×{height} (both must be > 0)")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid zoom: {0} (must be positive and finite)")]
    InvalidZoom(f64),
}

pub mod bounds;
pub mod camera;
pub mod error;
pub mod grid;
pub mod transform;

// Re-export primary types for convenience.
pub use bounds::Bounds;
pub use camera::Camera;
pub use error::CoreError;
pub use grid::{compute_grid, grid_step, Grid, GridLine, LineType};
pub use transform::{inverse_lerp, lerp, Transform};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;

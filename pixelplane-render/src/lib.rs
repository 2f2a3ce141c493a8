pub mod engine;
pub mod error;
pub mod frame;
pub mod session;
pub mod shader;
pub mod state;

pub use engine::{ComputeEngine, ComputeStats, PassOutcome};
pub use error::RenderError;
pub use frame::FrameBuffer;
pub use session::{Command, PlotSession};
pub use shader::{BuiltinShader, Checkerboard, Rgba, Rings, Shader, Solid};
pub use state::{EventKind, Publish, Snapshot, ViewportState};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;

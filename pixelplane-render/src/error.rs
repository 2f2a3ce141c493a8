use thiserror::Error;

/// Errors originating from the frame buffers and the compute worker.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to allocate a {bytes}-byte pixel buffer")]
    Allocation { bytes: usize },

    #[error("failed to spawn compute worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    #[error("compute worker panicked")]
    WorkerPanicked,

    #[error(transparent)]
    Core(#[from] pixelplane_core::CoreError),
}

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::debug;

use pixelplane_core::Transform;

use crate::frame::FrameBuffer;
use crate::shader::{Rgba, Shader};
use crate::state::{Publish, Snapshot, ViewportState};

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Counters the compute worker updates and the debug overlay reads.
///
/// Row progress is reset at the start of every pass.
#[derive(Debug, Default)]
pub struct ComputeStats {
    rows_done: AtomicUsize,
    rows_total: AtomicUsize,
    published: AtomicU64,
    abandoned: AtomicU64,
    last_pass_us: AtomicU64,
}

impl ComputeStats {
    fn start_pass(&self, rows: usize) {
        self.rows_total.store(rows, Ordering::Relaxed);
        self.rows_done.store(0, Ordering::Relaxed);
    }

    fn inc_rows(&self) {
        self.rows_done.fetch_add(1, Ordering::Relaxed);
    }

    /// Rows finished in the current pass, as `(done, total)`.
    pub fn progress(&self) -> (usize, usize) {
        (
            self.rows_done.load(Ordering::Relaxed),
            self.rows_total.load(Ordering::Relaxed),
        )
    }

    /// Passes whose result became the visible frame.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Passes thrown away because the view changed under them.
    pub fn abandoned(&self) -> u64 {
        self.abandoned.load(Ordering::Relaxed)
    }

    /// Wall time of the last published pass.
    pub fn last_pass(&self) -> Duration {
        Duration::from_micros(self.last_pass_us.load(Ordering::Relaxed))
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// How a compute pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// The pass finished and its frame is now the front buffer.
    Published,
    /// The view changed mid-pass; the partial frame was discarded.
    Abandoned,
    /// Nothing changed since the last published frame.
    UpToDate,
    /// Shutdown was requested.
    Shutdown,
}

/// Recomputes every pixel of the viewport with a [`Shader`].
///
/// The engine owns the back buffer. It never holds the state lock while
/// evaluating pixels: each pass copies a [`Snapshot`], fills the back buffer
/// in parallel rows, and swaps it in with [`ViewportState::publish`]. The
/// previous front buffer comes back and becomes the next back buffer.
pub struct ComputeEngine<S> {
    state: Arc<ViewportState>,
    shader: S,
    back: Option<FrameBuffer>,
    published_generation: Option<u64>,
    stats: Arc<ComputeStats>,
}

impl<S: Shader> ComputeEngine<S> {
    pub fn new(state: Arc<ViewportState>, shader: S) -> Self {
        Self {
            state,
            shader,
            back: None,
            published_generation: None,
            stats: Arc::new(ComputeStats::default()),
        }
    }

    pub fn state(&self) -> &Arc<ViewportState> {
        &self.state
    }

    pub fn stats(&self) -> Arc<ComputeStats> {
        Arc::clone(&self.stats)
    }

    /// Refresh the viewport snapshot and size the back buffer to it, without
    /// computing anything.
    pub fn resize_settings(&mut self) -> crate::Result<Snapshot> {
        let (snap, event) = self.state.refresh();
        let back = self.take_back_buffer(snap.width, snap.height)?;
        self.back = Some(back);
        debug!(
            width = snap.width,
            height = snap.height,
            ?event,
            "Compute settings refreshed"
        );
        Ok(snap)
    }

    /// Run one pass: refresh, fill, publish.
    ///
    /// Returns [`PassOutcome::Abandoned`] when an event arrives mid-pass; the
    /// caller decides whether to start over.
    pub fn compute_pass(&mut self) -> crate::Result<PassOutcome> {
        if self.state.is_shutdown() {
            return Ok(PassOutcome::Shutdown);
        }
        if self.published_generation == Some(self.state.generation()) {
            return Ok(PassOutcome::UpToDate);
        }

        let start = Instant::now();
        let (snap, event) = self.state.refresh();
        let mut back = self.take_back_buffer(snap.width, snap.height)?;
        debug!(
            generation = snap.generation,
            width = snap.width,
            height = snap.height,
            ?event,
            "Starting compute pass"
        );

        let completed = self.fill(&snap, &mut back)?;
        if !completed {
            self.back = Some(back);
            if self.state.is_shutdown() {
                return Ok(PassOutcome::Shutdown);
            }
            self.stats.abandoned.fetch_add(1, Ordering::Relaxed);
            debug!(generation = snap.generation, "Compute pass abandoned");
            return Ok(PassOutcome::Abandoned);
        }

        match self.state.publish(back, snap.generation) {
            Publish::Published(previous) => {
                self.back = Some(previous);
                self.published_generation = Some(snap.generation);
                let elapsed = start.elapsed();
                self.stats
                    .last_pass_us
                    .store(elapsed.as_micros() as u64, Ordering::Relaxed);
                self.stats.published.fetch_add(1, Ordering::Relaxed);
                debug!(
                    generation = snap.generation,
                    elapsed_ms = elapsed.as_millis(),
                    "Frame published"
                );
                Ok(PassOutcome::Published)
            }
            Publish::Stale(back) => {
                self.back = Some(back);
                self.stats.abandoned.fetch_add(1, Ordering::Relaxed);
                debug!(generation = snap.generation, "Frame went stale before publish");
                Ok(PassOutcome::Abandoned)
            }
        }
    }

    /// Reuse the back buffer if there is one, allocating otherwise.
    fn take_back_buffer(&mut self, width: u32, height: u32) -> crate::Result<FrameBuffer> {
        match self.back.take() {
            Some(mut buf) => {
                buf.reshape(width, height)?;
                Ok(buf)
            }
            None => FrameBuffer::try_new(width, height, Rgba::BACKDROP),
        }
    }

    /// Fill `back` for `snap`, row by row in parallel. Returns `false` if the
    /// pass was overtaken by a newer event (or shutdown) before finishing.
    fn fill(&self, snap: &Snapshot, back: &mut FrameBuffer) -> crate::Result<bool> {
        assert!(
            back.has_dims(snap.width, snap.height),
            "back buffer {}×{} does not match snapshot {}×{}",
            back.width(),
            back.height(),
            snap.width,
            snap.height
        );
        let transform = Transform::new(snap.bounds, snap.width, snap.height)?;
        let state = &*self.state;
        let shader = &self.shader;
        let stats = &*self.stats;
        let gen = snap.generation;
        let stride = back.stride();

        stats.start_pass(snap.height as usize);
        back.pixels_mut()
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(y, row)| {
                if state.is_stale(gen) || state.is_shutdown() {
                    return;
                }
                for (x, px) in row.chunks_exact_mut(4).enumerate() {
                    let (wx, wy) = transform.pixel_to_world(x as u32, y as u32);
                    px.copy_from_slice(&shader.color(wx, wy).to_array());
                }
                stats.inc_rows();
            });

        Ok(!state.is_stale(gen) && !state.is_shutdown())
    }
}

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use pixelplane_core::{Bounds, CoreError};

use crate::frame::FrameBuffer;
use crate::shader::Rgba;

/// What changed in the viewport since the compute worker last looked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventKind {
    #[default]
    None,
    /// Pan or zoom: same dimensions, new bounds.
    ViewChanged,
    /// Window resize: new dimensions (and therefore new bounds).
    Resized,
}

/// An immutable copy of the viewport taken under the lock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub bounds: Bounds,
    pub width: u32,
    pub height: u32,
    /// Event generation the snapshot was taken at.
    pub generation: u64,
}

/// Outcome of [`ViewportState::publish`].
#[derive(Debug)]
pub enum Publish {
    /// The frame is now visible. Holds the previous front buffer, handed
    /// back so the caller can reuse its allocation.
    Published(FrameBuffer),
    /// The view changed since the frame's snapshot; the frame was not shown
    /// and is handed back untouched.
    Stale(FrameBuffer),
}

struct Shared {
    bounds: Bounds,
    width: u32,
    height: u32,
    event: EventKind,
    front: FrameBuffer,
    /// Incremented on every successful publish or front-buffer replacement.
    frame_seq: u64,
}

/// The single piece of state shared by the render loop and the compute worker.
///
/// Everything is behind one mutex. The compute worker never holds it while
/// evaluating pixels: it copies a [`Snapshot`], fills a private back buffer,
/// then swaps that buffer in with [`publish`](Self::publish).
///
/// `generation` mirrors the event flag outside the lock so the worker can poll
/// for staleness between rows without contending with the render loop.
pub struct ViewportState {
    inner: Mutex<Shared>,
    generation: AtomicU64,
    shutdown: AtomicBool,
}

impl ViewportState {
    /// Create the state with a front buffer filled with the backdrop color.
    pub fn new(bounds: Bounds, width: u32, height: u32) -> crate::Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions { width, height }.into());
        }
        let front = FrameBuffer::try_new(width, height, Rgba::BACKDROP)?;
        Ok(Self {
            inner: Mutex::new(Shared {
                bounds,
                width,
                height,
                event: EventKind::None,
                front,
                frame_seq: 0,
            }),
            generation: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.inner
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    /// Atomic copy of bounds and dimensions.
    pub fn read_bounds_and_dims(&self) -> (Bounds, u32, u32) {
        let s = self.lock();
        (s.bounds, s.width, s.height)
    }

    /// Settings refresh: copy the viewport and clear the pending event in one
    /// critical section.
    pub fn refresh(&self) -> (Snapshot, EventKind) {
        let mut s = self.lock();
        let event = std::mem::take(&mut s.event);
        let snap = Snapshot {
            bounds: s.bounds,
            width: s.width,
            height: s.height,
            generation: self.generation(),
        };
        (snap, event)
    }

    /// Pan or zoom: store the new bounds and raise [`EventKind::ViewChanged`]
    /// in one critical section, so no pass started on the old bounds can
    /// publish after the bounds changed.
    pub fn write_bounds(&self, bounds: Bounds) {
        let mut s = self.lock();
        s.bounds = bounds;
        self.raise_locked(&mut s, EventKind::ViewChanged);
    }

    /// Change the dimensions. The front buffer is reallocated at the new size
    /// in the same critical section, so no reader ever sees a buffer that
    /// disagrees with the recorded dimensions.
    pub fn write_dims(&self, width: u32, height: u32) -> crate::Result<()> {
        let mut s = self.lock();
        Self::resize_locked(&mut s, width, height)
    }

    /// Dimensions and bounds together, as a window resize needs.
    pub fn resize(&self, bounds: Bounds, width: u32, height: u32) -> crate::Result<()> {
        let mut s = self.lock();
        Self::resize_locked(&mut s, width, height)?;
        s.bounds = bounds;
        Ok(())
    }

    fn resize_locked(s: &mut Shared, width: u32, height: u32) -> crate::Result<()> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions { width, height }.into());
        }
        if s.front.has_dims(width, height) {
            return Ok(());
        }
        s.front = s.front.resampled(width, height)?;
        s.width = width;
        s.height = height;
        s.frame_seq += 1;
        debug!(width, height, "Front buffer reallocated");
        Ok(())
    }

    /// Read and clear the pending event.
    pub fn take_event(&self) -> EventKind {
        std::mem::take(&mut self.lock().event)
    }

    /// Replace the pending event (latest wins) and advance the generation so
    /// any pass in flight notices it is stale.
    pub fn set_event(&self, event: EventKind) {
        let mut s = self.lock();
        self.raise_locked(&mut s, event);
    }

    fn raise_locked(&self, s: &mut Shared, event: EventKind) {
        s.event = event;
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Current event generation, readable without the lock.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Whether a pass started at `generation` has been overtaken.
    #[inline]
    pub fn is_stale(&self, generation: u64) -> bool {
        self.generation() != generation
    }

    /// Swap `frame` in as the front buffer if it still matches the viewport.
    ///
    /// The frame is accepted only when no event was raised since `generation`
    /// and its dimensions equal the current ones. The swap moves ownership;
    /// pixels are never copied under the lock.
    pub fn publish(&self, mut frame: FrameBuffer, generation: u64) -> Publish {
        debug_assert!(frame.is_consistent());
        let mut s = self.lock();
        if self.is_stale(generation) || !frame.has_dims(s.width, s.height) {
            return Publish::Stale(frame);
        }
        std::mem::swap(&mut s.front, &mut frame);
        s.frame_seq += 1;
        Publish::Published(frame)
    }

    /// Run `f` on the front buffer under the lock.
    pub fn with_frame<R>(&self, f: impl FnOnce(&FrameBuffer) -> R) -> R {
        let s = self.lock();
        debug_assert!(s.front.has_dims(s.width, s.height));
        f(&s.front)
    }

    /// Like [`with_frame`](Self::with_frame) but only if the front buffer
    /// changed since `last_seq`. Returns the new sequence number alongside
    /// the closure's result.
    pub fn with_frame_if_newer<R>(
        &self,
        last_seq: u64,
        f: impl FnOnce(&FrameBuffer) -> R,
    ) -> Option<(u64, R)> {
        let s = self.lock();
        if s.frame_seq == last_seq {
            return None;
        }
        Some((s.frame_seq, f(&s.front)))
    }

    /// Number of front-buffer replacements so far.
    pub fn frame_seq(&self) -> u64 {
        self.lock().frame_seq
    }

    /// Ask every thread to stop. Used by a thread that hit a fatal error.
    pub fn request_shutdown(&self) {
        if !self.shutdown.swap(true, Ordering::SeqCst) {
            info!("Shutdown requested");
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

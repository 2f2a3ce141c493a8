use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use pixelplane_core::Bounds;

use crate::engine::{ComputeEngine, ComputeStats, PassOutcome};
use crate::error::RenderError;
use crate::shader::Shader;
use crate::state::{EventKind, ViewportState};

/// How long the idle worker waits on its channel before re-checking the
/// shutdown flag.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Messages from the render loop to the compute worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Bounds changed: recompute the frame.
    Recompute,
    /// Dimensions changed: resize the working buffer, then recompute.
    ResizeSettings,
    /// Stop the worker.
    Close,
}

impl Command {
    /// The command that handles a viewport event, if any.
    pub fn for_event(event: EventKind) -> Option<Self> {
        match event {
            EventKind::None => None,
            EventKind::ViewChanged => Some(Self::Recompute),
            EventKind::Resized => Some(Self::ResizeSettings),
        }
    }

    fn priority(self) -> u8 {
        match self {
            Self::Recompute => 0,
            Self::ResizeSettings => 1,
            Self::Close => 2,
        }
    }

    /// Collapse two queued commands into the one that covers both.
    pub fn merge(self, newer: Self) -> Self {
        if newer.priority() >= self.priority() {
            newer
        } else {
            self
        }
    }
}

/// Drain everything queued behind `initial`, keeping the command that
/// subsumes the rest.
fn drain_latest(initial: Command, rx: &mpsc::Receiver<Command>) -> Command {
    let mut cmd = initial;
    while let Ok(newer) = rx.try_recv() {
        cmd = cmd.merge(newer);
    }
    cmd
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Owns the compute worker thread and the channel that drives it.
///
/// The render loop mutates the viewport through the session so that every
/// state change is followed by exactly one signal: the event is recorded in
/// [`ViewportState`] (latest wins) and the matching [`Command`] is sent.
/// Dropping the session closes and joins the worker.
pub struct PlotSession {
    state: Arc<ViewportState>,
    tx: mpsc::Sender<Command>,
    worker: Option<JoinHandle<()>>,
    stats: Arc<ComputeStats>,
}

impl PlotSession {
    /// Spawn the compute worker and queue the first frame.
    pub fn spawn<S: Shader + 'static>(state: Arc<ViewportState>, shader: S) -> crate::Result<Self> {
        let engine = ComputeEngine::new(Arc::clone(&state), shader);
        let stats = engine.stats();
        let (tx, rx) = mpsc::channel();

        let worker = thread::Builder::new()
            .name("compute-worker".into())
            .spawn(move || compute_worker(engine, rx))
            .map_err(RenderError::WorkerSpawn)?;

        let session = Self {
            state,
            tx,
            worker: Some(worker),
            stats,
        };
        session.send(Command::Recompute);
        Ok(session)
    }

    pub fn state(&self) -> &Arc<ViewportState> {
        &self.state
    }

    pub fn stats(&self) -> &ComputeStats {
        &self.stats
    }

    /// Record `event` and wake the worker with the matching command.
    pub fn notify(&self, event: EventKind) {
        let Some(cmd) = Command::for_event(event) else {
            return;
        };
        self.state.set_event(event);
        self.send(cmd);
    }

    /// Pan or zoom: store the new bounds (which raises the event) and
    /// request a recompute.
    pub fn view_changed(&self, bounds: Bounds) {
        self.state.write_bounds(bounds);
        self.send(Command::Recompute);
    }

    /// Window resize: reallocate the shared buffer at the new size first,
    /// then signal, so the worker never computes at stale dimensions.
    pub fn resized(&self, bounds: Bounds, width: u32, height: u32) -> crate::Result<()> {
        self.state.resize(bounds, width, height)?;
        self.notify(EventKind::Resized);
        Ok(())
    }

    fn send(&self, cmd: Command) {
        if self.tx.send(cmd).is_err() {
            debug!(?cmd, "Compute worker gone, command dropped");
        }
    }

    /// `false` once the worker has exited or a shutdown was requested.
    pub fn is_alive(&self) -> bool {
        !self.state.is_shutdown()
            && self
                .worker
                .as_ref()
                .is_some_and(|handle| !handle.is_finished())
    }

    /// Stop the pass in flight, send [`Command::Close`] and join the worker.
    pub fn shutdown(&mut self) -> crate::Result<()> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        self.state.request_shutdown();
        self.send(Command::Close);
        worker.join().map_err(|_| RenderError::WorkerPanicked)?;
        info!("Compute worker joined");
        Ok(())
    }
}

impl Drop for PlotSession {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!("Compute worker did not shut down cleanly: {e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

fn run_command<S: Shader>(engine: &mut ComputeEngine<S>, cmd: Command) -> crate::Result<PassOutcome> {
    match cmd {
        Command::ResizeSettings => {
            engine.resize_settings()?;
            engine.compute_pass()
        }
        Command::Recompute => engine.compute_pass(),
        Command::Close => Ok(PassOutcome::Shutdown),
    }
}

fn compute_worker<S: Shader>(mut engine: ComputeEngine<S>, rx: mpsc::Receiver<Command>) {
    info!("Compute worker started");

    'outer: loop {
        let first = match rx.recv_timeout(POLL_INTERVAL) {
            Ok(cmd) => cmd,
            Err(RecvTimeoutError::Timeout) => {
                if engine.state().is_shutdown() {
                    break;
                }
                continue;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        };
        let mut cmd = drain_latest(first, &rx);

        loop {
            if cmd == Command::Close {
                break 'outer;
            }
            match run_command(&mut engine, cmd) {
                Ok(PassOutcome::Abandoned) => {
                    // Start over from the settings refresh, folding in
                    // whatever the render loop queued meanwhile.
                    cmd = match rx.try_recv() {
                        Ok(newer) => drain_latest(Command::Recompute.merge(newer), &rx),
                        Err(TryRecvError::Empty) => Command::Recompute,
                        Err(TryRecvError::Disconnected) => break 'outer,
                    };
                }
                Ok(PassOutcome::Shutdown) => break 'outer,
                Ok(PassOutcome::Published | PassOutcome::UpToDate) => break,
                Err(e) => {
                    error!("Compute worker failed: {e}");
                    engine.state().request_shutdown();
                    break 'outer;
                }
            }
        }
    }

    info!("Compute worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_map_to_commands() {
        assert_eq!(Command::for_event(EventKind::None), None);
        assert_eq!(
            Command::for_event(EventKind::ViewChanged),
            Some(Command::Recompute)
        );
        assert_eq!(
            Command::for_event(EventKind::Resized),
            Some(Command::ResizeSettings)
        );
    }

    #[test]
    fn merge_keeps_the_stronger_command() {
        use Command::*;
        assert_eq!(Recompute.merge(Recompute), Recompute);
        assert_eq!(ResizeSettings.merge(Recompute), ResizeSettings);
        assert_eq!(Recompute.merge(ResizeSettings), ResizeSettings);
        assert_eq!(ResizeSettings.merge(Close), Close);
        assert_eq!(Close.merge(Recompute), Close);
    }

    #[test]
    fn drain_collapses_queue() {
        let (tx, rx) = mpsc::channel();
        tx.send(Command::ResizeSettings).unwrap();
        tx.send(Command::Recompute).unwrap();
        tx.send(Command::Recompute).unwrap();
        assert_eq!(drain_latest(Command::Recompute, &rx), Command::ResizeSettings);
        assert!(rx.try_recv().is_err());
    }
}

use std::time::{Duration, Instant};

/// Weight of the newest frame in the smoothed rate.
const SMOOTHING: f64 = 0.1;

/// Measures the displayed frame rate.
#[derive(Debug, Default)]
pub(crate) struct FrameClock {
    last: Option<Instant>,
    fps: f64,
}

impl FrameClock {
    /// Record a frame shown at `now`.
    pub(crate) fn tick(&mut self, now: Instant) {
        if let Some(last) = self.last {
            let dt = now.saturating_duration_since(last).as_secs_f64();
            if dt > 0.0 {
                let instant = 1.0 / dt;
                self.fps = if self.fps == 0.0 {
                    instant
                } else {
                    self.fps + SMOOTHING * (instant - self.fps)
                };
            }
        }
        self.last = Some(now);
    }

    /// Smoothed frames per second, 0 until two frames have been seen.
    pub(crate) fn fps(&self) -> f64 {
        self.fps
    }

    /// Delay between repaints for a target rate.
    pub(crate) fn repaint_interval(target_fps: u32) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(target_fps.max(1)))
    }
}

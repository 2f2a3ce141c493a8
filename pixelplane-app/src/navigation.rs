use tracing::{debug, error, warn};

use crate::app::PlotApp;

impl PlotApp {
    /// Push the camera's bounds to the shared state and signal the worker.
    pub(crate) fn commit_view(&mut self) {
        let [w, h] = self.panel_size;
        match self.camera.bounds(w, h) {
            Ok(bounds) => self.session.view_changed(bounds),
            Err(e) => warn!("Camera produced no valid view: {e}"),
        }
    }

    pub(crate) fn pan_by_pixels(&mut self, dx: f64, dy: f64) {
        self.camera.pan_pixels(dx, dy);
        self.commit_view();
    }

    pub(crate) fn pan_by_fraction(&mut self, fx: f64, fy: f64) {
        let [w, h] = self.panel_size;
        self.camera.pan_fraction(fx, fy, w, h);
        self.commit_view();
    }

    /// Zoom keeping the world point under the cursor in place.
    pub(crate) fn zoom_at_cursor(&mut self, px: f64, py: f64, factor: f64) {
        let [w, h] = self.panel_size;
        if self.camera.zoom_at(factor, px, py, w, h) {
            self.commit_view();
        } else {
            debug!(zoom = self.camera.zoom, "Zoom limit reached");
        }
    }

    pub(crate) fn zoom_center(&mut self, factor: f64) {
        if self.camera.zoom_by(factor) {
            self.commit_view();
        } else {
            debug!(zoom = self.camera.zoom, "Zoom limit reached");
        }
    }

    pub(crate) fn reset_view(&mut self) {
        self.camera = self.preferences.initial_camera();
        self.commit_view();
    }

    /// Follow a change of the drawing area. The camera is kept, so the
    /// bounds grow or shrink with the window.
    pub(crate) fn check_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || [width, height] == self.panel_size {
            return;
        }
        self.panel_size = [width, height];
        let bounds = match self.camera.bounds(width, height) {
            Ok(bounds) => bounds,
            Err(e) => {
                warn!("Keeping previous bounds after resize: {e}");
                self.session.state().read_bounds_and_dims().0
            }
        };
        if let Err(e) = self.session.resized(bounds, width, height) {
            error!("Resize to {width}x{height} failed: {e}");
            self.session.state().request_shutdown();
        }
    }
}

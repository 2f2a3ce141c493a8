use crate::bounds::Bounds;
use crate::error::CoreError;

/// Where the user is looking: a world-space centre and a zoom level.
///
/// `zoom` is the number of world units covered by one pixel, so the visible
/// [`Bounds`] follow from the camera and the current buffer size. Resizing the
/// window keeps the camera unchanged and only widens or narrows the bounds.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Camera {
    pub center_x: f64,
    pub center_y: f64,
    /// World units per pixel.
    pub zoom: f64,
}

impl Camera {
    /// Smallest zoom (deepest zoom-in) the camera accepts.
    pub const MIN_ZOOM: f64 = 1e-12;
    /// Largest zoom (farthest zoom-out) the camera accepts.
    pub const MAX_ZOOM: f64 = 1e9;
    /// Initial zoom: a 1280-pixel-wide window spans about 3.84 world units.
    pub const DEFAULT_ZOOM: f64 = 0.003;

    pub fn new(center_x: f64, center_y: f64, zoom: f64) -> crate::Result<Self> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(CoreError::InvalidZoom(zoom));
        }
        if !center_x.is_finite() || !center_y.is_finite() {
            return Err(CoreError::InvalidBounds {
                reason: format!("camera centre must be finite, got ({center_x}, {center_y})"),
            });
        }
        Ok(Self {
            center_x,
            center_y,
            zoom: zoom.clamp(Self::MIN_ZOOM, Self::MAX_ZOOM),
        })
    }

    /// The world rectangle visible in a `width`×`height` buffer.
    pub fn bounds(&self, width: u32, height: u32) -> crate::Result<Bounds> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        Bounds::centered(
            self.center_x,
            self.center_y,
            width as f64 * self.zoom,
            height as f64 * self.zoom,
        )
    }

    /// Move the view so the content follows a drag of `(dx, dy)` pixels.
    pub fn pan_pixels(&mut self, dx: f64, dy: f64) {
        self.center_x -= dx * self.zoom;
        self.center_y -= dy * self.zoom;
    }

    /// Pan by a fraction of the visible extent (keyboard navigation).
    pub fn pan_fraction(&mut self, fx: f64, fy: f64, width: u32, height: u32) {
        self.center_x += fx * width as f64 * self.zoom;
        self.center_y += fy * height as f64 * self.zoom;
    }

    /// Multiply the zoom by `factor`, keeping the centre fixed.
    ///
    /// `factor > 1` zooms out, `factor < 1` zooms in. Returns `false` when
    /// the zoom was already pinned at the limit and nothing changed.
    pub fn zoom_by(&mut self, factor: f64) -> bool {
        let new_zoom = (self.zoom * factor).clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
        if new_zoom == self.zoom {
            return false;
        }
        self.zoom = new_zoom;
        true
    }

    /// Zoom by `factor` while keeping the world point under pixel
    /// `(anchor_px, anchor_py)` fixed on screen.
    pub fn zoom_at(
        &mut self,
        factor: f64,
        anchor_px: f64,
        anchor_py: f64,
        width: u32,
        height: u32,
    ) -> bool {
        let off_x = anchor_px - width as f64 / 2.0;
        let off_y = anchor_py - height as f64 / 2.0;
        let target_x = self.center_x + off_x * self.zoom;
        let target_y = self.center_y + off_y * self.zoom;
        if !self.zoom_by(factor) {
            return false;
        }
        self.center_x = target_x - off_x * self.zoom;
        self.center_y = target_y - off_y * self.zoom;
        true
    }

    /// World coordinates of a (fractional) pixel in a `width`×`height` view.
    pub fn pixel_to_world(&self, px: f64, py: f64, width: u32, height: u32) -> (f64, f64) {
        (
            self.center_x + (px - width as f64 / 2.0) * self.zoom,
            self.center_y + (py - height as f64 / 2.0) * self.zoom,
        )
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center_x: 0.0,
            center_y: 0.0,
            zoom: Self::DEFAULT_ZOOM,
        }
    }
}

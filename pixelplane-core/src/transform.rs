use crate::bounds::Bounds;
use crate::error::CoreError;

/// Linear interpolation: `a` at `t = 0`, `b` at `t = 1`.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Inverse of [`lerp`]: where `v` sits between `a` and `b`, as a fraction.
#[inline]
pub fn inverse_lerp(a: f64, b: f64, v: f64) -> f64 {
    (v - a) / (b - a)
}

/// Maps between pixel coordinates and world coordinates.
///
/// Pixel `(0, 0)` maps to `(x_min, y_min)` and pixel `(width, height)` (the
/// far corner, one past the last pixel) maps to `(x_max, y_max)`. Both axes
/// grow in the same direction in pixel and world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub bounds: Bounds,
    pub width: u32,
    pub height: u32,
}

impl Transform {
    pub fn new(bounds: Bounds, width: u32, height: u32) -> crate::Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        Ok(Self {
            bounds,
            width,
            height,
        })
    }

    /// Map (possibly fractional) pixel coordinates to world coordinates.
    #[inline]
    pub fn screen_to_world(&self, px: f64, py: f64) -> (f64, f64) {
        (
            lerp(self.bounds.x_min, self.bounds.x_max, px / self.width as f64),
            lerp(self.bounds.y_min, self.bounds.y_max, py / self.height as f64),
        )
    }

    /// Map an integer pixel to world coordinates.
    #[inline]
    pub fn pixel_to_world(&self, px: u32, py: u32) -> (f64, f64) {
        self.screen_to_world(px as f64, py as f64)
    }

    /// Map world coordinates to fractional pixel coordinates.
    #[inline]
    pub fn world_to_screen_f(&self, wx: f64, wy: f64) -> (f64, f64) {
        (
            inverse_lerp(self.bounds.x_min, self.bounds.x_max, wx) * self.width as f64,
            inverse_lerp(self.bounds.y_min, self.bounds.y_max, wy) * self.height as f64,
        )
    }

    /// Map world coordinates to the nearest integer pixel.
    ///
    /// The result is not clamped: points outside the bounds land outside
    /// `0..width` / `0..height`.
    #[inline]
    pub fn world_to_screen(&self, wx: f64, wy: f64) -> (i64, i64) {
        let (sx, sy) = self.world_to_screen_f(wx, wy);
        (sx.round() as i64, sy.round() as i64)
    }

}

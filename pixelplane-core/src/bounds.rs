use crate::error::CoreError;

/// The rectangle of world (plot) coordinates currently visible.
///
/// `Bounds` is a plain `Copy` value: it is always copied across the thread
/// boundary, never shared by reference, so a reader can't observe a
/// half-written rectangle.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    /// Create bounds, rejecting empty, inverted or non-finite rectangles.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> crate::Result<Self> {
        let all_finite = [x_min, x_max, y_min, y_max].iter().all(|v| v.is_finite());
        if !all_finite {
            return Err(CoreError::InvalidBounds {
                reason: format!("non-finite edge in [{x_min}, {x_max}] × [{y_min}, {y_max}]"),
            });
        }
        if x_max <= x_min || y_max <= y_min {
            return Err(CoreError::InvalidBounds {
                reason: format!("empty or inverted rectangle [{x_min}, {x_max}] × [{y_min}, {y_max}]"),
            });
        }
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// Bounds of the given extent centred on `(cx, cy)`.
    pub fn centered(cx: f64, cy: f64, width: f64, height: f64) -> crate::Result<Self> {
        Self::new(
            cx - width / 2.0,
            cx + width / 2.0,
            cy - height / 2.0,
            cy + height / 2.0,
        )
    }

    /// Horizontal extent in world units.
    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Vertical extent in world units.
    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn valid_bounds() {
        let b = Bounds::new(-1.0, 3.0, -2.0, 2.0).unwrap();
        assert!((b.width() - 4.0).abs() < EPSILON);
        assert!((b.height() - 4.0).abs() < EPSILON);
        assert_eq!(b.center(), (1.0, 0.0));
    }

    #[test]
    fn inverted_bounds_rejected() {
        assert!(Bounds::new(1.0, -1.0, -1.0, 1.0).is_err());
        assert!(Bounds::new(-1.0, 1.0, 1.0, -1.0).is_err());
        assert!(Bounds::new(0.0, 0.0, -1.0, 1.0).is_err());
    }

    #[test]
    fn non_finite_bounds_rejected() {
        assert!(Bounds::new(f64::NAN, 1.0, -1.0, 1.0).is_err());
        assert!(Bounds::new(-1.0, f64::INFINITY, -1.0, 1.0).is_err());
    }

    #[test]
    fn centered_bounds() {
        let b = Bounds::centered(10.0, -5.0, 4.0, 2.0).unwrap();
        assert_eq!(b, Bounds::new(8.0, 12.0, -6.0, -4.0).unwrap());
        assert_eq!(b.center(), (10.0, -5.0));
        assert_eq!((b.width(), b.height()), (4.0, 2.0));
    }

    #[test]
    fn serde_round_trip() {
        let b = Bounds::new(-1.5, 2.5, -0.5, 0.5).unwrap();
        let json = serde_json::to_string(&b).unwrap();
        let back: Bounds = serde_json::from_str(&json).unwrap();
        assert_eq!(b, back);
    }
}
